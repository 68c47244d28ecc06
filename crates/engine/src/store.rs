//! The store facade: what a presentation layer talks to.
//!
//! It owns the engine, the month being viewed and the latest [`Snapshot`].
//! Writers are serialised through a FIFO mutex so commands commit in the
//! order they are submitted; after each commit the snapshot is reloaded and
//! only then is a [`StoreEvent`] broadcast.

use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};

use crate::{
    AccountPatch, AllocationOutcome, BudgetAllocation, BudgetOverview, Engine, EngineError, Month,
    MonthReport, NewAccount, NewCategory, NewTransaction, ResultEngine, Snapshot,
    TransactionPatch,
};

const EVENT_CAPACITY: usize = 64;

/// What changed. Sent after the snapshot already reflects the change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded,
    LoadFailed(String),
    MonthChanged(Month),
    TransactionsChanged,
    AccountsChanged,
    CategoriesChanged,
    BudgetsChanged,
    Reset,
}

#[derive(Debug)]
struct StoreState {
    current_month: Month,
    snapshot: Arc<Snapshot>,
    is_loading: bool,
}

/// Immutable view of the store at one point in time.
///
/// Derefs to the [`Snapshot`], so every query is available; the `*_current`
/// helpers default the month to the one being viewed.
#[derive(Clone, Debug)]
pub struct StoreView {
    pub current_month: Month,
    pub snapshot: Arc<Snapshot>,
    pub is_loading: bool,
}

impl Deref for StoreView {
    type Target = Snapshot;

    fn deref(&self) -> &Self::Target {
        &self.snapshot
    }
}

impl StoreView {
    pub fn total_income_current(&self) -> i64 {
        self.snapshot.total_income(self.current_month)
    }

    pub fn total_budgeted_current(&self) -> i64 {
        self.snapshot.total_budgeted(self.current_month)
    }

    pub fn allocation_current(&self, category_id: i64) -> Option<&BudgetAllocation> {
        self.snapshot.allocation(category_id, self.current_month)
    }

    pub fn category_activity_current(&self, category_id: i64) -> i64 {
        self.snapshot.category_activity(category_id, self.current_month)
    }

    pub fn category_available_current(&self, category_id: i64) -> i64 {
        self.snapshot.category_available(category_id, self.current_month)
    }

    pub fn total_available_current(&self) -> i64 {
        self.snapshot.total_available(self.current_month)
    }

    pub fn to_be_budgeted_current(&self) -> i64 {
        self.snapshot.to_be_budgeted(self.current_month)
    }

    pub fn budget_overview_current(&self) -> BudgetOverview {
        self.snapshot.budget_overview(self.current_month)
    }

    pub fn month_report_current(&self) -> MonthReport {
        self.snapshot.month_report(self.current_month)
    }
}

#[derive(Debug)]
pub struct Store {
    engine: Engine,
    state: RwLock<StoreState>,
    writer: Mutex<()>,
    events: broadcast::Sender<StoreEvent>,
}

impl Store {
    /// A store viewing the current month. Nothing is read until
    /// [`Store::load_data`].
    pub fn new(engine: Engine) -> Self {
        Self::with_month(engine, Month::current())
    }

    pub fn with_month(engine: Engine, month: Month) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine,
            state: RwLock::new(StoreState {
                current_month: month,
                snapshot: Arc::new(Snapshot::default()),
                is_loading: true,
            }),
            writer: Mutex::new(()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> StoreView {
        let state = self.state.read().await;
        StoreView {
            current_month: state.current_month,
            snapshot: Arc::clone(&state.snapshot),
            is_loading: state.is_loading,
        }
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.read().await.snapshot)
    }

    pub async fn current_month(&self) -> Month {
        self.state.read().await.current_month
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Seeds an empty database, then reads every collection.
    ///
    /// On failure the store still leaves the loading state, so consumers are
    /// not stuck; the error is returned as well.
    pub async fn load_data(&self) -> ResultEngine<()> {
        let _writer = self.writer.lock().await;
        self.state.write().await.is_loading = true;

        let loaded = self.seed_and_load().await;
        match loaded {
            Ok(snapshot) => {
                let counts = (
                    snapshot.accounts.len(),
                    snapshot.categories.len(),
                    snapshot.transactions.len(),
                );
                self.install(snapshot).await;
                tracing::info!(
                    "Loaded {} accounts, {} categories, {} transactions",
                    counts.0,
                    counts.1,
                    counts.2
                );
                self.publish(StoreEvent::Loaded);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Loading budget data failed: {err}");
                self.state.write().await.is_loading = false;
                self.publish(StoreEvent::LoadFailed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn seed_and_load(&self) -> ResultEngine<Snapshot> {
        match self.engine.seed_if_empty().await {
            Ok(true) => tracing::info!("Empty database seeded with sample data"),
            Ok(false) => {}
            Err(EngineError::SeedInProgress) => {
                tracing::debug!("Seeding already running elsewhere, skipping");
            }
            Err(err) => return Err(err),
        }
        self.engine.snapshot().await
    }

    /// Leaves the loading state without waiting for a load to finish.
    pub async fn abandon_loading(&self) {
        let mut state = self.state.write().await;
        if state.is_loading {
            tracing::warn!("Initial load abandoned");
            state.is_loading = false;
        }
    }

    pub async fn set_month(&self, month: Month) {
        self.state.write().await.current_month = month;
        self.publish(StoreEvent::MonthChanged(month));
    }

    /// Views the following month. Past 9999-12 the view stays put.
    pub async fn next_month(&self) -> ResultEngine<Month> {
        self.shift_month(1).await
    }

    pub async fn prev_month(&self) -> ResultEngine<Month> {
        self.shift_month(-1).await
    }

    async fn shift_month(&self, delta: i32) -> ResultEngine<Month> {
        let month = {
            let mut state = self.state.write().await;
            state.current_month = state.current_month.add_months(delta)?;
            state.current_month
        };
        self.publish(StoreEvent::MonthChanged(month));
        Ok(month)
    }

    pub async fn add_transaction(&self, cmd: NewTransaction) -> ResultEngine<Option<i64>> {
        let _writer = self.writer.lock().await;
        let id = self.engine.add_transaction(cmd).await?;
        self.refresh(StoreEvent::TransactionsChanged).await;
        Ok(id)
    }

    pub async fn update_transaction(&self, id: i64, patch: TransactionPatch) -> ResultEngine<()> {
        let _writer = self.writer.lock().await;
        self.engine.update_transaction(id, patch).await?;
        self.refresh(StoreEvent::TransactionsChanged).await;
        Ok(())
    }

    pub async fn delete_transaction(&self, id: i64) -> ResultEngine<bool> {
        let _writer = self.writer.lock().await;
        let deleted = self.engine.delete_transaction(id).await?;
        if deleted {
            self.refresh(StoreEvent::TransactionsChanged).await;
        }
        Ok(deleted)
    }

    /// Allocates for `month`, or for the month being viewed when `None`.
    pub async fn allocate_funds(
        &self,
        category_id: i64,
        amount: i64,
        month: Option<Month>,
    ) -> ResultEngine<AllocationOutcome> {
        let _writer = self.writer.lock().await;
        let month = self.month_or_current(month).await;
        let outcome = self.engine.allocate_funds(category_id, amount, month).await?;
        self.refresh(StoreEvent::BudgetsChanged).await;
        Ok(outcome)
    }

    pub async fn move_money(
        &self,
        from_category_id: i64,
        to_category_id: i64,
        amount: i64,
        month: Option<Month>,
    ) -> ResultEngine<()> {
        let _writer = self.writer.lock().await;
        let month = self.month_or_current(month).await;
        self.engine
            .move_money(from_category_id, to_category_id, amount, month)
            .await?;
        self.refresh(StoreEvent::BudgetsChanged).await;
        Ok(())
    }

    pub async fn add_account(&self, cmd: NewAccount) -> ResultEngine<i64> {
        let _writer = self.writer.lock().await;
        let id = self.engine.add_account(cmd).await?;
        self.refresh(StoreEvent::AccountsChanged).await;
        Ok(id)
    }

    pub async fn update_account(&self, id: i64, patch: AccountPatch) -> ResultEngine<()> {
        let _writer = self.writer.lock().await;
        self.engine.update_account(id, patch).await?;
        self.refresh(StoreEvent::AccountsChanged).await;
        Ok(())
    }

    pub async fn add_category(&self, cmd: NewCategory) -> ResultEngine<i64> {
        let _writer = self.writer.lock().await;
        let id = self.engine.add_category(cmd).await?;
        self.refresh(StoreEvent::CategoriesChanged).await;
        Ok(id)
    }

    /// Wipes every collection, then loads again (which seeds again).
    pub async fn reset(&self) -> ResultEngine<()> {
        {
            let _writer = self.writer.lock().await;
            self.engine.reset().await?;
            self.refresh(StoreEvent::Reset).await;
        }
        self.load_data().await
    }

    async fn month_or_current(&self, month: Option<Month>) -> Month {
        match month {
            Some(month) => month,
            None => self.current_month().await,
        }
    }

    /// Reloads after a committed command. The command stands even when the
    /// reload fails: the old snapshot stays and `LoadFailed` is announced
    /// instead of `event`.
    async fn refresh(&self, event: StoreEvent) {
        match self.engine.snapshot().await {
            Ok(snapshot) => {
                self.install(snapshot).await;
                self.publish(event);
            }
            Err(err) => {
                tracing::error!("Reloading after {event:?} failed, view is stale: {err}");
                self.publish(StoreEvent::LoadFailed(err.to_string()));
            }
        }
    }

    async fn install(&self, snapshot: Snapshot) {
        let mut state = self.state.write().await;
        state.snapshot = Arc::new(snapshot);
        state.is_loading = false;
    }

    fn publish(&self, event: StoreEvent) {
        // No subscriber is not an error.
        let _ = self.events.send(event);
    }
}
