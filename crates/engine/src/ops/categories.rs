use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseTransaction, EntityTrait, QueryOrder, TransactionTrait,
};

use crate::{NewCategory, ResultEngine, categories};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

const DEFAULT_CATEGORY_GROUP: &str = "Lainnya";
const DEFAULT_CATEGORY_ICON: &str = "storefront";
const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

impl Engine {
    /// Creates a category. Without an explicit `sort_order` it is placed
    /// after every existing category.
    pub async fn add_category(&self, cmd: NewCategory) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| self.create_category(&db_tx, cmd).await)
    }

    pub(crate) async fn create_category(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: NewCategory,
    ) -> ResultEngine<i64> {
        let name = normalize_required_name(&cmd.name, "category")?;
        let group = normalize_optional_text(Some(cmd.group.as_str()))
            .unwrap_or_else(|| DEFAULT_CATEGORY_GROUP.to_string());
        let sort_order = match cmd.sort_order {
            Some(sort_order) => sort_order,
            None => categories::Entity::find()
                .order_by_desc(categories::Column::SortOrder)
                .one(db_tx)
                .await?
                .map_or(1, |last| last.sort_order.saturating_add(1)),
        };

        let category = categories::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            group: ActiveValue::Set(group),
            icon: ActiveValue::Set(
                normalize_optional_text(cmd.icon.as_deref())
                    .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
            ),
            color: ActiveValue::Set(
                normalize_optional_text(cmd.color.as_deref())
                    .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            ),
            sort_order: ActiveValue::Set(sort_order),
        }
        .insert(db_tx)
        .await?;

        tracing::debug!(
            "Created category {} ({}) in {}",
            category.id,
            category.name,
            category.group
        );
        Ok(category.id)
    }
}
