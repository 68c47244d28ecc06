pub use sea_orm_migration::prelude::*;

mod m20260219_000001_init;

/// Schema version stored alongside the data. Bump it together with a new
/// migration entry below.
pub const SCHEMA_VERSION: i32 = 1;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260219_000001_init::Migration)]
    }
}
