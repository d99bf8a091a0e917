pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m020250518_000001_banner_links_table;
mod m020250518_000002_skill_executions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m020250518_000001_banner_links_table::Migration),
            Box::new(m020250518_000002_skill_executions_table::Migration),
        ]
    }
}
