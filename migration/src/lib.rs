pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_food_trucks;
mod m20240301_000002_create_trucks_within_distance_fn;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_food_trucks::Migration),
            Box::new(m20240301_000002_create_trucks_within_distance_fn::Migration),
        ]
    }
}
