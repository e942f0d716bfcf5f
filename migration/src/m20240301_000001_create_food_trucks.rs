use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoodTrucks::Table)
                    .if_not_exists()
                    .col(uuid(FoodTrucks::Id).primary_key())
                    .col(uuid(FoodTrucks::UserId).not_null())
                    .col(string_len(FoodTrucks::Name, 120).not_null())
                    .col(double(FoodTrucks::Lat).not_null())
                    .col(double(FoodTrucks::Lng).not_null())
                    .col(
                        timestamp_with_time_zone(FoodTrucks::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_food_trucks_user_id")
                    .table(FoodTrucks::Table)
                    .col(FoodTrucks::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodTrucks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FoodTrucks {
    Table,
    Id,
    UserId,
    Name,
    Lat,
    Lng,
    CreatedAt,
}
