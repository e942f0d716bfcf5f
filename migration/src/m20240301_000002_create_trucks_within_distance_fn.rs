use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Radius is given in miles, distances are returned in meters, nearest first.
const CREATE_FN: &str = r#"
CREATE OR REPLACE FUNCTION get_food_trucks_within_distance(
    lat_in double precision,
    lng_in double precision,
    distance_miles double precision
)
RETURNS TABLE (
    id uuid,
    user_id uuid,
    name text,
    lat double precision,
    lng double precision,
    distance_meters double precision
)
LANGUAGE sql STABLE
AS $$
    SELECT t.id, t.user_id, t.name::text, t.lat, t.lng, d.meters
    FROM food_trucks t
    CROSS JOIN LATERAL (
        SELECT 2 * 6371008.8 * asin(sqrt(
            power(sin(radians(t.lat - lat_in) / 2), 2)
            + cos(radians(lat_in)) * cos(radians(t.lat))
              * power(sin(radians(t.lng - lng_in) / 2), 2)
        )) AS meters
    ) d
    WHERE d.meters <= distance_miles * 1609.344
    ORDER BY d.meters;
$$;
"#;

const DROP_FN: &str = "DROP FUNCTION IF EXISTS get_food_trucks_within_distance(double precision, double precision, double precision);";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(CREATE_FN).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_FN).await?;
        Ok(())
    }
}
