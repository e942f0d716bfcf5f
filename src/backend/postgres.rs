use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};

use crate::discovery::{SearchQuery, TruckRow};
use crate::error::DiscoveryError;

use super::TruckSource;

const TRUCKS_WITHIN_DISTANCE_SQL: &str = r#"
SELECT id::text AS id, user_id::text AS user_id, name, lat, lng, distance_meters
FROM get_food_trucks_within_distance($1, $2, $3)
"#;

#[derive(Debug, FromQueryResult)]
struct FunctionRow {
    id: String,
    user_id: String,
    name: String,
    lat: f64,
    lng: f64,
    distance_meters: f64,
}

impl From<FunctionRow> for TruckRow {
    fn from(row: FunctionRow) -> Self {
        TruckRow {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            lat: row.lat,
            lng: row.lng,
            distance_meters: row.distance_meters,
        }
    }
}

/// Calls the lookup function directly over a Postgres connection.
pub struct PgTruckSource {
    db: DatabaseConnection,
}

impl PgTruckSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn statement(query: &SearchQuery) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        TRUCKS_WITHIN_DISTANCE_SQL,
        [
            query.center.lat.into(),
            query.center.lng.into(),
            query.radius_miles.into(),
        ],
    )
}

fn backend_error(err: DbErr) -> DiscoveryError {
    match err {
        DbErr::Type(message) | DbErr::Json(message) => DiscoveryError::MalformedResponse(message),
        other => DiscoveryError::Backend {
            status: 500,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl TruckSource for PgTruckSource {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn trucks_within_distance(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<TruckRow>, DiscoveryError> {
        let rows = FunctionRow::find_by_statement(statement(query))
            .all(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(rows.into_iter().map(TruckRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geo::Coordinate;
    use sea_orm::Value;

    #[test]
    fn binds_center_and_radius_in_function_order() {
        let query = SearchQuery::new(Coordinate::new(27.235996, -80.427775), 10.0).unwrap();
        let stmt = statement(&query);

        assert!(stmt.sql.contains("get_food_trucks_within_distance($1, $2, $3)"));
        let values = stmt.values.unwrap().0;
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], Value::Double(Some(27.235996)));
        assert_eq!(values[2], Value::Double(Some(10.0)));
    }

    #[test]
    fn decode_failures_are_malformed() {
        let err = backend_error(DbErr::Type("column lat is null".to_string()));
        assert!(matches!(err, DiscoveryError::MalformedResponse(_)));

        let err = backend_error(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, DiscoveryError::Backend { status: 500, .. }));
    }
}
