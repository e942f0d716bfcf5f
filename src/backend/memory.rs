use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::discovery::{SearchQuery, TruckRow};
use crate::error::{AppError, AppResult, DiscoveryError};
use crate::utils::geo::{distance_miles, is_within_radius, miles_to_meters, Coordinate};

use super::TruckSource;

/// A truck known to the in-process backend
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureTruck {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl FixtureTruck {
    fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Fixture-backed stand-in for the backend lookup function: filters to the
/// radius, annotates meters and orders nearest first, like the SQL function.
pub struct MemoryTruckSource {
    trucks: Vec<FixtureTruck>,
}

impl MemoryTruckSource {
    pub fn new(trucks: Vec<FixtureTruck>) -> Self {
        Self { trucks }
    }

    /// Load fixtures from a JSON array file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let trucks = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid fixtures in {}: {}", path.display(), e))
        })?;
        Ok(Self::new(trucks))
    }
}

#[async_trait]
impl TruckSource for MemoryTruckSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn trucks_within_distance(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<TruckRow>, DiscoveryError> {
        let mut rows: Vec<TruckRow> = self
            .trucks
            .iter()
            .filter(|t| is_within_radius(t.location(), query.center, query.radius_miles))
            .map(|t| TruckRow {
                id: t.id.clone(),
                user_id: t.user_id.clone(),
                name: t.name.clone(),
                lat: t.lat,
                lng: t.lng,
                distance_meters: miles_to_meters(distance_miles(query.center, t.location())),
            })
            .collect();

        rows.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck(id: &str, lat: f64, lng: f64) -> FixtureTruck {
        FixtureTruck {
            id: id.to_string(),
            user_id: format!("owner-{}", id),
            name: format!("Truck {}", id),
            lat,
            lng,
        }
    }

    #[tokio::test]
    async fn filters_and_orders_by_distance() {
        let source = MemoryTruckSource::new(vec![
            truck("far", 27.30, -80.35),
            truck("orlando", 28.5383, -81.3792),
            truck("near", 27.236, -80.428),
        ]);
        let query = SearchQuery::new(Coordinate::new(27.235996, -80.427775), 10.0).unwrap();

        let rows = source.trucks_within_distance(&query).await.unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(rows[0].distance_meters < 100.0);
    }

    #[test]
    fn from_file_reports_invalid_json() {
        let path = std::env::temp_dir().join(format!("snacki-fixtures-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = MemoryTruckSource::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
