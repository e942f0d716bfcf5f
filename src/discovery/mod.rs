//! Nearby food truck discovery: query types, the wire schema of the backend
//! lookup function and the projection handed to readers.

pub mod cache;
pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DiscoveryError;
use crate::utils::geo::{meters_to_miles, Coordinate};

pub use cache::{spawn_session_watcher, DiscoveryCache};
pub use query::{fetch_trucks, find_trucks_near, try_find_trucks_near};

/// Name of the backend function performing the spatial lookup.
pub const TRUCKS_WITHIN_DISTANCE_FN: &str = "get_food_trucks_within_distance";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchQuery {
    pub center: Coordinate,
    pub radius_miles: f64,
}

impl SearchQuery {
    pub fn new(center: Coordinate, radius_miles: f64) -> Result<Self, DiscoveryError> {
        if !center.is_valid() {
            return Err(DiscoveryError::InvalidArgument(format!(
                "center ({}, {}) is outside the valid coordinate range",
                center.lat, center.lng
            )));
        }
        if !(radius_miles.is_finite() && radius_miles > 0.0) {
            return Err(DiscoveryError::InvalidArgument(format!(
                "radius must be a positive number of miles (got {})",
                radius_miles
            )));
        }

        Ok(Self {
            center,
            radius_miles,
        })
    }
}

/// One row returned by the lookup function.
///
/// Distance comes back in meters even though the radius goes out in miles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckRow {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Truck {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub location: Coordinate,
    pub distance_miles: f64,
}

impl TryFrom<TruckRow> for Truck {
    type Error = DiscoveryError;

    fn try_from(row: TruckRow) -> Result<Self, Self::Error> {
        let location = Coordinate::new(row.lat, row.lng);
        if !location.is_valid() {
            return Err(DiscoveryError::MalformedResponse(format!(
                "truck {} has invalid location ({}, {})",
                row.id, row.lat, row.lng
            )));
        }
        if !(row.distance_meters.is_finite() && row.distance_meters >= 0.0) {
            return Err(DiscoveryError::MalformedResponse(format!(
                "truck {} has invalid distance {}",
                row.id, row.distance_meters
            )));
        }

        Ok(Truck {
            id: row.id,
            owner_user_id: row.user_id,
            name: row.name,
            location,
            distance_miles: meters_to_miles(row.distance_meters),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryStatus {
    Idle,
    Loading,
    Success,
    Failed(DiscoveryError),
}

impl DiscoveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryStatus::Idle => "idle",
            DiscoveryStatus::Loading => "loading",
            DiscoveryStatus::Success => "success",
            DiscoveryStatus::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&DiscoveryError> {
        match self {
            DiscoveryStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Snapshot of one discovery slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryResult {
    pub query: Option<SearchQuery>,
    pub trucks: Vec<Truck>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub status: DiscoveryStatus,
}

impl DiscoveryResult {
    pub fn idle() -> Self {
        Self {
            query: None,
            trucks: Vec::new(),
            fetched_at: None,
            status: DiscoveryStatus::Idle,
        }
    }

    pub fn loading(query: SearchQuery) -> Self {
        Self {
            query: Some(query),
            trucks: Vec::new(),
            fetched_at: None,
            status: DiscoveryStatus::Loading,
        }
    }

    pub fn completed(query: SearchQuery, outcome: Result<Vec<Truck>, DiscoveryError>) -> Self {
        let (trucks, status) = match outcome {
            Ok(trucks) => (trucks, DiscoveryStatus::Success),
            Err(e) => (Vec::new(), DiscoveryStatus::Failed(e)),
        };

        Self {
            query: Some(query),
            trucks,
            fetched_at: Some(Utc::now()),
            status,
        }
    }

    /// True when this snapshot is a successful answer to `query`.
    pub fn answers(&self, query: &SearchQuery) -> bool {
        self.status == DiscoveryStatus::Success && self.query.as_ref() == Some(query)
    }
}

// Backends emit either UUID strings or integer keys.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, meters: f64) -> TruckRow {
        TruckRow {
            id: id.to_string(),
            user_id: "owner-1".to_string(),
            name: format!("Truck {}", id),
            lat: 27.24,
            lng: -80.43,
            distance_meters: meters,
        }
    }

    #[test]
    fn search_query_rejects_bad_radius() {
        let center = Coordinate::new(27.235996, -80.427775);
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SearchQuery::new(center, radius),
                Err(DiscoveryError::InvalidArgument(_))
            ));
        }
        assert!(SearchQuery::new(center, 10.0).is_ok());
    }

    #[test]
    fn search_query_rejects_bad_center() {
        let result = SearchQuery::new(Coordinate::new(120.0, 0.0), 5.0);
        assert!(matches!(result, Err(DiscoveryError::InvalidArgument(_))));
    }

    #[test]
    fn converts_meters_to_miles() {
        let truck = Truck::try_from(row("a", 9000.0)).unwrap();
        assert!((truck.distance_miles - 5.59).abs() < 0.005);
        assert_eq!(truck.owner_user_id, "owner-1");
        assert_eq!(truck.location, Coordinate::new(27.24, -80.43));
    }

    #[test]
    fn rejects_rows_with_invalid_fields() {
        let mut bad_location = row("a", 100.0);
        bad_location.lat = 200.0;
        assert!(matches!(
            Truck::try_from(bad_location),
            Err(DiscoveryError::MalformedResponse(_))
        ));

        assert!(matches!(
            Truck::try_from(row("b", -3.0)),
            Err(DiscoveryError::MalformedResponse(_))
        ));
    }

    #[test]
    fn deserializes_numeric_and_text_ids() {
        let rows: Vec<TruckRow> = serde_json::from_value(json!([
            {"id": 7, "user_id": "5d1c", "name": "Tacos", "lat": 27.2, "lng": -80.4, "distance_meters": 12.5},
            {"id": "b2e1", "user_id": 3, "name": "Crepes", "lat": 27.3, "lng": -80.5, "distance_meters": 0}
        ]))
        .unwrap();

        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[1].user_id, "3");
        assert_eq!(rows[1].distance_meters, 0.0);
    }

    #[test]
    fn missing_fields_fail_to_deserialize() {
        let result: Result<Vec<TruckRow>, _> =
            serde_json::from_value(json!([{"id": 1, "name": "No owner", "lat": 0, "lng": 0}]));
        assert!(result.is_err());
    }

    #[test]
    fn answers_requires_success_for_same_query() {
        let query = SearchQuery::new(Coordinate::new(27.2, -80.4), 10.0).unwrap();
        let other = SearchQuery::new(Coordinate::new(27.2, -80.4), 5.0).unwrap();

        assert!(!DiscoveryResult::loading(query).answers(&query));

        let done = DiscoveryResult::completed(query, Ok(Vec::new()));
        assert!(done.answers(&query));
        assert!(!done.answers(&other));

        let failed =
            DiscoveryResult::completed(query, Err(DiscoveryError::Transport("down".into())));
        assert!(!failed.answers(&query));
        assert_eq!(failed.status.label(), "failed");
    }
}
