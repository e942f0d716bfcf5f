use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discovery::{DiscoveryResult, SearchQuery, Truck};
use crate::error::AppResult;
use crate::utils::geo::{distance_miles, Coordinate};
use crate::AppState;

pub const DEFAULT_SLOT: &str = "map";

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
    pub radius_miles: Option<f64>,
    pub slot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub lat: f64,
    pub lng: f64,
    pub radius_miles: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub slot: String,
    pub status: &'static str,
    pub error: Option<String>,
    pub query: Option<SearchQuery>,
    pub trucks: Vec<Truck>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DiscoveryResponse {
    fn new(slot: String, result: DiscoveryResult) -> Self {
        Self {
            slot,
            status: result.status.label(),
            error: result.status.error().map(|e| e.to_string()),
            query: result.query,
            trucks: result.trucks,
            fetched_at: result.fetched_at,
        }
    }
}

/// Nearby trucks for a map view, served from the slot when it already holds
/// a successful answer to the same query
pub async fn nearby_trucks(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<DiscoveryResponse>> {
    let radius = params.radius_miles.unwrap_or(state.config.default_radius_miles);
    let query = SearchQuery::new(Coordinate::new(params.lat, params.lng), radius)?;
    let slot = params.slot.unwrap_or_else(|| DEFAULT_SLOT.to_string());

    let cached = state.discovery.current(&slot).await;
    let result = if cached.answers(&query) {
        cached
    } else {
        state.discovery.refresh(&slot, query).await
    };

    Ok(Json(DiscoveryResponse::new(slot, result)))
}

/// Current snapshot of a slot
pub async fn get_slot(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Json<DiscoveryResponse> {
    let result = state.discovery.current(&slot).await;
    Json(DiscoveryResponse::new(slot, result))
}

/// Force a new lookup for a slot
pub async fn refresh_slot(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<DiscoveryResponse>> {
    let radius = payload.radius_miles.unwrap_or(state.config.default_radius_miles);
    let query = SearchQuery::new(Coordinate::new(payload.lat, payload.lng), radius)?;

    let result = state.discovery.refresh(&slot, query).await;
    Ok(Json(DiscoveryResponse::new(slot, result)))
}

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub miles: f64,
}

/// Great-circle distance between two points
pub async fn distance(Query(params): Query<DistanceParams>) -> Json<DistanceResponse> {
    let miles = distance_miles(
        Coordinate::new(params.from_lat, params.from_lng),
        Coordinate::new(params.to_lat, params.to_lng),
    );
    Json(DistanceResponse { miles })
}
