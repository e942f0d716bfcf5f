use tracing::{debug, error};

use crate::backend::TruckSource;
use crate::error::DiscoveryError;
use crate::utils::geo::Coordinate;

use super::{SearchQuery, Truck};

/// Run one lookup against the backend and project its rows.
///
/// Rows keep backend order. A single malformed row fails the whole response.
pub async fn fetch_trucks(
    source: &dyn TruckSource,
    query: &SearchQuery,
) -> Result<Vec<Truck>, DiscoveryError> {
    let rows = source.trucks_within_distance(query).await?;
    debug!(
        backend = source.name(),
        lat = query.center.lat,
        lng = query.center.lng,
        radius_miles = query.radius_miles,
        count = rows.len(),
        "Truck lookup returned"
    );

    rows.into_iter().map(Truck::try_from).collect()
}

pub async fn try_find_trucks_near(
    source: &dyn TruckSource,
    center: Coordinate,
    radius_miles: f64,
) -> Result<Vec<Truck>, DiscoveryError> {
    let query = SearchQuery::new(center, radius_miles)?;
    fetch_trucks(source, &query).await
}

/// Trucks near `center`, or an empty list if anything goes wrong.
///
/// Use [`try_find_trucks_near`] to tell "none in range" apart from a failure.
pub async fn find_trucks_near(
    source: &dyn TruckSource,
    center: Coordinate,
    radius_miles: f64,
) -> Vec<Truck> {
    match try_find_trucks_near(source, center, radius_miles).await {
        Ok(trucks) => trucks,
        Err(e) => {
            error!(
                backend = source.name(),
                lat = center.lat,
                lng = center.lng,
                radius_miles,
                error = %e,
                "Error fetching nearby food trucks"
            );
            Vec::new()
        }
    }
}
