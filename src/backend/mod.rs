mod memory;
mod postgres;
mod rest;

use async_trait::async_trait;

use crate::discovery::{SearchQuery, TruckRow};
use crate::error::DiscoveryError;

pub use memory::{FixtureTruck, MemoryTruckSource};
pub use postgres::PgTruckSource;
pub use rest::RestTruckSource;

/// A backend able to answer the "trucks within distance" lookup.
///
/// Implementations return rows exactly as the backend produced them: already
/// filtered to the radius, annotated with `distance_meters`, in backend order.
/// One call is one attempt; there are no retries.
#[async_trait]
pub trait TruckSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn trucks_within_distance(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<TruckRow>, DiscoveryError>;
}
