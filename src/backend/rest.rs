use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::context::AppContext;
use crate::discovery::{SearchQuery, TruckRow, TRUCKS_WITHIN_DISTANCE_FN};
use crate::error::DiscoveryError;

use super::TruckSource;

#[derive(Debug, Serialize)]
struct TrucksWithinDistanceParams {
    lat_in: f64,
    lng_in: f64,
    distance_miles: f64,
}

/// Calls the lookup function through the hosted backend's REST RPC endpoint.
pub struct RestTruckSource {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    context: Arc<AppContext>,
}

impl RestTruckSource {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        context: Arc<AppContext>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            context,
        }
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, TRUCKS_WITHIN_DISTANCE_FN)
    }
}

#[async_trait]
impl TruckSource for RestTruckSource {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn trucks_within_distance(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<TruckRow>, DiscoveryError> {
        let params = TrucksWithinDistanceParams {
            lat_in: query.center.lat,
            lng_in: query.center.lng,
            distance_miles: query.radius_miles,
        };

        // Signed-in users query with their own token, everyone else with the anon key.
        let bearer = self
            .context
            .session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.anon_key.clone());

        debug!(url = %self.rpc_url(), ?params, "Calling truck lookup RPC");

        let response = self
            .client
            .post(self.rpc_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .json(&params)
            .send()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(DiscoveryError::Backend {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DiscoveryError::MalformedResponse(e.to_string()))
    }
}
