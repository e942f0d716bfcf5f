use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::error::{AppError, AppResult};

/// Governor layer keyed by client IP
pub type PublicGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Create a GovernorLayer for the public discovery API (per IP address)
/// - 120 requests per minute (one token every 500ms)
/// - Map views refresh on every pan, so bursts of up to 30 are allowed
pub fn create_public_governor() -> AppResult<PublicGovernorLayer> {
    governor_layer(500, 30)
}

fn governor_layer(replenish_ms: u64, burst: u32) -> AppResult<PublicGovernorLayer> {
    let config = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(burst)
        .finish()
        .ok_or_else(|| AppError::Config("Invalid rate limit configuration".to_string()))?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

/// Wrap the API in the rate limiter, with request logging outside it so that
/// throttled lookups are logged too.
pub fn with_rate_limit(router: Router, governor: PublicGovernorLayer) -> Router {
    router
        .layer(governor)
        .layer(middleware::from_fn(log_request))
}

/// One log line per API call, with latency; rejections at WARN
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match status {
        StatusCode::TOO_MANY_REQUESTS => tracing::warn!(
            client_ip = %addr.ip(),
            %method,
            path = %path,
            "Rate limited discovery request"
        ),
        s if s.is_client_error() || s.is_server_error() => tracing::warn!(
            client_ip = %addr.ip(),
            %method,
            path = %path,
            status = s.as_u16(),
            elapsed_ms,
            "Discovery request failed"
        ),
        s => tracing::debug!(
            client_ip = %addr.ip(),
            %method,
            path = %path,
            status = s.as_u16(),
            elapsed_ms,
            "Discovery request served"
        ),
    }

    response
}
