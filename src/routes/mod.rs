use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{context, discovery};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Truck discovery (map view reads, explicit refreshes, distance helper)
    let discovery_routes = Router::new()
        .route("/trucks/nearby", get(discovery::nearby_trucks))
        .route("/discovery/{slot}", get(discovery::get_slot))
        .route("/discovery/{slot}/refresh", post(discovery::refresh_slot))
        .route("/distance", get(discovery::distance));

    // Shared application context
    let context_routes = Router::new()
        .route("/", get(context::get_context))
        .route("/company", put(context::select_company))
        .route(
            "/session",
            put(context::set_session).delete(context::clear_session),
        );

    Router::new()
        .nest("/api", discovery_routes)
        .nest("/api/context", context_routes)
        .with_state(state)
}
