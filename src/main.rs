use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snacki_discovery::{
    backend::{MemoryTruckSource, PgTruckSource, RestTruckSource, TruckSource},
    config::{BackendKind, Config},
    context::{AppContext, Session},
    db,
    discovery::{spawn_session_watcher, DiscoveryCache},
    middleware::rate_limit::{create_public_governor, with_rate_limit},
    routes, AppError, AppResult, AppState,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snacki_discovery=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting server at {} ({:?} backend)", config.server_addr(), config.backend);

    let context = Arc::new(AppContext::new());
    if let Some(token) = &config.session_token {
        context.set_session(Some(Session::new(token.clone())));
    }

    let source = build_source(&config, context.clone()).await?;
    let discovery = Arc::new(DiscoveryCache::new(source));
    spawn_session_watcher(context.clone(), discovery.clone());

    let state = AppState {
        config: config.clone(),
        context,
        discovery,
    };

    let app = with_rate_limit(routes::create_router(state), create_public_governor()?)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn build_source(config: &Config, context: Arc<AppContext>) -> AppResult<Arc<dyn TruckSource>> {
    let source: Arc<dyn TruckSource> = match config.backend {
        BackendKind::Rest => {
            let (Some(api_url), Some(anon_key)) = (&config.api_url, &config.anon_key) else {
                return Err(AppError::Config(
                    "SNACKI_API_URL and SNACKI_ANON_KEY must be set".to_string(),
                ));
            };
            Arc::new(RestTruckSource::new(
                reqwest::Client::new(),
                api_url.clone(),
                anon_key.clone(),
                context,
            ))
        }
        BackendKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;
            let db = db::connect(database_url).await?;
            tracing::info!("Connected to database");
            Arc::new(PgTruckSource::new(db))
        }
        BackendKind::Memory => match &config.fixtures_path {
            Some(path) => Arc::new(MemoryTruckSource::from_file(path)?),
            None => {
                tracing::warn!("SNACKI_FIXTURES not set, memory backend starts empty");
                Arc::new(MemoryTruckSource::new(Vec::new()))
            }
        },
    };

    Ok(source)
}
