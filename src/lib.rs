pub mod backend;
pub mod config;
pub mod context;
pub mod db;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use context::AppContext;
use discovery::DiscoveryCache;

pub use config::Config;
pub use error::{AppError, AppResult, DiscoveryError};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub context: Arc<AppContext>,
    pub discovery: Arc<DiscoveryCache>,
}
