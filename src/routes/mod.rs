// HTTP routes

mod error;
mod graph;
mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregation::AggregateOptions;
use crate::config::AppConfig;
use crate::node_source::NodeSource;

pub use error::ApiError;
pub use graph::parse_elements;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) source: Arc<dyn NodeSource>,
    pub(crate) options: AggregateOptions,
    pub(crate) default_elements: Arc<Vec<String>>,
}

pub fn app(source: Arc<dyn NodeSource>, config: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState {
        source,
        options: config.aggregation.options()?,
        default_elements: Arc::new(config.chart.default_elements.clone()),
    };
    Ok(Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/graph", get(graph::graph_handler)) // GET /api/graph
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state))
}
