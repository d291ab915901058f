// GET /api/graph — fetch one user's nodes, average the month, return chart data.
// Each request builds its own ChartData; nothing is shared between renders.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::AppState;
use super::error::ApiError;
use crate::aggregation::aggregate;
use crate::models::{ChartData, FieldMatch, Month};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphQuery {
    pub user: Option<String>,
    pub month: Option<String>,
    /// Comma-separated element names.
    pub elements: Option<String>,
}

/// Splits `a, b,,c` into trimmed, non-empty names normalized for `policy`.
pub fn parse_elements(raw: &str, policy: FieldMatch) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| policy.normalize(e))
        .collect()
}

#[instrument(skip(state), fields(route = "graph"))]
pub(super) async fn graph_handler(
    State(state): State<AppState>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<ChartData>, ApiError> {
    let user = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("user is required".into()))?;
    let month: Month = query
        .month
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("month is required".into()))?
        .parse()?;

    let mut elements = query
        .elements
        .as_deref()
        .map(|raw| parse_elements(raw, state.options.field_match))
        .unwrap_or_default();
    if elements.is_empty() {
        elements = state.default_elements.as_ref().clone();
    }
    if elements.is_empty() {
        return Err(ApiError::BadRequest("elements is required".into()));
    }

    let nodes = state.source.fetch_nodes(user).await?;
    let averages = aggregate(&nodes, month, &elements, &state.options)?;
    info!(%month, days = averages.len(), elements = elements.len(), "graph data built");
    Ok(Json(ChartData::build(month, &averages, &elements)))
}
