// GET handlers: banner, version

use axum::response::IntoResponse;

use crate::version::{BANNER, NAME, VERSION};

/// GET / — plain-text banner.
pub(super) async fn root_handler() -> &'static str {
    BANNER
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
