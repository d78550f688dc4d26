//! Liveness and storage readiness

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when storage does not answer
    pub status: &'static str,
    pub storage: bool,
    pub version: &'static str,
}

/// GET /health - 503 while storage is unreachable
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let storage = state.graph.storage_ready().await;
    let (code, status) = if storage {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            storage,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::graph;

    #[tokio::test]
    async fn memory_store_is_always_ready() {
        let (graph, _) = graph();
        let (code, Json(body)) = health(State(Arc::new(AppState { graph }))).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert!(body.storage);
    }
}
