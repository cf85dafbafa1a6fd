//! Generation backend status.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    match &state.backend {
        Some(analyzer) => {
            let status = analyzer.status().await;
            Json(json!({
                "enabled": true,
                "ready": status.is_ready(),
                "reachable": status.reachable,
                "model": status.model,
                "model_available": status.model_available,
                "models": status.models,
            }))
        }
        None => Json(json!({ "enabled": false })),
    }
}
