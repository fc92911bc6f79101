use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "signer": state.context.as_ref().map(|ctx| format!("{:?}", ctx.signer.address())),
        "actions": state.actions.len(),
    }))
}
