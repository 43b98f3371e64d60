use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.event_store.stats().await)
}
