use crate::domain::event::ErrorCategory;
use crate::store::event_store::CategoryCount;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ErrorsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorsResponse {
    pub by_category: Vec<CategoryCount>,
}

pub async fn errors_by_category(
    State(state): State<AppState>,
    Query(query): Query<ErrorsQuery>,
) -> impl IntoResponse {
    let filter = match query.category.filter(|c| !c.is_empty()) {
        Some(raw) => match ErrorCategory::parse(&raw) {
            Some(category) => Some(category),
            None => {
                return Json(ErrorsResponse {
                    by_category: Vec::new(),
                })
            }
        },
        None => None,
    };

    Json(ErrorsResponse {
        by_category: state.event_store.errors_by_category(filter).await,
    })
}
