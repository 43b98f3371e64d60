use crate::domain::event::EventType;
use crate::store::event_store::{EventFilter, EventPage};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub endpoint: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    let mut filter = EventFilter {
        endpoint: query.endpoint.filter(|e| !e.is_empty()),
        ..Default::default()
    };

    if let Some(raw) = query.event_type.filter(|t| !t.is_empty()) {
        match EventType::parse(&raw) {
            Some(event_type) => filter.event_type = Some(event_type),
            // An event type the schema does not know matches nothing.
            None => {
                return Json(EventPage {
                    events: Vec::new(),
                    total: 0,
                })
            }
        }
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0);
    Json(state.event_store.list(&filter, offset, limit).await)
}
