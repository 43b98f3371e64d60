use crate::domain::event::{ErrorCategory, EventType, PaymentEvent};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_CAPACITY: usize = 5000;
pub const MAX_PAGE_LIMIT: usize = 200;

/// Process-wide bounded append log of payment lifecycle events. Volatile by
/// design: reset on restart, oldest entries evicted first once capacity is
/// reached. Handles are cheap clones over one shared log.
#[derive(Clone)]
pub struct EventStore {
    inner: Arc<RwLock<VecDeque<PaymentEvent>>>,
    capacity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    pub events: Vec<PaymentEvent>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: ErrorCategory,
    pub count: u64,
    pub last_occurrence: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointVolume {
    pub endpoint: String,
    pub count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub success_rate: f64,
    pub total_volume: f64,
    pub total_revenue: f64,
    pub volume_by_endpoint: Vec<EndpointVolume>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(VecDeque::new())),
            capacity,
        }
    }

    pub async fn append(&self, mut event: PaymentEvent) {
        let mut events = self.inner.write().await;
        // Insertion order owns the timestamp ordering invariant, even if the
        // wall clock stepped back between build and append.
        if let Some(last) = events.back() {
            if event.timestamp < last.timestamp {
                event.timestamp = last.timestamp;
            }
        }
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn list(&self, filter: &EventFilter, offset: usize, limit: usize) -> EventPage {
        let events = self.inner.read().await;
        let matched: Vec<&PaymentEvent> = events
            .iter()
            .filter(|e| filter.event_type.map_or(true, |t| e.event_type == t))
            .filter(|e| filter.endpoint.as_deref().map_or(true, |ep| e.endpoint == ep))
            .collect();

        let total = matched.len();
        let limit = limit.min(MAX_PAGE_LIMIT);
        let mut page: Vec<PaymentEvent> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        page.reverse();

        EventPage { events: page, total }
    }

    pub async fn errors_by_category(&self, category: Option<ErrorCategory>) -> Vec<CategoryCount> {
        let events = self.inner.read().await;
        let mut grouped: BTreeMap<ErrorCategory, CategoryCount> = BTreeMap::new();

        for event in events.iter() {
            let Some(error) = &event.error else { continue };
            if category.is_some_and(|c| c != error.category) {
                continue;
            }
            let entry = grouped.entry(error.category).or_insert(CategoryCount {
                category: error.category,
                count: 0,
                last_occurrence: 0,
            });
            entry.count += 1;
            entry.last_occurrence = entry.last_occurrence.max(event.timestamp);
        }

        grouped.into_values().collect()
    }

    pub async fn stats(&self) -> PaymentStats {
        let events = self.inner.read().await;
        let total = events.len();
        let mut success_count: u64 = 0;
        let mut total_volume = 0.0;
        let mut by_endpoint: BTreeMap<String, EndpointVolume> = BTreeMap::new();

        for event in events.iter() {
            if event.event_type != EventType::PaymentSuccess {
                continue;
            }
            success_count += 1;
            let amount = event.amount.unwrap_or(0.0);
            total_volume += amount;
            let entry = by_endpoint
                .entry(event.endpoint.clone())
                .or_insert(EndpointVolume {
                    endpoint: event.endpoint.clone(),
                    count: 0,
                    revenue: 0.0,
                });
            entry.count += 1;
            entry.revenue += amount;
        }

        let success_rate = if total == 0 {
            0.0
        } else {
            success_count as f64 / total as f64
        };

        PaymentStats {
            success_rate,
            total_volume,
            total_revenue: total_volume,
            volume_by_endpoint: by_endpoint.into_values().collect(),
        }
    }
}
