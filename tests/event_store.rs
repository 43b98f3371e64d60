use serde_json::json;
use x402_gateway::domain::event::{
    ErrorCategory, ErrorInfo, EventDraft, EventType, PaymentEvent,
};
use x402_gateway::store::event_store::{EventFilter, EventStore};

const SALT: &str = "test-salt";

fn event(event_type: EventType, endpoint: &str, amount: f64) -> PaymentEvent {
    PaymentEvent::from_draft(
        EventDraft {
            event_type,
            endpoint: endpoint.to_string(),
            status: match event_type {
                EventType::PaymentRequired => 402,
                EventType::PaymentSuccess => 200,
                EventType::PaymentFailed => 403,
            },
            amount: Some(amount),
            currency: Some("APT".to_string()),
            payer: None,
            request_id: "r".to_string(),
            trace_id: "t".to_string(),
            error: None,
            metadata: None,
        },
        SALT,
    )
}

fn failed_event(endpoint: &str, category: ErrorCategory) -> PaymentEvent {
    let mut e = event(EventType::PaymentFailed, endpoint, 0.01);
    e.error = Some(ErrorInfo {
        code: "some_code".to_string(),
        category,
        message: "failure".to_string(),
    });
    e
}

#[tokio::test]
async fn append_evicts_oldest_past_capacity() {
    let store = EventStore::with_capacity(3);
    for i in 0..5 {
        store
            .append(event(EventType::PaymentRequired, &format!("/api/e{}", i), 0.01))
            .await;
    }

    assert_eq!(store.len().await, 3);
    let page = store.list(&EventFilter::default(), 0, 10).await;
    assert_eq!(page.total, 3);
    let endpoints: Vec<&str> = page.events.iter().map(|e| e.endpoint.as_str()).collect();
    // Oldest two evicted; page reads most-recent-first.
    assert_eq!(endpoints, vec!["/api/e4", "/api/e3", "/api/e2"]);
}

#[tokio::test]
async fn list_filters_by_type_and_endpoint() {
    let store = EventStore::default();
    store.append(event(EventType::PaymentRequired, "/api/a", 0.01)).await;
    store.append(event(EventType::PaymentSuccess, "/api/a", 0.01)).await;
    store.append(event(EventType::PaymentSuccess, "/api/b", 0.02)).await;
    store.append(failed_event("/api/b", ErrorCategory::SignatureFailure)).await;

    let by_type = store
        .list(
            &EventFilter {
                event_type: Some(EventType::PaymentSuccess),
                endpoint: None,
            },
            0,
            50,
        )
        .await;
    assert_eq!(by_type.total, 2);
    assert!(by_type
        .events
        .iter()
        .all(|e| e.event_type == EventType::PaymentSuccess));

    let by_endpoint = store
        .list(
            &EventFilter {
                event_type: None,
                endpoint: Some("/api/b".to_string()),
            },
            0,
            50,
        )
        .await;
    assert_eq!(by_endpoint.total, 2);

    let both = store
        .list(
            &EventFilter {
                event_type: Some(EventType::PaymentSuccess),
                endpoint: Some("/api/b".to_string()),
            },
            0,
            50,
        )
        .await;
    assert_eq!(both.total, 1);
    assert_eq!(both.events[0].endpoint, "/api/b");
}

#[tokio::test]
async fn list_pages_from_oldest_and_reads_newest_first() {
    let store = EventStore::default();
    for i in 0..5 {
        store
            .append(event(EventType::PaymentRequired, &format!("/api/e{}", i), 0.01))
            .await;
    }

    let page = store.list(&EventFilter::default(), 1, 2).await;
    assert_eq!(page.total, 5);
    let endpoints: Vec<&str> = page.events.iter().map(|e| e.endpoint.as_str()).collect();
    assert_eq!(endpoints, vec!["/api/e2", "/api/e1"]);

    let past_end = store.list(&EventFilter::default(), 10, 2).await;
    assert_eq!(past_end.total, 5);
    assert!(past_end.events.is_empty());
}

#[tokio::test]
async fn list_clamps_limit() {
    let store = EventStore::default();
    for _ in 0..250 {
        store.append(event(EventType::PaymentRequired, "/api/a", 0.01)).await;
    }

    let page = store.list(&EventFilter::default(), 0, 1000).await;
    assert_eq!(page.total, 250);
    assert_eq!(page.events.len(), 200);
}

#[tokio::test]
async fn stats_handle_the_empty_store() {
    let store = EventStore::default();
    let stats = store.stats().await;
    assert_eq!(stats.success_rate, 0.0);
    assert_eq!(stats.total_volume, 0.0);
    assert_eq!(stats.total_revenue, 0.0);
    assert!(stats.volume_by_endpoint.is_empty());
}

#[tokio::test]
async fn stats_aggregate_successes_per_endpoint() {
    let store = EventStore::default();
    store.append(event(EventType::PaymentSuccess, "/api/a", 0.01)).await;
    store.append(event(EventType::PaymentSuccess, "/api/a", 0.01)).await;
    store.append(event(EventType::PaymentSuccess, "/api/b", 0.02)).await;
    store.append(failed_event("/api/a", ErrorCategory::SignatureFailure)).await;
    store.append(event(EventType::PaymentRequired, "/api/b", 0.02)).await;
    store.append(failed_event("/api/b", ErrorCategory::RpcError)).await;

    let stats = store.stats().await;
    assert!((stats.success_rate - 0.5).abs() < 1e-9);
    assert!((stats.total_volume - 0.04).abs() < 1e-9);
    assert_eq!(stats.total_revenue, stats.total_volume);

    assert_eq!(stats.volume_by_endpoint.len(), 2);
    let a = &stats.volume_by_endpoint[0];
    assert_eq!(a.endpoint, "/api/a");
    assert_eq!(a.count, 2);
    assert!((a.revenue - 0.02).abs() < 1e-9);
    let b = &stats.volume_by_endpoint[1];
    assert_eq!(b.endpoint, "/api/b");
    assert_eq!(b.count, 1);
    assert!((b.revenue - 0.02).abs() < 1e-9);
}

#[tokio::test]
async fn errors_group_by_category() {
    let store = EventStore::default();
    store.append(failed_event("/api/a", ErrorCategory::SignatureFailure)).await;
    store.append(failed_event("/api/a", ErrorCategory::SignatureFailure)).await;
    store.append(failed_event("/api/b", ErrorCategory::RpcError)).await;
    // Events without an error never enter the breakdown.
    store.append(event(EventType::PaymentSuccess, "/api/a", 0.01)).await;

    let grouped = store.errors_by_category(None).await;
    assert_eq!(grouped.len(), 2);

    let signature = grouped
        .iter()
        .find(|c| c.category == ErrorCategory::SignatureFailure)
        .unwrap();
    assert_eq!(signature.count, 2);
    let rpc = grouped
        .iter()
        .find(|c| c.category == ErrorCategory::RpcError)
        .unwrap();
    assert_eq!(rpc.count, 1);

    let only_rpc = store
        .errors_by_category(Some(ErrorCategory::RpcError))
        .await;
    assert_eq!(only_rpc.len(), 1);
    assert_eq!(only_rpc[0].category, ErrorCategory::RpcError);
}

#[tokio::test]
async fn error_grouping_tracks_last_occurrence() {
    let store = EventStore::default();
    let mut first = failed_event("/api/a", ErrorCategory::RpcError);
    first.timestamp = 1_000;
    let mut second = failed_event("/api/a", ErrorCategory::RpcError);
    second.timestamp = 2_000;
    store.append(first).await;
    store.append(second).await;

    let grouped = store.errors_by_category(None).await;
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].count, 2);
    assert_eq!(grouped[0].last_occurrence, 2_000);
}

#[tokio::test]
async fn append_keeps_timestamps_monotonic() {
    let store = EventStore::default();
    let mut first = event(EventType::PaymentRequired, "/api/a", 0.01);
    first.timestamp = 5_000;
    let mut stale = event(EventType::PaymentRequired, "/api/a", 0.01);
    stale.timestamp = 4_000;

    store.append(first).await;
    store.append(stale).await;

    let page = store.list(&EventFilter::default(), 0, 10).await;
    // Newest-first page: the clamped event comes first.
    assert_eq!(page.events[0].timestamp, 5_000);
    assert_eq!(page.events[1].timestamp, 5_000);
}

#[tokio::test]
async fn metadata_round_trips_through_the_store() {
    let store = EventStore::default();
    let mut e = event(EventType::PaymentSuccess, "/api/a", 0.01);
    e.metadata = Some(json!({"txn_hash": "0xhash", "block_height": "123"}));
    store.append(e).await;

    let page = store.list(&EventFilter::default(), 0, 10).await;
    assert_eq!(page.events[0].metadata.as_ref().unwrap()["txn_hash"], json!("0xhash"));
}
