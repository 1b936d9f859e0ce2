//! End-to-end dispatch tests over in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use hookwire_engine::mock::{
    FailingHookRepository, MapCustomerLookup, MapProductLookup, MemoryHookRepository,
    MemoryHistoryStore, RecordingNotifier, ScriptedTransport,
};
use hookwire_engine::transport::TransportService;
use hookwire_engine::{
    DispatchConfig, DispatchEngine, Enricher, EventItem, FilterSet, Hook, HookType, LineItem,
    Order, TemplateRenderer,
};

const CART_URL: &str = "https://shop.example.com/checkout/cart";

struct Harness {
    history: Arc<MemoryHistoryStore>,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
    engine: DispatchEngine,
}

fn harness(hooks: Vec<Hook>, transport: ScriptedTransport) -> Harness {
    harness_with(hooks, transport, MemoryHistoryStore::new(), RecordingNotifier::new())
}

fn harness_with(
    hooks: Vec<Hook>,
    transport: ScriptedTransport,
    history: MemoryHistoryStore,
    notifier: RecordingNotifier,
) -> Harness {
    let history = Arc::new(history);
    let transport = Arc::new(transport);
    let notifier = Arc::new(notifier);

    let enricher = Enricher::new(
        Arc::new(MapProductLookup::new(HashMap::new())),
        Arc::new(MapCustomerLookup::new(HashMap::new())),
        CART_URL,
    );

    let engine = DispatchEngine::new(
        MemoryHookRepository::new(hooks),
        Arc::clone(&history),
        TransportService::new(Arc::clone(&transport)),
        Arc::clone(&notifier),
        enricher,
        TemplateRenderer::new(FilterSet::default()),
    );

    Harness {
        history,
        transport,
        notifier,
        engine,
    }
}

fn order_item() -> EventItem {
    let mut order = Order::new("1001", "processing");
    order.store_id = Some("1".into());
    order.grand_total = 99.5;
    order.items = vec![LineItem::new("42", "SKU-42", 99.5)];
    EventItem::Order(order)
}

fn order_hook(name: &str) -> Hook {
    Hook::new(name, HookType::Order, "https://example.com/h/{{item.increment_id}}")
        .with_order_statuses("processing")
        .with_method("POST")
        .with_body(r#"{"order":"{{item.increment_id}}","total":"{{item.order_total_formatted}}"}"#)
        .with_content_type("application/json")
}

#[tokio::test]
async fn test_dispatch_renders_and_delivers() {
    let h = harness(vec![order_hook("order-placed")], ScriptedTransport::with_status(200, "OK"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, "https://example.com/h/1001");
    assert_eq!(requests[0].body, r#"{"order":"1001","total":"99.50"}"#);
    assert!(requests[0]
        .headers
        .iter()
        .any(|line| line == "Content-Type: application/json"));

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_success());
    assert_eq!(records[0].payload_url, "https://example.com/h/1001");
    assert!(h.notifier.alerts().is_empty());
}

#[tokio::test]
async fn test_disabled_config_is_a_noop() {
    let h = harness(vec![order_hook("order-placed")], ScriptedTransport::with_status(200, "OK"));

    let config = DispatchConfig::default().disabled();
    h.engine.dispatch(&order_item(), &config).await.unwrap();

    assert!(h.transport.requests().is_empty());
    assert!(h.history.records().is_empty());
}

#[tokio::test]
async fn test_hooks_fire_in_priority_order() {
    let hooks = vec![
        order_hook("late").with_priority(10),
        order_hook("early").with_priority(-1),
        order_hook("middle").with_priority(3),
    ];
    let h = harness(hooks, ScriptedTransport::with_status(200, "OK"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let names: Vec<_> = h.history.records().iter().map(|r| r.hook_name.clone()).collect();
    assert_eq!(names, ["early", "middle", "late"]);
}

#[tokio::test]
async fn test_disabled_and_unmatched_hooks_are_skipped() {
    let hooks = vec![
        order_hook("fires"),
        order_hook("off").disabled(),
        order_hook("other-store").with_store_scope(["9"]),
        order_hook("other-status").with_order_statuses("complete"),
    ];
    let h = harness(hooks, ScriptedTransport::with_status(200, "OK"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hook_name, "fires");
}

#[tokio::test]
async fn test_failing_hook_does_not_block_later_hooks() {
    let hooks = vec![
        order_hook("first").with_priority(1),
        order_hook("second").with_priority(2),
    ];
    let transport = ScriptedTransport::default()
        .then_error("connection refused")
        .then_status(200, "OK");
    let h = harness(hooks, transport);

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let records = h.history.records();
    assert_eq!(records.len(), 2);
    assert!(!records[0].is_success());
    assert_eq!(records[0].message.as_deref(), Some("[network_error]: connection refused"));
    assert!(records[1].is_success());
}

#[tokio::test]
async fn test_non_2xx_response_is_recorded_as_error() {
    let h = harness(vec![order_hook("order-placed")], ScriptedTransport::with_status(503, "Service Unavailable"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_success());
    assert!(records[0].response.starts_with("HTTP/1.1 503"));
}

#[tokio::test]
async fn test_render_failure_degrades_to_empty_strings() {
    // Unclosed block: both templates fail to parse, so the request goes out
    // with empty URL and body and the attempt is still recorded.
    let hook = Hook::new("broken", HookType::Order, "{{#if item.status}}")
        .with_order_statuses("processing")
        .with_body("{{#each item.items}}");
    let h = harness(vec![hook], ScriptedTransport::default().then_error("empty url"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests[0].url, "");
    assert_eq!(requests[0].body, "");
    assert_eq!(h.history.records().len(), 1);
}

#[tokio::test]
async fn test_malformed_headers_produce_error_record() {
    // Pre-send failure: the request never reaches the transport, but the
    // attempt is still recorded with an empty response and a message.
    let hook = order_hook("bad-headers")
        .with_headers(hookwire_engine::HeaderSpec::Encoded("{broken".to_string()));
    let h = harness(vec![hook], ScriptedTransport::with_status(200, "OK"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    assert!(h.transport.requests().is_empty());
    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_success());
    assert!(records[0].response.is_empty());
    assert!(records[0].message.is_some());
}

#[tokio::test]
async fn test_alerts_fire_only_when_enabled() {
    let h = harness(vec![order_hook("flaky")], ScriptedTransport::default().then_error("timed out"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();
    assert!(h.notifier.alerts().is_empty());

    let config = DispatchConfig::default()
        .with_alerts(["ops@example.com"])
        .with_email_template("hook_failure");
    h.engine.dispatch(&order_item(), &config).await.unwrap();

    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].recipients, ["ops@example.com"]);
    assert_eq!(alerts[0].template_id, "hook_failure");
    assert_eq!(alerts[0].store_id, "1");
    assert!(alerts[0].message.contains("flaky"));
}

#[tokio::test]
async fn test_notifier_failure_is_swallowed() {
    let h = harness_with(
        vec![order_hook("flaky")],
        ScriptedTransport::default().then_error("timed out"),
        MemoryHistoryStore::new(),
        RecordingNotifier::failing(),
    );

    let config = DispatchConfig::default().with_alerts(["ops@example.com"]);
    h.engine.dispatch(&order_item(), &config).await.unwrap();

    // The record is still appended despite the alert failing.
    assert_eq!(h.history.records().len(), 1);
}

#[tokio::test]
async fn test_history_append_failure_does_not_stop_the_loop() {
    let hooks = vec![
        order_hook("first").with_priority(1),
        order_hook("second").with_priority(2),
    ];
    let h = harness_with(
        hooks,
        ScriptedTransport::with_status(200, "OK"),
        MemoryHistoryStore::failing(),
        RecordingNotifier::new(),
    );

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    // Both hooks were still delivered.
    assert_eq!(h.transport.requests().len(), 2);
}

#[tokio::test]
async fn test_hook_storage_failure_escapes() {
    let engine = DispatchEngine::new(
        FailingHookRepository,
        MemoryHistoryStore::new(),
        TransportService::new(ScriptedTransport::with_status(200, "OK")),
        RecordingNotifier::new(),
        Enricher::new(
            Arc::new(MapProductLookup::default()),
            Arc::new(MapCustomerLookup::default()),
            CART_URL,
        ),
        TemplateRenderer::default(),
    );

    let result = engine.dispatch(&order_item(), &DispatchConfig::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_default_store_id_applies_to_storeless_items() {
    let hooks = vec![
        order_hook("default-store").with_store_scope(["1"]),
        order_hook("other-store").with_store_scope(["2"]),
    ];
    let h = harness(hooks, ScriptedTransport::with_status(200, "OK"));

    let mut order = Order::new("1002", "processing");
    order.store_id = None;
    h.engine
        .dispatch(&EventItem::Order(order), &DispatchConfig::default())
        .await
        .unwrap();

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hook_name, "default-store");
}

#[tokio::test]
async fn test_cloned_engine_shares_collaborators() {
    let h = harness(vec![order_hook("order-placed")], ScriptedTransport::with_status(200, "OK"));

    let clone = h.engine.clone();
    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();
    clone.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    assert_eq!(h.history.records().len(), 2);
}

#[tokio::test]
async fn test_broadcast_ignores_order_status_filter() {
    let hook = order_hook("status-filtered").with_order_statuses("processing");
    let h = harness(vec![hook], ScriptedTransport::with_status(200, "OK"));

    let pending = EventItem::Order(Order::new("1003", "pending"));
    h.engine
        .broadcast(&pending, HookType::Order, &DispatchConfig::default())
        .await
        .unwrap();

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hook_name, "status-filtered");
}

#[tokio::test]
async fn test_broadcast_ignores_store_scope() {
    let hooks = vec![
        order_hook("near").with_store_scope(["1"]),
        order_hook("far").with_store_scope(["42"]),
        order_hook("off").disabled(),
    ];
    let h = harness(hooks, ScriptedTransport::with_status(200, "OK"));

    h.engine
        .broadcast(&order_item(), HookType::Order, &DispatchConfig::default())
        .await
        .unwrap();

    let mut names: Vec<_> = h.history.records().iter().map(|r| r.hook_name.clone()).collect();
    names.sort();
    assert_eq!(names, ["far", "near"]);
}

#[tokio::test]
async fn test_basic_auth_header_is_attached() {
    let hook = order_hook("authed").with_basic_auth("user", "pass");
    let h = harness(vec![hook], ScriptedTransport::with_status(200, "OK"));

    h.engine.dispatch(&order_item(), &DispatchConfig::default()).await.unwrap();

    let requests = h.transport.requests();
    assert!(requests[0]
        .headers
        .iter()
        .any(|line| line == "Authorization: Basic dXNlcjpwYXNz"));
}
