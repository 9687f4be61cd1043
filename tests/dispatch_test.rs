use azure_log_forwarder::dispatch::{BatchDispatcher, DispatchError, DispatchSummary};
use azure_log_forwarder::test_support::MemorySink;
use serde_json::{Value, json};
use std::sync::Arc;

const SEARCH_RESOURCE: &str = "/SUBSCRIPTIONS/0E0B74F5-FE07-494D-91BC-8EB65E41438B/RESOURCEGROUPS/TEMPLATE_RESOURCEGROUP/PROVIDERS/MICROSOFT.SEARCH/SEARCHSERVICES/VMWARESEARCH";

fn setup() -> (Arc<MemorySink>, BatchDispatcher) {
    let sink = Arc::new(MemorySink::new());
    let dispatcher = BatchDispatcher::new(sink.clone());
    (sink, dispatcher)
}

#[tokio::test]
async fn test_ndjson_blob_sends_one_request_per_line() {
    let (sink, dispatcher) = setup();

    let summary = dispatcher
        .dispatch_blob("{\"a\":1}\n{\"a\":2}")
        .await
        .unwrap();

    assert_eq!(
        summary,
        DispatchSummary {
            processed: 2,
            delivered: 2,
            failed: 0
        }
    );

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["a"], json!(1));
    assert_eq!(records[1]["a"], json!(2));
    for record in &records {
        assert_eq!(record["logsource"], json!("blob_storage"));
        assert_eq!(record["log_type"], json!("azure_log"));
        assert!(record["ingest_timestamp"].is_i64());
    }
}

#[tokio::test]
async fn test_blob_records_document_is_split() {
    let (sink, dispatcher) = setup();
    let blob = json!({"records": [
        {"resourceId": SEARCH_RESOURCE, "category": "Policy"},
        {"resourceId": SEARCH_RESOURCE, "category": "Audit"}
    ]})
    .to_string();

    let summary = dispatcher.dispatch_blob(blob).await.unwrap();
    assert_eq!(summary.delivered, 2);

    let records = sink.records();
    assert_eq!(records[0]["category"], json!("ACTIVITYLOGS_POLICY"));
    assert_eq!(records[1]["category"], json!("Audit"));
    assert_eq!(records[1]["event_provider"], json!("AZURE_SEARCH"));
}

#[tokio::test]
async fn test_event_hub_records_are_enriched() {
    let (sink, dispatcher) = setup();
    let envelopes = vec![json!({"records": [
        {"resourceId": SEARCH_RESOURCE, "category": "policy", "operationName": "Read"}
    ]})];

    let summary = dispatcher.dispatch_event_hub(envelopes).await.unwrap();
    assert_eq!(summary.processed, 1);

    let records = sink.records();
    let record = &records[0];
    assert_eq!(record["event_provider"], json!("AZURE_SEARCH"));
    assert_eq!(record["eventsource"], json!("SEARCHSERVICES"));
    assert_eq!(record["category"], json!("ACTIVITYLOGS_POLICY"));
    assert_eq!(record["logsource"], json!("event_hub"));
    assert_eq!(record["operationName"], json!("Read"));
}

#[tokio::test]
async fn test_event_hub_records_keep_nested_structure() {
    let (sink, dispatcher) = setup();
    let envelopes = vec![json!({"records": [
        {"resourceId": SEARCH_RESOURCE, "properties": {"durationMs": 12}}
    ]})];

    dispatcher.dispatch_event_hub(envelopes).await.unwrap();

    let records = sink.records();
    assert_eq!(records[0]["properties"]["durationMs"], json!(12));
}

#[tokio::test]
async fn test_event_hub_envelopes_share_one_batch() {
    let (sink, dispatcher) = setup();
    let envelopes = vec![
        json!({"records": [{"n": 1}, {"n": 2}]}),
        json!({"other": true}),
        Value::String(r#"{"records":[{"n":3}]}"#.to_string()),
    ];

    let summary = dispatcher.dispatch_event_hub(envelopes).await.unwrap();

    assert_eq!(summary.processed, 3);
    let numbers: Vec<Value> = sink.records().iter().map(|r| r["n"].clone()).collect();
    assert_eq!(numbers, vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn test_missing_record_aborts_batch() {
    let (sink, dispatcher) = setup();
    let envelopes = vec![json!({"records": [{"n": 1}, null, {"n": 3}]})];

    let result = dispatcher.dispatch_event_hub(envelopes).await;

    match result {
        Err(e @ DispatchError::MissingRecord { index: 1 }) => {
            assert!(e.to_string().contains("does not have log records"));
        }
        other => panic!("expected missing record error, got {other:?}"),
    }
    assert_eq!(sink.attempts(), 1);
}

#[tokio::test]
async fn test_delivery_failures_fail_the_invocation() {
    let (sink, dispatcher) = setup();
    sink.set_should_fail(true);

    let result = dispatcher
        .dispatch_blob("{\"a\":1}\n{\"a\":2}\n{\"a\":3}")
        .await;

    assert!(matches!(
        result,
        Err(DispatchError::Delivery {
            failed: 3,
            processed: 3
        })
    ));
    assert_eq!(sink.attempts(), 3);
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn test_empty_payloads_send_nothing() {
    let (sink, dispatcher) = setup();

    let summary = dispatcher.dispatch_blob("").await.unwrap();
    assert_eq!(summary, DispatchSummary::default());

    let summary = dispatcher.dispatch_event_hub(Vec::new()).await.unwrap();
    assert_eq!(summary, DispatchSummary::default());

    assert_eq!(sink.attempts(), 0);
}
