//! Metadata recording through the gateway and directly.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use tallygate_core::model::{CounterKey, CounterRecord, InboundRequest};
use tallygate_gateway::metadata::{CounterStore, MetadataRecorder};

use common::*;

const TABLE: &str = "hits";

#[tokio::test]
async fn first_request_queries_then_puts_count_one() {
    let store = Arc::new(RecordingStore::new());
    let gw = gateway(ping_routes(), Some(TABLE), store.clone());

    let resp = gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")).await;
    assert_eq!(resp, pong());

    assert!(eventually(|| store.puts() == 1).await);
    let key = CounterKey {
        source_ip: "MS4yLjMuNA==".into(),
        path: "/ping".into(),
    };
    assert_eq!(
        store.calls(),
        vec![
            Call::Query {
                table: TABLE.into(),
                key: key.clone(),
                projection: "count,method,path,sourceIp".into(),
            },
            Call::Put {
                table: TABLE.into(),
                record: CounterRecord {
                    source_ip: key.source_ip.clone(),
                    path: key.path.clone(),
                    method: "GET".into(),
                    count: 1,
                },
            },
        ]
    );
}

#[tokio::test]
async fn sequential_requests_add_exactly_n() {
    let store = Arc::new(RecordingStore::new());
    let gw = gateway(ping_routes(), Some(TABLE), store.clone());

    // pre-existing count from an earlier process
    let key = CounterKey::new("10.0.0.7", "/ping");
    let mut seeded = CounterRecord::initial(&key, "GET");
    seeded.count = 41;
    store.inner().put_item(TABLE, &seeded).await.unwrap();

    for n in 1..=5u64 {
        gw.handle(&InboundRequest::new("GET", "/ping", "10.0.0.7")).await;
        assert!(eventually(|| store.count_for(TABLE, "10.0.0.7", "/ping") == Some(41 + n)).await);
    }

    // unmatched paths are counted too
    gw.handle(&InboundRequest::new("GET", "/nope", "10.0.0.7")).await;
    assert!(eventually(|| store.count_for(TABLE, "10.0.0.7", "/nope") == Some(1)).await);
    assert_eq!(store.count_for(TABLE, "10.0.0.7", "/ping"), Some(46));
}

#[tokio::test]
async fn existing_record_keeps_its_original_method() {
    let store = Arc::new(RecordingStore::new());
    let recorder = MetadataRecorder::new(Some(TABLE.into()), store.clone());

    recorder.record_now("1.2.3.4", "GET", "/ping").await.unwrap();
    let row = recorder
        .record_now("1.2.3.4", "POST", "/ping")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.count, 2);
    assert_eq!(row.method, "GET");
}

#[tokio::test]
async fn counters_are_per_source_ip_and_path() {
    let store = Arc::new(RecordingStore::new());
    let recorder = MetadataRecorder::new(Some(TABLE.into()), store.clone());

    recorder.record("1.2.3.4", "GET", "/a").await;
    recorder.record("1.2.3.4", "GET", "/a").await;
    recorder.record("1.2.3.4", "GET", "/b").await;
    recorder.record("5.6.7.8", "GET", "/a").await;

    assert_eq!(store.count_for(TABLE, "1.2.3.4", "/a"), Some(2));
    assert_eq!(store.count_for(TABLE, "1.2.3.4", "/b"), Some(1));
    assert_eq!(store.count_for(TABLE, "5.6.7.8", "/a"), Some(1));
}

#[tokio::test]
async fn unset_table_skips_store_entirely() {
    for table in [None, Some("")] {
        let store = Arc::new(RecordingStore::new());
        let gw = gateway(ping_routes(), table, store.clone());

        let resp = gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")).await;
        assert_eq!(resp, pong());
        let resp = gw.handle(&InboundRequest::new("GET", "/nope", "1.2.3.4")).await;
        assert_eq!(resp.status_code, 404);

        settle().await;
        assert!(store.calls().is_empty());
        assert!(!gw.recorder().is_enabled());
    }
}

#[tokio::test]
async fn store_read_failure_does_not_reach_caller() {
    let store = Arc::new(RecordingStore::failing_reads());
    let gw = gateway(ping_routes(), Some(TABLE), store.clone());

    assert_eq!(gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")).await, pong());
    let resp = gw.handle(&InboundRequest::new("GET", "/nope", "1.2.3.4")).await;
    assert_eq!(resp.status_code, 404);
    assert_eq!(resp.body, NOT_FOUND_HTML);

    assert!(eventually(|| store.calls().len() == 2).await);
    // read failed, so nothing was written
    assert_eq!(store.puts(), 0);
}

#[tokio::test]
async fn store_write_failure_does_not_reach_caller() {
    let store = Arc::new(RecordingStore::failing_writes());
    let gw = gateway(ping_routes(), Some(TABLE), store.clone());

    assert_eq!(gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")).await, pong());
    assert!(eventually(|| store.puts() == 1).await);
    assert_eq!(store.count_for(TABLE, "1.2.3.4", "/ping"), None);
    assert_eq!(gw.metrics().requests.get(&[("outcome", "routed")]), 1);
}

#[tokio::test]
async fn direct_record_surfaces_store_errors() {
    let store = Arc::new(RecordingStore::failing_reads());
    let recorder = MetadataRecorder::new(Some(TABLE.into()), store);

    let err = recorder
        .record_now("1.2.3.4", "GET", "/ping")
        .await
        .expect_err("must fail");
    assert_eq!(err.kind().as_str(), "STORE");

    // the fire-and-forget form swallows it
    recorder.record("1.2.3.4", "GET", "/ping").await;
}

#[tokio::test]
async fn hanging_store_does_not_block_response() {
    let gw = gateway(ping_routes(), Some(TABLE), Arc::new(HangingStore));

    let resp = tokio::time::timeout(
        Duration::from_secs(1),
        gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")),
    )
    .await
    .expect("handle must not wait on the recorder");
    assert_eq!(resp, pong());
}

#[tokio::test]
async fn recorder_outcomes_are_counted() {
    let metrics = Arc::new(tallygate_gateway::obs::metrics::GatewayMetrics::new());
    let ok = MetadataRecorder::new(Some(TABLE.into()), Arc::new(RecordingStore::new()))
        .with_metrics(metrics.clone());
    let failing = MetadataRecorder::new(Some(TABLE.into()), Arc::new(RecordingStore::failing_writes()))
        .with_metrics(metrics.clone());
    let disabled = MetadataRecorder::new(None, Arc::new(RecordingStore::new()))
        .with_metrics(metrics.clone());

    ok.record("1.2.3.4", "GET", "/ping").await;
    failing.record("1.2.3.4", "GET", "/ping").await;
    disabled.record("1.2.3.4", "GET", "/ping").await;

    assert_eq!(metrics.recorder.get(&[("outcome", "ok")]), 1);
    assert_eq!(metrics.recorder.get(&[("outcome", "error")]), 1);
    assert_eq!(metrics.recorder.get(&[("outcome", "disabled")]), 1);
}

#[tokio::test]
async fn spawned_record_completes_independently() {
    let store = Arc::new(RecordingStore::new());
    let recorder = MetadataRecorder::new(Some(TABLE.into()), store.clone());

    let handle = recorder
        .spawn(&InboundRequest::new("GET", "/ping", "1.2.3.4"))
        .expect("inside a runtime");
    handle.await.unwrap();
    assert_eq!(store.count_for(TABLE, "1.2.3.4", "/ping"), Some(1));
}

#[test]
fn spawn_outside_runtime_is_a_no_op() {
    let recorder = MetadataRecorder::new(Some(TABLE.into()), Arc::new(RecordingStore::new()));
    assert!(recorder
        .spawn(&InboundRequest::new("GET", "/ping", "1.2.3.4"))
        .is_none());
}

#[tokio::test]
async fn store_panic_is_contained_and_counted() {
    let metrics = Arc::new(tallygate_gateway::obs::metrics::GatewayMetrics::new());
    let recorder = MetadataRecorder::new(Some(TABLE.into()), Arc::new(PanickingStore))
        .with_metrics(metrics.clone());

    // returns normally
    recorder.record("1.2.3.4", "GET", "/ping").await;

    assert_eq!(metrics.recorder.get(&[("outcome", "error")]), 1);
    assert_eq!(metrics.recorder.get(&[("outcome", "ok")]), 0);
}

#[tokio::test]
async fn store_panic_does_not_reach_caller() {
    let gw = gateway(ping_routes(), Some(TABLE), Arc::new(PanickingStore));

    assert_eq!(gw.handle(&InboundRequest::new("GET", "/ping", "1.2.3.4")).await, pong());
    let handle = gw
        .recorder()
        .spawn(&InboundRequest::new("GET", "/ping", "1.2.3.4"))
        .expect("inside a runtime");
    // the task itself finishes cleanly
    handle.await.unwrap();
}
