//! Lifecycle tests that exercise the public API without a broker.
//!
//! Cluster-backed behavior (seeding, delivery, rebalances) is covered by the
//! in-crate unit tests plus manual runs against a real cluster; everything
//! here must pass on a machine with no Kafka at all.

use frame_sink::MemorySink;
use kafka_frames::{run_stream, StreamEnd, StreamRequest, TOPIC_PLACEHOLDER};
use kafka_frames_source::{BridgeConfig, Client};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

fn offline_config() -> BridgeConfig {
    BridgeConfig {
        bootstrap_servers: "127.0.0.1:1".to_string(),
        ..BridgeConfig::default()
    }
}

#[tokio::test]
async fn placeholder_topic_is_not_configured() {
    let sink = MemorySink::new();
    let request = StreamRequest {
        topic_name: TOPIC_PLACEHOLDER.to_string(),
    };

    let end = run_stream(offline_config(), request, &sink, CancellationToken::new())
        .await
        .expect("placeholder request never errors");

    assert_eq!(end, StreamEnd::NotConfigured);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn whitespace_topic_is_not_configured() {
    let sink = MemorySink::new();
    let request = StreamRequest {
        topic_name: "   ".to_string(),
    };

    let end = run_stream(offline_config(), request, &sink, CancellationToken::new())
        .await
        .expect("blank request never errors");

    assert_eq!(end, StreamEnd::NotConfigured);
}

#[tokio::test]
async fn close_is_idempotent_through_the_public_api() {
    let client = Client::new(offline_config()).expect("lazy client creation");

    client.close().expect("first close");
    client.close().expect("second close is a no-op");
}

#[tokio::test]
async fn read_after_close_signals_end_of_stream() {
    let mut client = Client::new(offline_config()).expect("lazy client creation");
    client.close().expect("close");

    let read = client.read_message().await.expect("read after close");
    assert!(read.is_none());
}

#[tokio::test]
async fn settings_round_trip_into_stream_config() {
    let settings = kafka_frames::DatasourceSettings::from_json(
        br#"{"bootstrapservers": "127.0.0.1:1", "authtype": "PLAIN", "username": "alice"}"#,
    )
    .expect("settings decode");
    let secrets = HashMap::from([("password".to_string(), "pw".to_string())]);

    let config = settings.into_bridge_config(&secrets);
    assert_eq!(config.bootstrap_servers, "127.0.0.1:1");
    assert_eq!(config.password, "pw");

    // The resulting config is accepted by the bridge as-is.
    let client = Client::new(config).expect("client from settings");
    client.close().expect("close");
}
