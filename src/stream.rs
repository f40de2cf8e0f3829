//! The stream loop.
//!
//! Drives one subscription end to end: create a bridge, subscribe, then
//! read, flatten and forward frames until the consumer cancels or a fatal
//! error ends the stream. Malformed payloads are dropped and the loop keeps
//! going; transport and sink failures stop it.

use anyhow::Context;
use chrono::{DateTime, Utc};
use frame_sink::FrameSink;
use frame_types::Frame;
use kafka_frames_source::{BridgeConfig, Client, Message};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Topic value the query editor shows before the user picks a real topic.
pub const TOPIC_PLACEHOLDER: &str = "TOPIC_NAME";

/// A stream request from the front end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamRequest {
    #[serde(rename = "topicName")]
    pub topic_name: String,
}

impl StreamRequest {
    pub fn from_json(raw: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(raw).context("failed to decode stream request")
    }
}

/// How a stream ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The request carried no usable topic yet.
    NotConfigured,
    /// The consumer cancelled the stream.
    Cancelled,
    /// The bridge shut down underneath the loop.
    Shutdown,
}

/// Run one stream until cancellation, shutdown, or a fatal error.
///
/// The bridge is closed exactly once on every exit path; `close` is
/// idempotent and also runs on drop, so early returns cannot leak the
/// consumer-group membership.
pub async fn run_stream<S: FrameSink + ?Sized>(
    config: BridgeConfig,
    request: StreamRequest,
    sink: &S,
    cancel: CancellationToken,
) -> anyhow::Result<StreamEnd> {
    let topic = request.topic_name.trim();
    if topic.is_empty() || topic == TOPIC_PLACEHOLDER {
        debug!("no topic configured yet");
        return Ok(StreamEnd::NotConfigured);
    }
    let topic = topic.to_string();

    let mut client = tokio::task::spawn_blocking(move || Client::connect(config))
        .await
        .context("client setup task failed")?
        .context("failed to create Kafka client")?;

    info!(topic = %topic, "subscribing to topic");
    if let Err(e) = client.subscribe(&topic).await {
        let _ = client.close();
        return Err(anyhow::Error::new(e).context("failed to subscribe to topic"));
    }

    loop {
        // The cancellation check comes first on every iteration; the arms
        // only pick a step so the bridge is free to close afterwards.
        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancelled,
            read = client.read_message() => Step::Read(read),
        };

        match step {
            Step::Cancelled => {
                info!(topic = %topic, "stream cancelled");
                client.close().context("failed to close Kafka client")?;
                return Ok(StreamEnd::Cancelled);
            }
            Step::Read(Err(e)) => {
                let _ = client.close();
                return Err(anyhow::Error::new(e).context("error reading message"));
            }
            Step::Read(Ok(None)) => {
                info!(topic = %topic, "client shut down, ending stream");
                let _ = client.close();
                return Ok(StreamEnd::Shutdown);
            }
            Step::Read(Ok(Some(message))) => match frame_from_message(&message) {
                Err(e) => {
                    // Non-JSON payloads are skipped, not fatal.
                    warn!(
                        partition = message.partition,
                        offset = message.offset,
                        error = %e,
                        "dropping message that does not decode as a JSON object"
                    );
                }
                Ok(frame) => {
                    if let Err(e) = sink.send_frame(&frame).await {
                        let _ = client.close();
                        return Err(e.context("failed to forward frame"));
                    }
                }
            },
        }
    }
}

/// One loop iteration's outcome, so the borrow on the client ends before
/// any close path runs.
enum Step {
    Cancelled,
    Read(kafka_frames_source::Result<Option<Message>>),
}

/// Decode a message payload into a frame.
///
/// The payload must be a JSON object; the frame's system fields are copied
/// from the message metadata untouched. A message without a broker timestamp
/// is stamped with the current time.
fn frame_from_message(message: &Message) -> serde_json::Result<Frame> {
    let payload: Map<String, Value> = serde_json::from_slice(&message.payload)?;
    let event_time = message
        .timestamp
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now);
    Ok(Frame::from_object(
        event_time,
        message.partition,
        message.offset,
        &payload,
    ))
}
