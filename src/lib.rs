//! kafka-frames
//!
//! Streams Kafka topics as flat tabular frames for visualization clients.
//!
//! # Features
//!
//! - Consumer-group subscriptions with a one-hour look-back starting position
//! - Pull-based reading over the broker's push delivery, one message in flight
//! - Deterministic flattening of nested JSON payloads into typed columns
//! - Fatal/recoverable error classification: transport and sink failures end
//!   a stream, malformed payloads are dropped and the stream continues
//!
//! # Workspace Crates
//!
//! - `kafka_frames_source` - the consumer bridge (subscribe/read/close)
//! - `frame_types` - frame model and payload flattening
//! - `frame_sink` - outbound delivery trait and built-in sinks
//!
//! # CLI Usage
//!
//! ```bash
//! # Stream a topic to stdout as NDJSON frames
//! kafka-frames stream --brokers localhost:9092 --topic events
//!
//! # Verify connectivity with SASL over TLS
//! kafka-frames check --brokers broker:9093 --auth-type SCRAM-SHA-256 \
//!   --username alice --use-tls
//! ```

pub mod health;
pub mod settings;
pub mod stream;

pub use health::{check_health, HealthStatus};
pub use settings::DatasourceSettings;
pub use stream::{run_stream, StreamEnd, StreamRequest, TOPIC_PLACEHOLDER};
