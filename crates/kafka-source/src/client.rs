//! The consumer bridge.
//!
//! One `Client` owns one consumer-group subscription and decouples the
//! broker's push-based delivery from the pull-based reader: a background
//! task receives messages and hands them into a single-slot channel, where
//! `read_message` picks them up one at a time. The hand-off suspends until
//! the reader is ready, so the broker is never more than one message ahead
//! of the consumer.

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::handler::DeliveryContext;
use crate::seeder;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message as RdkafkaMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One record delivered from the broker.
///
/// Owned by whichever stage currently holds it; moved, never shared, across
/// the delivery channel.
#[derive(Debug, Clone)]
pub struct Message {
    /// Topic the message was read from
    pub topic: String,
    /// Partition within the topic
    pub partition: i32,
    /// Offset within the partition
    pub offset: i64,
    /// Broker-assigned timestamp in epoch milliseconds, when present
    pub timestamp: Option<i64>,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl Message {
    fn from_borrowed(msg: &BorrowedMessage<'_>) -> Self {
        Self {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            timestamp: msg.timestamp().to_millis(),
            payload: msg.payload().map(|p| p.to_vec()).unwrap_or_default(),
        }
    }
}

/// Consumer-group bridge with single-slot delivery and close-once shutdown.
pub struct Client {
    consumer: Arc<StreamConsumer<DeliveryContext>>,
    config: BridgeConfig,
    // Taken by the one allowed subscribe call; the channel closes when the
    // delivery loop ends, whatever the reason.
    sender: Option<mpsc::Sender<Result<Message>>>,
    messages: mpsc::Receiver<Result<Message>>,
    shutdown: CancellationToken,
    closed: AtomicBool,
}

impl Client {
    /// Build a bridge without touching the network.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let config = config.normalized();
        debug!(
            brokers = %config.bootstrap_servers,
            client_id = %config.client_id,
            group_id = %config.group_id,
            auth = %config.auth_mechanism,
            tls = config.use_tls,
            "creating consumer bridge"
        );

        let consumer: StreamConsumer<DeliveryContext> = config
            .client_config()
            .create_with_context(DeliveryContext::new())?;
        let (sender, messages) = mpsc::channel(1);

        Ok(Self {
            consumer: Arc::new(consumer),
            config,
            sender: Some(sender),
            messages,
            shutdown: CancellationToken::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Build a bridge and verify the cluster is reachable with the given
    /// credentials.
    pub fn connect(config: BridgeConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client
            .consumer
            .fetch_metadata(None, CONNECT_TIMEOUT)
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(client)
    }

    /// Join the consumer group for `topic` and start the background delivery
    /// loop.
    ///
    /// Starting offsets are seeded from the look-back window first; seeding
    /// failures degrade to "start from latest" and are never surfaced here.
    /// Returns as soon as the loop is started — failures inside it are only
    /// observable through subsequent `read_message` results.
    pub async fn subscribe(&mut self, topic: &str) -> Result<()> {
        let sender = self
            .sender
            .take()
            .ok_or_else(|| Error::Consume("client is already subscribed".to_string()))?;

        debug!(topic, "subscribing");
        let client_config = self.config.client_config();
        let topic_name = topic.to_string();
        let start_offsets = tokio::task::spawn_blocking(move || {
            seeder::lookback_start_offsets(
                &client_config,
                &topic_name,
                seeder::HISTORY_LOOKBACK,
                seeder::SEED_TIMEOUT,
            )
        })
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "offset seeding task failed");
            Default::default()
        });

        self.consumer.context().install_seed(topic, start_offsets);
        self.consumer.subscribe(&[topic])?;

        let consumer = Arc::clone(&self.consumer);
        let shutdown = self.shutdown.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            deliver_messages(consumer, sender, shutdown).await;
            debug!(topic = %topic, "delivery loop ended");
        });

        Ok(())
    }

    /// Wait for the next message.
    ///
    /// Resolves to `Ok(None)` once the bridge shuts down — the end-of-stream
    /// sentinel, not an error. A transport failure inside the delivery loop
    /// surfaces here as `Err`.
    pub async fn read_message(&mut self) -> Result<Option<Message>> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Ok(None),
            received = self.messages.recv() => match received {
                Some(Ok(message)) => Ok(Some(message)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            },
        }
    }

    /// Shut the bridge down.
    ///
    /// The first call broadcasts the shutdown signal — waking every pending
    /// `read_message` and the delivery loop — and leaves the consumer group.
    /// Every later call is a no-op returning success.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("closing consumer bridge");
        self.shutdown.cancel();
        self.consumer.unsubscribe();
        Ok(())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Background delivery loop: receive, hand off, commit, repeat.
async fn deliver_messages(
    consumer: Arc<StreamConsumer<DeliveryContext>>,
    sender: mpsc::Sender<Result<Message>>,
    shutdown: CancellationToken,
) {
    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => return,
            received = consumer.recv() => received,
        };

        let borrowed = match received {
            Ok(borrowed) => borrowed,
            Err(e) => {
                error!(error = %e, "failed to consume from broker");
                // Let the reader classify this; delivery stops here.
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = sender.send(Err(Error::Kafka(e))) => {}
                }
                return;
            }
        };

        let message = Message::from_borrowed(&borrowed);
        debug!(
            topic = %message.topic,
            partition = message.partition,
            offset = message.offset,
            "message received"
        );

        // The send suspends until the reader takes the previous message;
        // the broker stays at most one message ahead of the consumer.
        tokio::select! {
            _ = shutdown.cancelled() => return,
            sent = sender.send(Ok(message)) => {
                if sent.is_err() {
                    return;
                }
            }
        }

        // Processed means handed off, not consumed downstream: a crash from
        // here until the sink send can replay this message on restart.
        if let Err(e) = consumer.commit_message(&borrowed, CommitMode::Async) {
            warn!(error = %e, "failed to commit offset");
        }
    }
}
