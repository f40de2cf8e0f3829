//! Consumer-group rebalance participation.
//!
//! `DeliveryContext` is installed on the bridge's consumer and hears about
//! every partition assignment. Its one job is to apply the seeded starting
//! offsets when the first assignment of a subscription arrives; revocations
//! need no cleanup because offsets are committed per message.

use rdkafka::consumer::{BaseConsumer, Consumer, ConsumerContext, Rebalance};
use rdkafka::{ClientContext, Offset, TopicPartitionList};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

const SEEK_TIMEOUT: Duration = Duration::from_secs(5);

struct SeededStart {
    topic: String,
    offsets: HashMap<i32, i64>,
}

pub struct DeliveryContext {
    // Consumed by the first assignment, then gone; later generations keep
    // their committed positions.
    seed: Mutex<Option<SeededStart>>,
}

impl DeliveryContext {
    pub(crate) fn new() -> Self {
        Self {
            seed: Mutex::new(None),
        }
    }

    pub(crate) fn install_seed(&self, topic: &str, offsets: HashMap<i32, i64>) {
        let mut seed = match self.seed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *seed = Some(SeededStart {
            topic: topic.to_string(),
            offsets,
        });
    }

    fn apply_seed(&self, consumer: &BaseConsumer<Self>, assignment: &TopicPartitionList) {
        let seeded = {
            let mut seed = match self.seed.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            seed.take()
        };
        let Some(seeded) = seeded else {
            return;
        };

        for elem in assignment.elements() {
            if elem.topic() != seeded.topic {
                continue;
            }
            let Some(&start) = seeded.offsets.get(&elem.partition()) else {
                // Not seeded: the broker default (latest) applies.
                continue;
            };
            match consumer.seek(
                &seeded.topic,
                elem.partition(),
                Offset::Offset(start),
                SEEK_TIMEOUT,
            ) {
                Ok(()) => {
                    debug!(
                        topic = %seeded.topic,
                        partition = elem.partition(),
                        offset = start,
                        "moved partition to seeded start offset"
                    );
                }
                Err(e) => {
                    warn!(
                        partition = elem.partition(),
                        error = %e,
                        "failed to move partition to seeded start offset"
                    );
                }
            }
        }
    }
}

impl ClientContext for DeliveryContext {}

impl ConsumerContext for DeliveryContext {
    fn post_rebalance(&self, consumer: &BaseConsumer<Self>, rebalance: &Rebalance<'_>) {
        match rebalance {
            Rebalance::Assign(assignment) => {
                debug!(partitions = assignment.count(), "partitions assigned");
                self.apply_seed(consumer, assignment);
            }
            Rebalance::Revoke(revoked) => {
                debug!(partitions = revoked.count(), "partitions revoked");
            }
            Rebalance::Error(e) => {
                warn!(error = %e, "rebalance error");
            }
        }
    }
}
