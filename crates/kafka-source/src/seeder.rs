//! Starting-offset seeding.
//!
//! Before a subscription begins, each partition's starting position is
//! pushed back by a look-back window so a fresh consumer group has a little
//! history to draw with. Seeding is an optimization, never a correctness
//! requirement: any failure degrades to "start from the latest offset" for
//! the affected partitions.

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::{Offset, TopicPartitionList};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// How far back in the topic's history a new subscription starts.
pub(crate) const HISTORY_LOOKBACK: Duration = Duration::from_secs(60 * 60);

/// Upper bound for each metadata/offset round trip during seeding.
pub(crate) const SEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the starting offset for every partition of `topic` whose history
/// reaches back at least `lookback`.
///
/// Partitions the broker cannot answer for are left out of the map; callers
/// treat absence as "start from latest". The transient consumer used for the
/// lookups is dropped on every return path.
pub(crate) fn lookback_start_offsets(
    client_config: &ClientConfig,
    topic: &str,
    lookback: Duration,
    timeout: Duration,
) -> HashMap<i32, i64> {
    let mut start_offsets = HashMap::new();

    let consumer: BaseConsumer = match client_config.create() {
        Ok(consumer) => consumer,
        Err(e) => {
            warn!(error = %e, "failed to create offset-lookup consumer");
            return start_offsets;
        }
    };

    let metadata = match consumer.fetch_metadata(Some(topic), timeout) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(error = %e, topic, "failed to fetch partition metadata");
            return start_offsets;
        }
    };
    let Some(topic_metadata) = metadata.topics().iter().find(|t| t.name() == topic) else {
        warn!(topic, "topic missing from metadata response");
        return start_offsets;
    };
    if let Some(e) = topic_metadata.error() {
        warn!(topic, error = ?e, "broker reported topic error during seeding");
        return start_offsets;
    }

    let partitions = topic_metadata.partitions();
    debug!(topic, partitions = partitions.len(), "seeding start offsets");

    let target = chrono::Utc::now().timestamp_millis() - lookback.as_millis() as i64;
    let mut timestamps = TopicPartitionList::with_capacity(partitions.len());
    for partition in partitions {
        if let Err(e) = timestamps.add_partition_offset(topic, partition.id(), Offset::Offset(target))
        {
            warn!(partition = partition.id(), error = %e, "failed to queue start-offset lookup");
        }
    }

    let resolved = match consumer.offsets_for_times(timestamps, timeout) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(error = %e, topic, "failed to resolve look-back offsets");
            return start_offsets;
        }
    };

    for elem in resolved.elements() {
        if let Err(e) = elem.error() {
            warn!(partition = elem.partition(), error = %e, "start-offset lookup failed");
            continue;
        }
        match elem.offset() {
            Offset::Offset(offset) if offset >= 0 => {
                debug!(topic, partition = elem.partition(), offset, "seeded start offset");
                start_offsets.insert(elem.partition(), offset);
            }
            // "End" means nothing in the window; that partition starts from latest.
            other => {
                debug!(
                    partition = elem.partition(),
                    offset = ?other,
                    "no start offset within the look-back window"
                );
            }
        }
    }

    start_offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_cluster_degrades_to_empty_map() {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", "127.0.0.1:1")
            .set("group.id", "seed-test");

        let offsets = lookback_start_offsets(
            &config,
            "events",
            HISTORY_LOOKBACK,
            Duration::from_secs(1),
        );

        assert!(offsets.is_empty());
    }
}
