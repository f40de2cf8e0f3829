//! Connectivity health check.

use kafka_frames_source::{BridgeConfig, Client};
use tracing::{debug, warn};

/// Outcome of a health check, with a message fit for the front end.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
}

/// Attempt a full connect-and-close cycle against the configured cluster.
///
/// The transient client lives inside the blocking task and is dropped there
/// on every path, so a failed probe cannot leak a connection. The message is
/// deliberately generic; root causes go to the log.
pub async fn check_health(config: BridgeConfig) -> HealthStatus {
    debug!("running health check");
    let probe = tokio::task::spawn_blocking(move || {
        let client = Client::connect(config)?;
        client.close()
    })
    .await;

    match probe {
        Ok(Ok(())) => HealthStatus {
            healthy: true,
            message: "Connected to Kafka".to_string(),
        },
        Ok(Err(e)) => {
            warn!(error = %e, "health check failed");
            HealthStatus {
                healthy: false,
                message: "Failed to establish connection to Kafka".to_string(),
            }
        }
        Err(e) => {
            warn!(error = %e, "health check task failed");
            HealthStatus {
                healthy: false,
                message: "Failed to establish connection to Kafka".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_cluster_is_unhealthy() {
        let status = check_health(BridgeConfig {
            bootstrap_servers: "127.0.0.1:1".to_string(),
            ..BridgeConfig::default()
        })
        .await;

        assert!(!status.healthy);
        assert_eq!(status.message, "Failed to establish connection to Kafka");
    }
}
