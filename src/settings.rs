//! Datasource settings decoding.
//!
//! The front end persists connection settings as a JSON document, with the
//! password kept apart in an encrypted store and handed to the backend as an
//! already-decrypted secrets map.

use anyhow::Context;
use kafka_frames_source::BridgeConfig;
use serde::Deserialize;
use std::collections::HashMap;

/// Connection settings as persisted by the front end.
///
/// Field names match the stored document; anything missing decodes to its
/// empty value and is defaulted when the bridge is created.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatasourceSettings {
    #[serde(rename = "bootstrapservers")]
    pub bootstrap_servers: String,
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "groupid")]
    pub group_id: String,
    #[serde(rename = "authtype")]
    pub auth_type: String,
    pub username: String,
    #[serde(rename = "usetls")]
    pub use_tls: bool,
}

impl DatasourceSettings {
    pub fn from_json(raw: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(raw).context("failed to decode datasource settings")
    }

    /// Combine with the decrypted secrets to produce a bridge configuration.
    ///
    /// The password only ever travels on the secrets channel, never in the
    /// settings document itself.
    pub fn into_bridge_config(self, secrets: &HashMap<String, String>) -> BridgeConfig {
        BridgeConfig {
            bootstrap_servers: self.bootstrap_servers,
            client_id: self.client_id,
            group_id: self.group_id,
            auth_mechanism: self.auth_type,
            username: self.username,
            password: secrets.get("password").cloned().unwrap_or_default(),
            use_tls: self.use_tls,
            ..BridgeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_document() {
        let raw = br#"{
            "bootstrapservers": "broker-1:9092,broker-2:9092",
            "clientid": "panel-3",
            "groupid": "dashboards",
            "authtype": "SCRAM-SHA-256",
            "username": "alice",
            "usetls": true
        }"#;

        let settings = DatasourceSettings::from_json(raw).unwrap();
        assert_eq!(settings.bootstrap_servers, "broker-1:9092,broker-2:9092");
        assert_eq!(settings.client_id, "panel-3");
        assert_eq!(settings.group_id, "dashboards");
        assert_eq!(settings.auth_type, "SCRAM-SHA-256");
        assert_eq!(settings.username, "alice");
        assert!(settings.use_tls);
    }

    #[test]
    fn test_missing_fields_decode_empty() {
        let settings =
            DatasourceSettings::from_json(br#"{"bootstrapservers": "localhost:9092"}"#).unwrap();

        assert_eq!(settings.bootstrap_servers, "localhost:9092");
        assert!(settings.client_id.is_empty());
        assert!(settings.auth_type.is_empty());
        assert!(!settings.use_tls);
    }

    #[test]
    fn test_password_comes_from_secrets() {
        let settings =
            DatasourceSettings::from_json(br#"{"authtype": "PLAIN", "username": "bob"}"#).unwrap();
        let secrets = HashMap::from([("password".to_string(), "s3cret".to_string())]);

        let config = settings.into_bridge_config(&secrets);
        assert_eq!(config.auth_mechanism, "PLAIN");
        assert_eq!(config.username, "bob");
        assert_eq!(config.password, "s3cret");
    }

    #[test]
    fn test_absent_secret_leaves_password_empty() {
        let settings = DatasourceSettings::default();
        let config = settings.into_bridge_config(&HashMap::new());
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_garbage_document_is_an_error() {
        assert!(DatasourceSettings::from_json(b"not json").is_err());
    }
}
