//! Bridge connection configuration.

use rdkafka::config::ClientConfig;

/// Identity used when the settings leave client id or group id blank.
pub const FALLBACK_IDENTITY: &str = "kafka-frames";

/// Authentication mode meaning "no SASL".
pub const AUTH_NONE: &str = "none";

/// Connection configuration for one consumer bridge.
///
/// Field values come straight from the settings surface; blanks are filled
/// with defaults when the bridge is created, not here.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Kafka brokers (comma-separated list)
    pub bootstrap_servers: String,
    /// Client identifier reported to the brokers
    pub client_id: String,
    /// Consumer group ID
    pub group_id: String,
    /// SASL mechanism name, or `"none"`
    ///
    /// Supported mechanisms are whatever the underlying client accepts
    /// (`SCRAM-SHA-256`, `SCRAM-SHA-512`, `PLAIN`, ...).
    pub auth_mechanism: String,
    /// SASL username
    pub username: String,
    /// SASL password, delivered over the decrypted-secrets channel
    pub password: String,
    /// Enable TLS towards the brokers
    ///
    /// The settings surface has no CA upload, so when TLS is on the broker
    /// certificate is accepted without verification.
    pub use_tls: bool,
    /// Session timeout in milliseconds
    pub session_timeout_ms: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            client_id: "".to_string(),
            group_id: "".to_string(),
            auth_mechanism: AUTH_NONE.to_string(),
            username: "".to_string(),
            password: "".to_string(),
            use_tls: false,
            session_timeout_ms: "6000".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Fill blank identifiers with the fallback identity and blank auth
    /// with `"none"`.
    pub(crate) fn normalized(mut self) -> Self {
        if self.client_id.is_empty() {
            self.client_id = FALLBACK_IDENTITY.to_string();
        }
        if self.group_id.is_empty() {
            self.group_id = FALLBACK_IDENTITY.to_string();
        }
        if self.auth_mechanism.is_empty() {
            self.auth_mechanism = AUTH_NONE.to_string();
        }
        self
    }

    /// Translate into the client library's key/value configuration.
    ///
    /// Offsets are committed explicitly, once per message, after hand-off;
    /// auto-commit stays off. Partitions without a committed or seeded
    /// position start from the latest offset.
    pub(crate) fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("client.id", &self.client_id)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", &self.session_timeout_ms)
            .set("enable.partition.eof", "false");

        let sasl = self.auth_mechanism != AUTH_NONE;
        let protocol = match (self.use_tls, sasl) {
            (true, true) => "sasl_ssl",
            (true, false) => "ssl",
            (false, true) => "sasl_plaintext",
            (false, false) => "plaintext",
        };
        config.set("security.protocol", protocol);

        if sasl {
            config
                .set("sasl.mechanism", &self.auth_mechanism)
                .set("sasl.username", &self.username)
                .set("sasl.password", &self.password);
        }
        if self.use_tls {
            config.set("enable.ssl.certificate.verification", "false");
        }

        config
    }
}
