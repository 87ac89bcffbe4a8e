//! DoH name server configuration.

use crate::base::neterror::NetError;
use crate::doh::record::DnsClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default DoH server.
pub const DEFAULT_ENDPOINT: &str = "cloudflare-dns.com";
/// Default ceiling on one whole resolution.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
/// Largest DNS message we accept (RFC 8484 §6).
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 65535;

/// Configuration for [`DohNameServer`](crate::nameserver::DohNameServer).
///
/// Durations are (de)serialized as integer milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DohConfig {
    /// DoH server: bare host or `https://` URL
    pub endpoint: String,
    /// Total time allowed for one resolution, both families included
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Query class
    pub class: DnsClass,
    /// User-Agent header sent to the server
    pub user_agent: String,
    /// Maximum response body size in bytes
    pub max_response_size: usize,
    /// Bound on each TCP connect attempt; unbounded when unset
    #[serde(rename = "connect_timeout_ms", with = "opt_duration_ms")]
    pub connect_timeout: Option<Duration>,
}

impl Default for DohConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            class: DnsClass::IN,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            connect_timeout: None,
        }
    }
}

impl DohConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, NetError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NetError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NetError> {
        if self.endpoint.trim().is_empty() {
            return Err(NetError::InvalidConfig("endpoint is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(NetError::InvalidConfig("timeout must be positive".to_string()));
        }
        if self.max_response_size == 0 {
            return Err(NetError::InvalidConfig(
                "max_response_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the DoH server.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the resolution timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the query class.
    pub fn class(mut self, class: DnsClass) -> Self {
        self.class = class;
        self
    }

    /// Set the User-Agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum response size.
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    /// Bound each TCP connect attempt.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod opt_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DohConfig::default();
        assert_eq!(config.endpoint, "cloudflare-dns.com");
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.class, DnsClass::IN);
        assert_eq!(config.max_response_size, 65535);
        assert!(config.user_agent.starts_with("dohdns/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = DohConfig::new()
            .endpoint("dns.google")
            .timeout(Duration::from_millis(1500))
            .connect_timeout(Duration::from_millis(500))
            .max_response_size(4096);

        assert_eq!(config.endpoint, "dns.google");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(500)));
        assert_eq!(config.max_response_size, 4096);
    }

    #[test]
    fn test_from_json() {
        let config = DohConfig::from_json(
            r#"{"endpoint": "1.1.1.1", "timeout_ms": 250, "class": "IN", "connect_timeout_ms": 100}"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "1.1.1.1");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(100)));
        assert_eq!(config.max_response_size, DEFAULT_MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_json_roundtrip_uses_milliseconds() {
        let config = DohConfig::new().timeout(Duration::from_secs(2));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout_ms"], 2000);
        assert!(json["connect_timeout_ms"].is_null());

        let back: DohConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            DohConfig::from_json(r#"{"endpoint": ""}"#),
            Err(NetError::InvalidConfig(_))
        ));
        assert!(matches!(
            DohConfig::from_json(r#"{"timeout_ms": 0}"#),
            Err(NetError::InvalidConfig(_))
        ));
        assert!(matches!(
            DohConfig::from_json("not json"),
            Err(NetError::InvalidConfig(_))
        ));
    }
}
