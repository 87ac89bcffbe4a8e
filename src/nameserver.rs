//! Name-server surface selected by the proxy's DNS dispatch layer.

use crate::base::neterror::NetError;
use crate::config::DohConfig;
use crate::dns::{Addrs, IpOption, Name, ResolutionEngine, Resolve, ResolveRequest, Resolving};
use crate::doh::client::DohClient;
use crate::doh::record::RecordLookup;
use futures::future::BoxFuture;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

/// A DNS backend that answers address queries for a domain.
pub trait NameServer: Send + Sync {
    /// Identifier the dispatch layer selects this backend by.
    fn name(&self) -> &str;

    /// Resolve `domain` to the address families enabled in `option`.
    fn query_ip(
        &self,
        domain: &str,
        option: IpOption,
    ) -> BoxFuture<'static, Result<Vec<IpAddr>, NetError>>;
}

/// Name server resolving over DNS-over-HTTPS.
#[derive(Clone, Debug)]
pub struct DohNameServer {
    engine: ResolutionEngine,
    timeout: Duration,
}

impl DohNameServer {
    pub const NAME: &'static str = "dohdns";

    /// Build a name server talking to the configured DoH endpoint.
    pub fn new(config: &DohConfig) -> Result<Self, NetError> {
        config.validate()?;
        let client = DohClient::new(config)?;
        tracing::debug!(endpoint = %client.endpoint(), timeout = ?config.timeout, "DoH name server ready");
        Ok(Self::with_lookup(Arc::new(client), config.timeout))
    }

    /// Shorthand for a default config with `endpoint` and `timeout`.
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, NetError> {
        Self::new(&DohConfig::new().endpoint(endpoint).timeout(timeout))
    }

    /// Build a name server over any record lookup.
    pub fn with_lookup(lookup: Arc<dyn RecordLookup>, timeout: Duration) -> Self {
        Self {
            engine: ResolutionEngine::from_lookup(lookup),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// IPv4 and IPv6 addresses of `host`.
    pub async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, NetError> {
        self.engine.resolve(&ResolveRequest::dual(host), self.timeout).await
    }

    /// IPv4 addresses of `host`.
    pub async fn lookup_ipv4(&self, host: &str) -> Result<Vec<IpAddr>, NetError> {
        self.engine.resolve(&ResolveRequest::ipv4(host), self.timeout).await
    }

    /// IPv6 addresses of `host`.
    pub async fn lookup_ipv6(&self, host: &str) -> Result<Vec<IpAddr>, NetError> {
        self.engine.resolve(&ResolveRequest::ipv6(host), self.timeout).await
    }
}

impl NameServer for DohNameServer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn query_ip(
        &self,
        domain: &str,
        option: IpOption,
    ) -> BoxFuture<'static, Result<Vec<IpAddr>, NetError>> {
        let server = self.clone();
        let domain = domain.to_string();
        Box::pin(async move {
            match (option.ipv4_enable, option.ipv6_enable) {
                (true, true) => server.lookup_ip(&domain).await,
                (true, false) => server.lookup_ipv4(&domain).await,
                (false, true) => server.lookup_ipv6(&domain).await,
                (false, false) => Err(NetError::InvalidRequest),
            }
        })
    }
}

impl Resolve for DohNameServer {
    fn resolve(&self, name: Name) -> Resolving {
        let server = self.clone();
        Box::pin(async move {
            let ips = server.lookup_ip(name.as_str()).await?;
            let addrs: Addrs = Box::new(ips.into_iter().map(|ip| SocketAddr::new(ip, 0)));
            Ok(addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        let server = DohNameServer::new(&DohConfig::default()).unwrap();
        assert_eq!(server.name(), "dohdns");
        assert_eq!(server.timeout(), Duration::from_secs(4));
    }

    #[test]
    fn test_with_endpoint() {
        let server = DohNameServer::with_endpoint("dns.google", Duration::from_secs(2)).unwrap();
        assert_eq!(server.timeout(), Duration::from_secs(2));
        assert!(DohNameServer::with_endpoint("", Duration::from_secs(2)).is_err());
    }

    #[test]
    fn test_new_validates_config() {
        let config = DohConfig::default().timeout(Duration::ZERO);
        assert!(matches!(
            DohNameServer::new(&config),
            Err(NetError::InvalidConfig(_))
        ));
    }
}
