use crate::base::context::HyperResultExt;
use crate::base::neterror::NetError;
use crate::config::DohConfig;
use crate::doh::connect::ConnectJob;
use crate::doh::endpoint::DohEndpoint;
use crate::doh::record::{DnsClass, Lookup, Querying, RecordLookup, RecordType};
use crate::doh::tls::TlsConfig;
use crate::doh::wire::{self, QUERY_ID};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Request};
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Media type for DNS wire-format messages (RFC 8484 §6).
pub const DNS_MESSAGE: &str = "application/dns-message";

/// DNS-over-HTTPS record lookup over HTTP/1.1 GET.
///
/// Every query opens its own connection; nothing is pooled or cached.
/// Cloning is cheap and clones share configuration.
#[derive(Clone, Debug)]
pub struct DohClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    endpoint: DohEndpoint,
    tls: TlsConfig,
    class: DnsClass,
    user_agent: String,
    max_response_size: usize,
    connect_timeout: Option<Duration>,
}

impl DohClient {
    pub fn new(config: &DohConfig) -> Result<Self, NetError> {
        Self::with_tls(config, TlsConfig::default())
    }

    /// Build a client with custom TLS settings.
    pub fn with_tls(config: &DohConfig, tls: TlsConfig) -> Result<Self, NetError> {
        let endpoint = DohEndpoint::parse(&config.endpoint)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                endpoint,
                tls,
                class: config.class,
                user_agent: config.user_agent.clone(),
                max_response_size: config.max_response_size,
                connect_timeout: config.connect_timeout,
            }),
        })
    }

    pub fn endpoint(&self) -> &DohEndpoint {
        &self.inner.endpoint
    }
}

impl RecordLookup for DohClient {
    fn lookup(&self, host: &str, kind: RecordType) -> Querying {
        let inner = self.inner.clone();
        let host = host.to_string();
        Box::pin(async move { inner.query(&host, kind).await })
    }
}

impl ClientInner {
    async fn query(&self, host: &str, kind: RecordType) -> Result<Lookup, NetError> {
        let start = Instant::now();
        let endpoint = self.endpoint.to_string();
        tracing::debug!(host = %host, kind = %kind, endpoint = %endpoint, "DoH query");

        let message = wire::encode_query(host, kind, self.class, QUERY_ID)?;
        let dns_param = URL_SAFE_NO_PAD.encode(&message);

        // 1. Fresh connection
        let socket =
            ConnectJob::connect(&self.endpoint, &self.tls, self.connect_timeout).await?;

        // 2. HTTP/1.1 handshake
        let (mut sender, conn) = http1::handshake(TokioIo::new(socket))
            .await
            .http_context(&endpoint)?;

        // 3. Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!(error = %e, "DoH connection driver failed");
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(self.endpoint.request_target(&dns_param))
            .header(HOST, self.endpoint.host_header())
            .header(ACCEPT, DNS_MESSAGE)
            .header(USER_AGENT, self.user_agent.as_str())
            .body(Empty::<Bytes>::new())
            .map_err(|_| NetError::InvalidUrl)?;

        let response = sender.send_request(request).await.http_context(&endpoint)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(host = %host, status = %status, "DoH server rejected query");
            return Err(NetError::InvalidResponse);
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let ok = content_type
                .to_str()
                .map(|v| v.trim().to_ascii_lowercase().starts_with(DNS_MESSAGE))
                .unwrap_or(false);
            if !ok {
                tracing::debug!(host = %host, content_type = ?content_type, "Unexpected DoH content type");
                return Err(NetError::InvalidResponse);
            }
        }

        let body = Limited::new(response.into_body(), self.max_response_size)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    NetError::ResponseBodyTooBigToDrain
                } else {
                    tracing::debug!(host = %host, error = %e, "Failed reading DoH response body");
                    NetError::ConnectionClosed
                }
            })?
            .to_bytes();

        let lookup = wire::decode_response(&body, QUERY_ID, start.elapsed())?;
        tracing::debug!(
            host = %host,
            kind = %kind,
            count = lookup.len(),
            rcode = %lookup.meta.rcode,
            elapsed = ?lookup.meta.elapsed,
            "DoH query finished"
        );
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_bad_endpoint() {
        let config = DohConfig::default().endpoint("gopher://dns.example.test");
        assert!(matches!(
            DohClient::new(&config),
            Err(NetError::UnknownUrlScheme)
        ));
    }

    #[test]
    fn test_client_defaults_to_https_dns_query() {
        let client = DohClient::new(&DohConfig::default()).unwrap();
        assert!(client.endpoint().is_https());
        assert_eq!(client.endpoint().host(), "cloudflare-dns.com");
        assert_eq!(client.endpoint().path(), "/dns-query");
    }

    #[tokio::test]
    async fn test_invalid_hostname_fails_before_connecting() {
        // Nothing listens on port 9; the error must come from encoding.
        let config = DohConfig::default().endpoint("http://127.0.0.1:9");
        let client = DohClient::new(&config).unwrap();
        let err = client.lookup_a("").await.unwrap_err();
        assert!(matches!(err, NetError::InvalidHostname(_)));
    }
}
