use crate::base::neterror::NetError;
use std::fmt;
use url::{Host, Url};

/// Path used when the endpoint does not name one (RFC 8484 §4.1 template).
pub const DEFAULT_PATH: &str = "/dns-query";

/// A parsed DoH server location.
///
/// Accepts either a bare host (`"1.1.1.1"`, `"dns.google"`,
/// `"2606:4700::1111"`, `"127.0.0.1:8053"`), which is taken to mean
/// `https://host/dns-query`, or a full `http(s)://` URL. Plain `http` exists
/// for local test servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DohEndpoint {
    https: bool,
    host: String,
    port: u16,
    path: String,
}

impl DohEndpoint {
    pub fn parse(input: &str) -> Result<Self, NetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NetError::InvalidUrl);
        }

        let url = if input.contains("://") {
            Url::parse(input)
        } else if input.matches(':').count() > 1 && !input.starts_with('[') {
            // Bare IPv6 literal
            Url::parse(&format!("https://[{}]", input))
        } else {
            Url::parse(&format!("https://{}", input))
        }
        .map_err(|_| NetError::InvalidUrl)?;

        let https = match url.scheme() {
            "https" => true,
            "http" => false,
            _ => return Err(NetError::UnknownUrlScheme),
        };

        if url.query().is_some() {
            return Err(NetError::InvalidUrl);
        }

        let host = match url.host() {
            Some(Host::Domain(d)) if !d.is_empty() => d.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            _ => return Err(NetError::InvalidUrl),
        };
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        let path = match url.path() {
            "" | "/" => DEFAULT_PATH.to_string(),
            p => p.to_string(),
        };

        Ok(Self {
            https,
            host,
            port,
            path,
        })
    }

    pub fn is_https(&self) -> bool {
        self.https
    }

    pub fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// Host name or IP literal, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn is_ipv6_literal(&self) -> bool {
        self.host.contains(':')
    }

    fn default_port(&self) -> u16 {
        if self.https {
            443
        } else {
            80
        }
    }

    /// Host with brackets restored for IPv6 literals.
    fn authority_host(&self) -> String {
        if self.is_ipv6_literal() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    /// Value for the `Host` header; the port is omitted when it is the
    /// scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.default_port() {
            self.authority_host()
        } else {
            format!("{}:{}", self.authority_host(), self.port)
        }
    }

    /// Origin-form request target carrying the encoded query.
    pub fn request_target(&self, dns_param: &str) -> String {
        format!("{}?dns={}", self.path, dns_param)
    }

    /// Absolute GET URL for one encoded query.
    pub fn query_url(&self, dns_param: &str) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme(),
            self.authority_host(),
            self.port,
            self.request_target(dns_param)
        )
    }
}

impl fmt::Display for DohEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.scheme(),
            self.authority_host(),
            self.port,
            self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ipv4_host() {
        let ep = DohEndpoint::parse("1.1.1.1").unwrap();
        assert!(ep.is_https());
        assert_eq!(ep.host(), "1.1.1.1");
        assert_eq!(ep.port(), 443);
        assert_eq!(ep.path(), "/dns-query");
        assert_eq!(ep.host_header(), "1.1.1.1");
    }

    #[test]
    fn test_bare_domain_with_port() {
        let ep = DohEndpoint::parse("dns.example.test:8443").unwrap();
        assert_eq!(ep.host(), "dns.example.test");
        assert_eq!(ep.port(), 8443);
        assert_eq!(ep.host_header(), "dns.example.test:8443");
    }

    #[test]
    fn test_bare_ipv6_literal() {
        let ep = DohEndpoint::parse("2606:4700::1111").unwrap();
        assert_eq!(ep.host(), "2606:4700::1111");
        assert_eq!(ep.host_header(), "[2606:4700::1111]");
        assert_eq!(
            ep.query_url("AAAB"),
            "https://[2606:4700::1111]:443/dns-query?dns=AAAB"
        );
    }

    #[test]
    fn test_full_url_keeps_path() {
        let ep = DohEndpoint::parse("https://dns.google/resolve").unwrap();
        assert_eq!(ep.path(), "/resolve");
        assert_eq!(ep.request_target("q"), "/resolve?dns=q");
    }

    #[test]
    fn test_plain_http_for_local_servers() {
        let ep = DohEndpoint::parse("http://127.0.0.1:8053").unwrap();
        assert!(!ep.is_https());
        assert_eq!(ep.to_string(), "http://127.0.0.1:8053/dns-query");
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        assert!(matches!(DohEndpoint::parse(""), Err(NetError::InvalidUrl)));
        assert!(matches!(DohEndpoint::parse("   "), Err(NetError::InvalidUrl)));
        assert!(matches!(
            DohEndpoint::parse("ftp://dns.example.test"),
            Err(NetError::UnknownUrlScheme)
        ));
        assert!(matches!(
            DohEndpoint::parse("https://dns.example.test/dns-query?dns=abc"),
            Err(NetError::InvalidUrl)
        ));
    }
}
