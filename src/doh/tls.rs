use crate::base::neterror::NetError;
use boring::ssl::{SslConnector, SslConnectorBuilder, SslMethod, SslVerifyMode, SslVersion};
use tokio::net::TcpStream;
use tokio_boring::SslStream;

/// TLS settings for the connection to the DoH server.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub min_version: Option<SslVersion>,
    pub max_version: Option<SslVersion>,
    pub alpn_protos: Vec<String>,
    /// Verify the server certificate chain and name. Only tests turn this off.
    pub verify_peer: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::default_doh()
    }
}

impl TlsConfig {
    /// TLS 1.2+ with ALPN pinned to HTTP/1.1, which is all the client speaks.
    pub fn default_doh() -> Self {
        Self {
            min_version: Some(SslVersion::TLS1_2),
            max_version: Some(SslVersion::TLS1_3),
            alpn_protos: vec!["http/1.1".to_string()],
            verify_peer: true,
        }
    }

    /// Apply this configuration to an SSL connector builder.
    pub fn apply_to_builder(&self, builder: &mut SslConnectorBuilder) -> Result<(), NetError> {
        if let Some(min) = self.min_version {
            builder.set_min_proto_version(Some(min)).map_err(|_| NetError::SslProtocolError)?;
        }
        if let Some(max) = self.max_version {
            builder.set_max_proto_version(Some(max)).map_err(|_| NetError::SslProtocolError)?;
        }

        if !self.alpn_protos.is_empty() {
            builder
                .set_alpn_protos(&Self::alpn_wire(&self.alpn_protos)?)
                .map_err(|_| NetError::SslProtocolError)?;
        }

        if self.verify_peer {
            builder.set_verify(SslVerifyMode::PEER);
        } else {
            builder.set_verify(SslVerifyMode::NONE);
        }

        Ok(())
    }

    /// Length-prefixed ALPN protocol list.
    fn alpn_wire(protos: &[String]) -> Result<Vec<u8>, NetError> {
        let mut wire = Vec::new();
        for proto in protos {
            if proto.is_empty() || proto.len() > 255 {
                return Err(NetError::SslProtocolError);
            }
            wire.push(proto.len() as u8);
            wire.extend_from_slice(proto.as_bytes());
        }
        Ok(wire)
    }

    /// Check if SNI (Server Name Indication) should be set for this host.
    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(host: &str) -> bool {
        host.parse::<std::net::IpAddr>().is_err()
    }

    /// Run the client handshake for `host` over `stream`.
    pub async fn handshake(
        &self,
        host: &str,
        stream: TcpStream,
    ) -> Result<SslStream<TcpStream>, NetError> {
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
        self.apply_to_builder(&mut builder)?;

        let mut config = builder.build().configure().map_err(|_| NetError::SslProtocolError)?;
        config.set_use_server_name_indication(Self::should_set_sni(host));
        config.set_verify_hostname(self.verify_peer);

        tokio_boring::connect(config, host, stream).await.map_err(|e| {
            tracing::debug!(host = %host, error = ?e, "TLS handshake with DoH server failed");
            NetError::SslProtocolError
        })
    }
}
