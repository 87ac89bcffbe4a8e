use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::doh::endpoint::DohEndpoint;
use crate::doh::socket::SocketType;
use crate::doh::tls::TlsConfig;
use std::time::Duration;
use tokio::net::TcpStream;

/// Opens a fresh connection to the DoH server: DNS -> TCP -> TLS.
///
/// An endpoint given by name is bootstrapped through the system resolver.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(
        endpoint: &DohEndpoint,
        tls: &TlsConfig,
        connect_timeout: Option<Duration>,
    ) -> Result<SocketType, NetError> {
        let host = endpoint.host();
        let port = endpoint.port();

        // 1. Resolve the server address
        let addrs: Vec<_> = tokio::net::lookup_host((host, port))
            .await
            .dns_context(host)?
            .collect();
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved);
        }

        // 2. TCP connect, first address that answers wins
        let mut last_err = NetError::ConnectionFailed;
        let mut stream = None;
        for addr in addrs {
            let attempt = match connect_timeout {
                Some(limit) => match tokio::time::timeout(limit, TcpStream::connect(addr)).await {
                    Ok(result) => result,
                    Err(_) => Err(std::io::ErrorKind::TimedOut.into()),
                },
                None => TcpStream::connect(addr).await,
            };
            match attempt.connection_context(host, port) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::trace!(%addr, error = %e, "DoH server address unreachable");
                    last_err = e;
                }
            }
        }
        let stream = stream.ok_or(last_err)?;
        let _ = stream.set_nodelay(true);

        // 3. TLS handshake (if https)
        if endpoint.is_https() {
            let socket = SocketType::Ssl(tls.handshake(host, stream).await?);
            tracing::trace!(
                host = %host,
                alpn = ?socket.negotiated_alpn().map(String::from_utf8_lossy),
                "TLS established with DoH server"
            );
            Ok(socket)
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }
}
