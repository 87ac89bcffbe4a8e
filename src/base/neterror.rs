use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Network and resolution errors.
///
/// Unit variants carry Chromium's `net_error_list.h` codes; resolver-specific
/// errors use custom codes starting at -10000.
#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        source: Arc<io::Error>,
    },
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name not resolved for {domain}: {source}")]
    NameNotResolvedFor {
        domain: String,
        source: Arc<io::Error>,
    },
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Response body too big to drain")]
    ResponseBodyTooBigToDrain,

    // Resolver errors (custom codes starting at -10000)
    #[error("Neither IPv4 nor IPv6 is enabled")]
    InvalidRequest,
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),
    #[error("DNS server answered with {rcode}")]
    DnsResponseError { rcode: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown network error ({0})")]
    Unknown(i32),
}

impl NetError {
    /// Wrap an IO error from a failed connection attempt.
    pub fn connection_failed_to(host: &str, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            source: Arc::new(source),
        }
    }

    /// Wrap an IO error from a failed host lookup.
    pub fn dns_failed(domain: &str, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(source),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed | NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::ResponseBodyTooBigToDrain => -345,

            NetError::InvalidRequest => -10000,
            NetError::InvalidHostname(_) => -10001,
            NetError::DnsResponseError { .. } => -10002,
            NetError::InvalidConfig(_) => -10003,
            NetError::Unknown(code) => *code,
        }
    }
}

/// Codes of data-carrying variants map back to their bare form when one
/// exists, otherwise to [`NetError::Unknown`].
impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,

            -300 => NetError::InvalidUrl,
            -302 => NetError::UnknownUrlScheme,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -345 => NetError::ResponseBodyTooBigToDrain,

            -10000 => NetError::InvalidRequest,
            _ => NetError::Unknown(code),
        }
    }
}
