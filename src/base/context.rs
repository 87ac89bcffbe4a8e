//! Ergonomic error context helpers.
//!
//! Extension traits that turn IO and hyper errors into context-rich
//! `NetError` variants, logging the underlying cause on the way.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add connection context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use dohdns::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("1.1.1.1", 443)?;
    /// // Error: "Connection to 1.1.1.1:443 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Add DNS resolution context to an IO error.
    ///
    /// Used when the DoH endpoint itself is given by name and has to be
    /// bootstrapped through the system resolver.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| {
            if e.kind() == io::ErrorKind::TimedOut {
                return NetError::ConnectionTimedOut;
            }
            NetError::connection_failed_to(host, port, e)
        })
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}

/// Extension trait for hyper client results.
pub trait HyperResultExt<T> {
    /// Map a hyper error raised while talking to `endpoint`.
    fn http_context(self, endpoint: &str) -> Result<T, NetError>;
}

impl<T> HyperResultExt<T> for Result<T, hyper::Error> {
    fn http_context(self, endpoint: &str) -> Result<T, NetError> {
        self.map_err(|e| {
            tracing::debug!(endpoint = %endpoint, error = %e, "DoH HTTP exchange failed");
            if e.is_timeout() {
                NetError::ConnectionTimedOut
            } else if e.is_closed() || e.is_incomplete_message() {
                NetError::ConnectionClosed
            } else if e.is_parse() {
                NetError::InvalidResponse
            } else {
                NetError::ConnectionFailed
            }
        })
    }
}
