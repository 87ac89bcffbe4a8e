//! # dohdns
//!
//! A DNS-over-HTTPS name server backend for a network proxy runtime.
//!
//! Hostnames are resolved by sending DNS queries inside HTTPS requests
//! (RFC 8484), so resolution traffic looks like any other TLS connection.
//! Callers ask for IPv4, IPv6 or both; both families are queried
//! concurrently and the whole resolution is bounded by one timeout.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dohdns::{DohConfig, DohNameServer, IpOption, NameServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DohConfig::new().endpoint("1.1.1.1");
//!     let server = DohNameServer::new(&config).unwrap();
//!     let addrs = server.query_ip("example.com", IpOption::dual()).await.unwrap();
//!     println!("{:?}", addrs);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and context helpers
//! - [`config`] - Name server configuration
//! - [`dns`] - Resolution engine, fetcher and the `Resolve` interface
//! - [`doh`] - DNS-over-HTTPS record lookup transport
//! - [`nameserver`] - The `NameServer` surface and its DoH implementation
//!
//! ## Behavior
//!
//! - A failed query for one family never aborts the other.
//! - Per-query failures are logged, not returned: a resolution either
//!   yields addresses or `EmptyResponse`.
//! - Nothing is cached or retried, and every query uses a fresh connection.

pub mod base;
pub mod config;
pub mod dns;
pub mod doh;
pub mod nameserver;

pub use base::neterror::NetError;
pub use config::DohConfig;
pub use dns::{IpOption, ResolutionEngine, ResolveRequest};
pub use doh::{DohClient, RecordLookup, RecordType};
pub use nameserver::{DohNameServer, NameServer};
