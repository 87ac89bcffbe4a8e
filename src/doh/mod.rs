//! DNS-over-HTTPS record lookup (RFC 8484).
//!
//! A query is encoded in DNS wire format, sent as the `dns` parameter of an
//! HTTP/1.1 GET over TLS, and the `application/dns-message` answer is decoded
//! into raw [`Record`]s.

pub mod client;
pub mod connect;
pub mod endpoint;
pub mod record;
pub mod socket;
pub mod tls;
pub mod wire;

pub use client::DohClient;
pub use endpoint::DohEndpoint;
pub use record::{DnsClass, Lookup, Querying, Record, RecordLookup, RecordType, ResponseMeta};
