//! Record-level types shared by the transport and the resolution engine.

use crate::base::neterror::NetError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::{fmt, net::IpAddr, sync::Arc, time::Duration};

/// Address record types this resolver queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 host address.
    A,
    /// IPv6 host address.
    AAAA,
}

impl RecordType {
    /// The RR TYPE code on the wire.
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::AAAA => 28,
        }
    }

    /// Whether `ip` belongs to the address family this type resolves to.
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            RecordType::A => ip.is_ipv4(),
            RecordType::AAAA => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::AAAA => f.write_str("AAAA"),
        }
    }
}

/// DNS class placed in the question section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsClass {
    /// Internet
    #[default]
    IN,
    /// Chaos
    CH,
    /// Hesiod
    HS,
}

impl DnsClass {
    pub fn code(self) -> u16 {
        match self {
            DnsClass::IN => 1,
            DnsClass::CH => 3,
            DnsClass::HS => 4,
        }
    }
}

/// One answer record in presentation form.
///
/// `data` is kept as text: turning it into an address is the fetcher's job,
/// and a record whose data does not parse is skipped there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub record_type: u16,
    pub ttl: u32,
    pub data: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        record_type: u16,
        ttl: u32,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            data: data.into(),
        }
    }

    /// Build an A or AAAA record carrying `ip`.
    pub fn from_ip(name: impl Into<String>, ip: IpAddr) -> Self {
        let kind = match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::AAAA,
        };
        Self::new(name, kind.code(), 300, ip.to_string())
    }
}

/// Response metadata that accompanies the answer records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMeta {
    /// Response code as reported by the server (e.g. "No Error").
    pub rcode: String,
    /// TC bit of the response header.
    pub truncated: bool,
    /// Wall-clock time the query took.
    pub elapsed: Duration,
}

/// The outcome of one successful query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lookup {
    pub records: Vec<Record>,
    pub meta: ResponseMeta,
}

impl Lookup {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            meta: ResponseMeta::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Alias for the `Future` type returned by a record lookup.
pub type Querying = BoxFuture<'static, Result<Lookup, NetError>>;

/// A single-query DNS record lookup capability.
///
/// One call is one query: no retries, no caching, and no timeout of its
/// own. Callers that need a deadline race the returned future against it.
pub trait RecordLookup: Send + Sync {
    /// Query `host` for records of type `kind`.
    fn lookup(&self, host: &str, kind: RecordType) -> Querying;

    /// Query `host` for A records.
    fn lookup_a(&self, host: &str) -> Querying {
        self.lookup(host, RecordType::A)
    }

    /// Query `host` for AAAA records.
    fn lookup_aaaa(&self, host: &str) -> Querying {
        self.lookup(host, RecordType::AAAA)
    }
}

impl<L: RecordLookup + ?Sized> RecordLookup for Arc<L> {
    fn lookup(&self, host: &str, kind: RecordType) -> Querying {
        (**self).lookup(host, kind)
    }
}
