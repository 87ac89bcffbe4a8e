use crate::base::neterror::NetError;
use crate::doh::record::{RecordLookup, RecordType};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Runs one A or AAAA query and turns the answer into addresses.
///
/// Records of another type (a CNAME in the chain, say), data that does not
/// parse as an IP, and addresses of the wrong family are skipped. No retries,
/// no caching and no timeout here; the engine owns the deadline.
#[derive(Clone)]
pub struct RecordFetcher {
    lookup: Arc<dyn RecordLookup>,
}

impl RecordFetcher {
    pub fn new(lookup: Arc<dyn RecordLookup>) -> Self {
        Self { lookup }
    }

    pub async fn fetch(&self, host: &str, kind: RecordType) -> Result<Vec<IpAddr>, NetError> {
        let lookup = self.lookup.lookup(host, kind).await?;

        let addrs = lookup
            .records
            .iter()
            .filter(|r| r.record_type == kind.code())
            .filter_map(|r| match r.data.trim().parse::<IpAddr>() {
                Ok(ip) if kind.matches(&ip) => Some(ip),
                _ => {
                    tracing::trace!(host = %host, kind = %kind, data = %r.data, "Skipping unusable record");
                    None
                }
            })
            .collect();

        Ok(addrs)
    }
}

impl fmt::Debug for RecordFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFetcher").finish_non_exhaustive()
    }
}
