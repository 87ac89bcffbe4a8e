//! Concurrent A/AAAA resolution with a hard deadline.
//!
//! One fetch task per requested family writes addresses into a shared
//! channel; the caller's loop collects until every task is done or the
//! deadline passes, whichever comes first. Both signals go through a
//! [`CloseOnce`] so the collection stops exactly once.

use crate::base::neterror::NetError;
use crate::dns::fetcher::RecordFetcher;
use crate::dns::guard::{CloseOnce, CloseReason};
use crate::dns::request::ResolveRequest;
use crate::doh::record::{RecordLookup, RecordType};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Fans out one query per address family and merges the answers.
#[derive(Clone, Debug)]
pub struct ResolutionEngine {
    fetcher: RecordFetcher,
}

impl ResolutionEngine {
    pub fn new(fetcher: RecordFetcher) -> Self {
        Self { fetcher }
    }

    pub fn from_lookup(lookup: Arc<dyn RecordLookup>) -> Self {
        Self::new(RecordFetcher::new(lookup))
    }

    /// Resolve `request`, spending at most `timeout` on it.
    ///
    /// Per-query failures are logged and count as zero records. The result
    /// is `EmptyResponse` when nothing usable arrived in time, and
    /// `InvalidRequest` (before any query) when no family is wanted.
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
        timeout: Duration,
    ) -> Result<Vec<IpAddr>, NetError> {
        request.validate()?;
        let start = Instant::now();

        let (tx, mut rx) = mpsc::channel::<IpAddr>(1);
        let guard = Arc::new(CloseOnce::new());
        let pending = Arc::new(AtomicUsize::new(request.family_count()));

        let families = [
            (request.want_ipv4, RecordType::A),
            (request.want_ipv6, RecordType::AAAA),
        ];
        for kind in families.into_iter().filter(|(want, _)| *want).map(|(_, k)| k) {
            let task = FetchTask {
                fetcher: self.fetcher.clone(),
                host: request.host.clone(),
                kind,
                tx: tx.clone(),
                _done: Completion {
                    pending: pending.clone(),
                    guard: guard.clone(),
                },
            };
            tokio::spawn(task.run());
        }
        // Only the tasks hold senders from here on.
        drop(tx);

        let _watcher = TimeoutWatcher::spawn(guard.clone(), timeout);

        let mut addrs = Vec::new();
        loop {
            tokio::select! {
                biased;
                item = rx.recv() => match item {
                    Some(ip) => addrs.push(ip),
                    None => {
                        guard.close(CloseReason::Completed);
                        break;
                    }
                },
                _ = guard.closed() => break,
            }
        }

        // Refuse further sends, then take whatever was already handed off.
        rx.close();
        while let Some(ip) = rx.recv().await {
            addrs.push(ip);
        }

        if guard.reason() == Some(CloseReason::TimedOut) {
            tracing::debug!(host = %request.host, timeout = ?timeout, collected = addrs.len(), "DoH timed out");
        }
        tracing::debug!(
            host = %request.host,
            count = addrs.len(),
            elapsed = ?start.elapsed(),
            "DoH resolution finished"
        );

        if addrs.is_empty() {
            return Err(NetError::EmptyResponse);
        }
        Ok(addrs)
    }
}

/// One in-flight A or AAAA query.
///
/// Field order matters: the sender is dropped before the completion is
/// counted.
struct FetchTask {
    fetcher: RecordFetcher,
    host: String,
    kind: RecordType,
    tx: mpsc::Sender<IpAddr>,
    _done: Completion,
}

impl FetchTask {
    async fn run(self) {
        let addrs = match self.fetcher.fetch(&self.host, self.kind).await {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(host = %self.host, kind = %self.kind, error = %e, "DoH query failed");
                return;
            }
        };

        if addrs.is_empty() {
            tracing::debug!(host = %self.host, kind = %self.kind, "DoH query returned no addresses");
        }

        for ip in addrs {
            if self.tx.send(ip).await.is_err() {
                // Collector already closed; the rest is not wanted.
                tracing::trace!(host = %self.host, kind = %self.kind, "Dropping late DoH answer");
                return;
            }
        }
    }
}

/// Counts a fetch task as finished when dropped, panics included. The last
/// one closes the guard.
struct Completion {
    pending: Arc<AtomicUsize>,
    guard: Arc<CloseOnce>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.guard.close(CloseReason::Completed);
        }
    }
}

/// Closes the guard after the deadline. Aborted on drop so it never
/// outlives the resolution.
struct TimeoutWatcher(JoinHandle<()>);

impl TimeoutWatcher {
    fn spawn(guard: Arc<CloseOnce>, timeout: Duration) -> Self {
        Self(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            guard.close(CloseReason::TimedOut);
        }))
    }
}

impl Drop for TimeoutWatcher {
    fn drop(&mut self) {
        self.0.abort();
    }
}
