//! Address resolution on top of the DoH record lookup.
//!
//! # Architecture
//!
//! - [`RecordFetcher`] runs exactly one A or AAAA query and parses the
//!   answer into addresses.
//! - [`ResolutionEngine`] runs one fetcher per requested family
//!   concurrently, bounds the whole resolution by a timeout and merges
//!   whatever arrived.
//! - [`Resolve`] is the socket-address interface other components consume.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohdns::dns::{ResolutionEngine, ResolveRequest};
//!
//! let engine = ResolutionEngine::from_lookup(Arc::new(client));
//! let addrs = engine
//!     .resolve(&ResolveRequest::dual("example.com"), Duration::from_secs(4))
//!     .await?;
//! ```

mod engine;
mod fetcher;
mod guard;
mod request;
mod resolve;

pub use engine::ResolutionEngine;
pub use fetcher::RecordFetcher;
pub use guard::{CloseOnce, CloseReason};
pub use request::{IpOption, ResolveRequest};
pub use resolve::{Addrs, Name, Resolve, Resolving};
