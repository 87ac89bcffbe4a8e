//! Name Server Tests
//!
//! Covers:
//! - `query_ip` dispatch per address-family option
//! - `InvalidRequest` when no family is enabled
//! - `Resolve` adapter (port-0 socket addresses)
//! - Selection by name through a `dyn NameServer` registry

use dohdns::dns::{Name, Resolve};
use dohdns::doh::{Lookup, Querying, Record, RecordLookup, RecordType};
use dohdns::{DohNameServer, IpOption, NameServer, NetError};

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingLookup {
    queried: Mutex<Vec<(String, RecordType)>>,
}

impl RecordingLookup {
    fn kinds(&self) -> Vec<RecordType> {
        let mut kinds: Vec<_> = self.queried.lock().unwrap().iter().map(|(_, k)| *k).collect();
        kinds.sort_by_key(|k| k.code());
        kinds
    }
}

impl RecordLookup for RecordingLookup {
    fn lookup(&self, host: &str, kind: RecordType) -> Querying {
        self.queried.lock().unwrap().push((host.to_string(), kind));
        let ip: IpAddr = match kind {
            RecordType::A => "203.0.113.5".parse().unwrap(),
            RecordType::AAAA => "2001:db8::5".parse().unwrap(),
        };
        let record = Record::from_ip(host, ip);
        Box::pin(async move { Ok(Lookup::new(vec![record])) })
    }
}

fn server() -> (Arc<RecordingLookup>, DohNameServer) {
    let lookup = Arc::new(RecordingLookup::default());
    let ns = DohNameServer::with_lookup(lookup.clone(), Duration::from_secs(1));
    (lookup, ns)
}

#[tokio::test]
async fn test_query_ip_dual() {
    let (lookup, ns) = server();
    let addrs = ns.query_ip("example.test", IpOption::dual()).await.unwrap();

    assert_eq!(addrs.len(), 2);
    assert_eq!(lookup.kinds(), vec![RecordType::A, RecordType::AAAA]);
}

#[tokio::test]
async fn test_query_ip_ipv4_only() {
    let (lookup, ns) = server();
    let addrs = ns.query_ip("example.test", IpOption::ipv4_only()).await.unwrap();

    assert_eq!(addrs, vec!["203.0.113.5".parse::<IpAddr>().unwrap()]);
    assert_eq!(lookup.kinds(), vec![RecordType::A]);
}

#[tokio::test]
async fn test_query_ip_ipv6_only() {
    let (lookup, ns) = server();
    let addrs = ns.query_ip("example.test", IpOption::ipv6_only()).await.unwrap();

    assert_eq!(addrs, vec!["2001:db8::5".parse::<IpAddr>().unwrap()]);
    assert_eq!(lookup.kinds(), vec![RecordType::AAAA]);
}

#[tokio::test]
async fn test_query_ip_no_family_is_invalid_request() {
    let (lookup, ns) = server();
    let err = ns
        .query_ip("example.test", IpOption::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NetError::InvalidRequest));
    assert!(lookup.kinds().is_empty());
}

#[tokio::test]
async fn test_resolve_returns_port_zero_addrs() {
    let (_, ns) = server();
    let mut addrs: Vec<SocketAddr> = ns.resolve(Name::new("example.test")).await.unwrap().collect();
    addrs.sort();

    assert_eq!(
        addrs,
        vec![
            "203.0.113.5:0".parse::<SocketAddr>().unwrap(),
            "[2001:db8::5]:0".parse::<SocketAddr>().unwrap()
        ]
    );
}

#[tokio::test]
async fn test_selected_by_name() {
    let (_, ns) = server();
    let mut registry: HashMap<String, Arc<dyn NameServer>> = HashMap::new();
    registry.insert(ns.name().to_string(), Arc::new(ns));

    let selected = registry.get("dohdns").expect("registered under its name");
    let addrs = selected
        .query_ip("example.test", IpOption::ipv4_only())
        .await
        .unwrap();
    assert_eq!(addrs.len(), 1);
}

#[tokio::test]
async fn test_hostname_forwarded_verbatim() {
    let (lookup, ns) = server();
    ns.lookup_ipv4("www.example.test").await.unwrap();

    let queried = lookup.queried.lock().unwrap();
    assert_eq!(queried[0].0, "www.example.test");
}
