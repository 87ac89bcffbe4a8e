//! Integration tests against public DoH servers.
//!
//! These tests make actual network requests and verify end-to-end functionality.

use dohdns::doh::{DohClient, RecordLookup};
use dohdns::{DohConfig, DohNameServer, IpOption, NameServer};
use std::time::Duration;

/// Dual-stack lookup through Cloudflare by name
#[tokio::test]
#[ignore] // Run with --ignored flag for network tests
async fn test_cloudflare_dual_stack() {
    let config = DohConfig::new()
        .endpoint("cloudflare-dns.com")
        .timeout(Duration::from_secs(10));
    let ns = DohNameServer::new(&config).unwrap();

    match ns.query_ip("example.com", IpOption::dual()).await {
        Ok(addrs) => assert!(!addrs.is_empty()),
        Err(e) => {
            // Network might be unavailable in CI
            eprintln!("Network test skipped: {:?}", e);
        }
    }
}

/// IP-literal endpoint: no SNI, certificate checked against the address
#[tokio::test]
#[ignore]
async fn test_ip_literal_endpoint() {
    let config = DohConfig::new()
        .endpoint("1.1.1.1")
        .timeout(Duration::from_secs(10));
    let ns = DohNameServer::new(&config).unwrap();

    match ns.lookup_ipv4("example.com").await {
        Ok(addrs) => assert!(addrs.iter().all(|ip| ip.is_ipv4())),
        Err(e) => eprintln!("IP literal test skipped: {:?}", e),
    }
}

/// Raw records and metadata from Google's resolver
#[tokio::test]
#[ignore]
async fn test_google_raw_lookup() {
    let config = DohConfig::new().endpoint("https://dns.google/dns-query");
    let client = DohClient::new(&config).unwrap();

    match client.lookup_aaaa("example.com").await {
        Ok(lookup) => {
            assert_eq!(lookup.meta.rcode, "No Error");
            assert!(lookup.records.iter().any(|r| r.record_type == 28));
        }
        Err(e) => eprintln!("Raw lookup test skipped: {:?}", e),
    }
}

/// NXDOMAIN from a real server comes back as an empty answer
#[tokio::test]
#[ignore]
async fn test_nonexistent_domain() {
    let client = DohClient::new(&DohConfig::default()).unwrap();

    match client.lookup_a("does-not-exist.invalid").await {
        Ok(lookup) => assert!(lookup.is_empty()),
        Err(e) => eprintln!("NXDOMAIN test skipped: {:?}", e),
    }
}
