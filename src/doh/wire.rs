//! RFC 1035 message encoding for DoH GET requests.
//!
//! Queries always go out with ID 0 (RFC 8484 §4.1 asks GET clients to do so
//! for cache friendliness); responses must echo it back.

use crate::base::neterror::NetError;
use crate::doh::record::{DnsClass, Lookup, Record, RecordType, ResponseMeta};
use hickory_resolver::proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_resolver::proto::rr::{self, DNSClass, Name};
use std::time::Duration;

/// Message ID used for every query.
pub const QUERY_ID: u16 = 0;

impl From<RecordType> for rr::RecordType {
    fn from(kind: RecordType) -> Self {
        match kind {
            RecordType::A => rr::RecordType::A,
            RecordType::AAAA => rr::RecordType::AAAA,
        }
    }
}

impl From<DnsClass> for DNSClass {
    fn from(class: DnsClass) -> Self {
        match class {
            DnsClass::IN => DNSClass::IN,
            DnsClass::CH => DNSClass::CH,
            DnsClass::HS => DNSClass::HS,
        }
    }
}

fn query_name(host: &str) -> Result<Name, NetError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(NetError::InvalidHostname(String::new()));
    }
    let mut name =
        Name::from_utf8(host).map_err(|_| NetError::InvalidHostname(host.to_string()))?;
    name.set_fqdn(true);
    Ok(name)
}

/// Build a recursive query with a single question for `host`.
pub fn encode_query(
    host: &str,
    kind: RecordType,
    class: DnsClass,
    id: u16,
) -> Result<Vec<u8>, NetError> {
    let name = query_name(host)?;

    let mut query = Query::query(name, kind.into());
    query.set_query_class(class.into());

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(query);

    message.to_vec().map_err(|e| {
        tracing::debug!(host = %host, error = %e, "Failed to encode DNS query");
        NetError::InvalidHostname(host.to_string())
    })
}

/// Decode a response message into a [`Lookup`].
///
/// NXDOMAIN is an answer, not a failure: it yields an empty lookup. Any
/// other non-NOERROR code becomes [`NetError::DnsResponseError`].
pub fn decode_response(
    bytes: &[u8],
    expected_id: u16,
    elapsed: Duration,
) -> Result<Lookup, NetError> {
    let message = Message::from_vec(bytes).map_err(|e| {
        tracing::debug!(error = %e, len = bytes.len(), "Malformed DNS response");
        NetError::InvalidResponse
    })?;

    if message.message_type() != MessageType::Response || message.id() != expected_id {
        return Err(NetError::InvalidResponse);
    }

    let code = message.response_code();
    let meta = ResponseMeta {
        rcode: code.to_str().to_string(),
        truncated: message.truncated(),
        elapsed,
    };

    match code {
        ResponseCode::NoError => {}
        ResponseCode::NXDomain => {
            return Ok(Lookup {
                records: Vec::new(),
                meta,
            })
        }
        other => {
            return Err(NetError::DnsResponseError {
                rcode: other.to_str().to_string(),
            })
        }
    }

    let records = message
        .answers()
        .iter()
        .map(|answer| {
            Record::new(
                answer.name().to_string(),
                u16::from(answer.record_type()),
                answer.ttl(),
                answer.data().to_string(),
            )
        })
        .collect();

    Ok(Lookup { records, meta })
}
