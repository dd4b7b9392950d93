//! Reshaping of raw server replies into the client-facing shape.
//!
//! Both transforms work on untyped JSON so that fields the client does not
//! know about pass through untouched. Typed deserialization happens after.

use serde_json::{Map, Value};

use crate::network::ProtocolVersion;

/// Whether a reply reports an in-band server error.
///
/// An `error` key holding `null`, `false`, `0` or `""` does not count, which
/// matches how the server's JavaScript clients have always tested it.
pub fn is_error_reply(reply: &Value) -> bool {
    match reply.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

/// Pair the parallel `digests` and `results` arrays of a timestamp reply.
///
/// `{digests: [A, B], results: [0, 1]}` becomes
/// `{digests: [{digest: A, result: 0}, {digest: B, result: 1}]}`.
///
/// Error replies are returned unchanged. On v1 the top-level
/// `servertimestamp` moves onto every entry; v2 leaves it where it is. A
/// reply without a `digests` array comes back without a `digests` field.
pub fn merge_results_and_digests(reply: Value, version: ProtocolVersion) -> Value {
    if is_error_reply(&reply) {
        return reply;
    }
    let Value::Object(mut obj) = reply else {
        return reply;
    };

    let digests = obj.remove("digests");
    let results = obj.remove("results");
    let servertimestamp = match version {
        ProtocolVersion::V1 => obj.remove("servertimestamp"),
        ProtocolVersion::V2 => None,
    };

    if let Some(Value::Array(digests)) = digests {
        let results = match results {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        };
        let entries = digests
            .into_iter()
            .enumerate()
            .map(|(i, digest)| {
                let mut entry = Map::with_capacity(3);
                entry.insert("digest".to_owned(), digest);
                if let Some(result) = results.get(i) {
                    entry.insert("result".to_owned(), result.clone());
                }
                if let Some(ts) = &servertimestamp {
                    entry.insert("servertimestamp".to_owned(), ts.clone());
                }
                Value::Object(entry)
            })
            .collect();
        obj.insert("digests".to_owned(), Value::Array(entries));
    }

    Value::Object(obj)
}

/// Drop the per-digest `timestamps` list some verify replies carry alongside
/// `digests`.
pub fn strip_timestamps_field(reply: Value) -> Value {
    match reply {
        Value::Object(mut obj) => {
            obj.remove("timestamps");
            Value::Object(obj)
        }
        other => other,
    }
}
