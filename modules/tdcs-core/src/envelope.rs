//! Text envelope for storing an [`AttributionRecord`]: base64 of a JSON object.
//!
//! The object is the record's own fields plus a `"v"` schema version.
//! Payloads without `"v"` come from the unversioned format and decode as
//! version 0. Unknown fields are ignored and missing ones take their
//! defaults, so readers on either side of a schema bump can decode each
//! other's records.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AttributionResult;
use crate::record::AttributionRecord;

pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    v: u32,
    #[serde(flatten)]
    record: &'a AttributionRecord,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    #[serde(default)]
    v: u32,
    #[serde(flatten)]
    record: AttributionRecord,
}

/// A decoded envelope and the schema version it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub version: u32,
    pub record: AttributionRecord,
}

pub fn encode(record: &AttributionRecord) -> AttributionResult<String> {
    let json = serde_json::to_vec(&EnvelopeOut {
        v: ENVELOPE_VERSION,
        record,
    })?;
    Ok(STANDARD.encode(json))
}

pub fn decode(payload: &str) -> AttributionResult<Decoded> {
    let bytes = STANDARD.decode(payload.trim())?;
    let envelope: EnvelopeIn = serde_json::from_str(&payload_text(bytes))?;
    Ok(Decoded {
        version: envelope.v,
        record: envelope.record,
    })
}

/// Unversioned writers emitted one byte per character (Latin-1), so bytes that
/// are not valid UTF-8 are read that way.
fn payload_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}
