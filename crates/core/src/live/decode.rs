//! Decoding of raw upstream changes into typed events.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{ChangeEvent, ChangeKind, LiveEntity, RawChange};
use crate::constants::DOCUMENT_ID_FIELD;
use crate::errors::MalformedEvent;

/// Decodes one raw change.
///
/// The document id is written into the payload as `id` before deserializing,
/// so entity types only need an `id` field. A payload that lacks the order
/// field fails deserialization and comes back as [`MalformedEvent::Invalid`].
pub fn decode_change<T>(raw: RawChange) -> Result<ChangeEvent<T>, MalformedEvent>
where
    T: LiveEntity + DeserializeOwned,
{
    let RawChange { kind, id, data } = raw;

    let id = match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(MalformedEvent::MissingId { kind }),
    };

    match kind {
        ChangeKind::Removed => Ok(ChangeEvent::Removed { id }),
        ChangeKind::Added => decode_payload(kind, id, data).map(ChangeEvent::Added),
        ChangeKind::Modified => decode_payload(kind, id, data).map(ChangeEvent::Modified),
    }
}

/// Decodes a batch, splitting it into valid events and diagnostics.
///
/// Valid events keep their relative order.
pub fn decode_batch<T>(changes: Vec<RawChange>) -> (Vec<ChangeEvent<T>>, Vec<MalformedEvent>)
where
    T: LiveEntity + DeserializeOwned,
{
    let mut events = Vec::with_capacity(changes.len());
    let mut rejected = Vec::new();

    for raw in changes {
        match decode_change(raw) {
            Ok(event) => events.push(event),
            Err(diagnostic) => rejected.push(diagnostic),
        }
    }

    (events, rejected)
}

fn decode_payload<T>(kind: ChangeKind, id: String, data: Option<Value>) -> Result<T, MalformedEvent>
where
    T: DeserializeOwned,
{
    let mut fields: Map<String, Value> = match data {
        Some(Value::Object(fields)) => fields,
        _ => return Err(MalformedEvent::MissingData { kind, id }),
    };
    fields.insert(DOCUMENT_ID_FIELD.to_string(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields)).map_err(|e| MalformedEvent::Invalid {
        id,
        reason: e.to_string(),
    })
}
