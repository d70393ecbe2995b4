//! Response envelope validation
//!
//! Enveloped replies must carry `status == "ok"` and resolve the full result
//! path; direct replies only need the path. Both kinds of violation surface
//! uniformly as [`Error::NotFound`] — the upstream API reports them
//! identically and finer distinctions would invent a contract that does not
//! exist.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::query::{QueryDescriptor, ResponseShape};

/// Descend a key path, treating numeric segments as array indices
pub fn descend<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| match current {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => current.get(key.as_str()),
    })
}

/// Validate a reply against a descriptor and unwrap the payload
pub fn validate(reply: &Value, descriptor: &QueryDescriptor) -> Result<Value> {
    if descriptor.shape == ResponseShape::Enveloped
        && reply.get("status").and_then(Value::as_str) != Some("ok")
    {
        return Err(Error::NotFound);
    }

    descend(reply, &descriptor.result_path)
        .cloned()
        .ok_or(Error::NotFound)
}
