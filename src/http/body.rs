//! Request body reading and decoding
//!
//! Bodies are capped at the configured ceiling both by `Content-Length` and
//! while streaming, then decoded by media type into a JSON value.

use std::collections::BTreeMap;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::error::BodyError;
use crate::logger;

/// Reject early when `Content-Length` already exceeds the ceiling
///
/// A malformed header is logged and left to the streaming limit.
pub fn check_content_length(headers: &HeaderMap, max_body_size: u64) -> Result<(), BodyError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Err(BodyError::TooLarge)
        }
        Ok(_) => Ok(()),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', relying on streaming limit"
            ));
            Ok(())
        }
    }
}

/// Collect the body, failing with `TooLarge` once `max_body_size` bytes are exceeded
pub async fn read_limited<B>(body: B, max_body_size: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(BodyError::TooLarge),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Body encodings the classify endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    /// Anything else is ignored and treated as an empty object
    Other,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let media_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if media_type == "application/json" || media_type.ends_with("+json") {
            Self::Json
        } else if media_type == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }
}

/// Decode a collected body into a JSON value
pub fn decode(kind: BodyKind, bytes: &[u8]) -> Result<Value, BodyError> {
    match kind {
        BodyKind::Json if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Value::Object(Map::new())),
        BodyKind::Json => Ok(serde_json::from_slice(bytes)?),
        BodyKind::Form => Ok(decode_form(bytes)),
        BodyKind::Other => Ok(Value::Object(Map::new())),
    }
}

/// A form field as it accumulates across pairs
enum FormField {
    Single(String),
    /// Values with their explicit `[n]` index, if any
    List(Vec<(Option<usize>, String)>),
    Nested(Map<String, Value>),
}

/// Split `name[suffix]` into `name` and the bracket content
fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.find('[') {
        Some(open) if open > 0 && key.ends_with(']') => (&key[..open], Some(&key[open + 1..key.len() - 1])),
        _ => (key, None),
    }
}

/// Decode `application/x-www-form-urlencoded` with bracket conventions:
/// `k[]=a&k[]=b`, `k[0]=a&k[1]=b` and repeated `k=a&k=b` build arrays,
/// `k[name]=v` builds an object, a single `k=v` stays a string.
pub fn decode_form(bytes: &[u8]) -> Value {
    let mut fields: BTreeMap<String, FormField> = BTreeMap::new();
    let mut order: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(bytes) {
        let (name, suffix) = split_key(&key);
        let value = value.into_owned();
        let index = suffix.and_then(|s| s.parse::<usize>().ok());

        let Some(field) = fields.get_mut(name) else {
            order.push(name.to_string());
            let field = match suffix {
                None => FormField::Single(value),
                Some("") => FormField::List(vec![(None, value)]),
                Some(_) if index.is_some() => FormField::List(vec![(index, value)]),
                Some(sub) => {
                    let mut map = Map::new();
                    map.insert(sub.to_string(), Value::String(value));
                    FormField::Nested(map)
                }
            };
            fields.insert(name.to_string(), field);
            continue;
        };

        match field {
            FormField::Single(first) => {
                let first = std::mem::take(first);
                *field = FormField::List(vec![(None, first), (index, value)]);
            }
            FormField::List(items) => items.push((index, value)),
            FormField::Nested(map) => {
                if let Some(sub) = suffix.filter(|s| !s.is_empty()) {
                    map.insert(sub.to_string(), Value::String(value));
                }
            }
        }
    }

    let mut object = Map::new();
    for name in order {
        let Some(field) = fields.remove(&name) else {
            continue;
        };
        let value = match field {
            FormField::Single(s) => Value::String(s),
            FormField::List(mut items) => {
                // Explicit indices order first; unindexed values keep arrival order after them
                items.sort_by_key(|(index, _)| index.unwrap_or(usize::MAX));
                Value::Array(items.into_iter().map(|(_, v)| Value::String(v)).collect())
            }
            FormField::Nested(map) => Value::Object(map),
        };
        object.insert(name, value);
    }
    Value::Object(object)
}
