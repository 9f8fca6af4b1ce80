//! Tagged JSON encoding and decoding of indicator trees.
//!
//! Every indicator serializes as `{"name": "<tag>", ...fields}`. Decoding reads
//! the tag first, looks up the decoder registered for it and hands the whole
//! object over; decoders resolve nested indicators through [`decode_value`], so
//! composite trees of any depth take the same path.

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::any::AnyIndicator;
use crate::core::{IndicatorError, IndicatorResult};

/// Wire field carrying the discriminator tag.
pub const TAG_FIELD: &str = "name";

/// Implemented by every concrete indicator that takes part in tagged dispatch.
pub trait Codec: Serialize + Sized {
    /// Discriminator written under [`TAG_FIELD`].
    const TAG: &'static str;

    /// Builds a validated indicator from a JSON object holding its fields.
    fn decode(value: Value) -> IndicatorResult<Self>;
}

type DecodeFn = fn(Value) -> IndicatorResult<AnyIndicator>;

/// Maps tags to decoders.
pub(crate) struct CodecRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl CodecRegistry {
    fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub(crate) fn register<T>(&mut self)
    where
        T: Codec + Into<AnyIndicator>,
    {
        if self.decoders.insert(T::TAG, decode_as::<T>).is_some() {
            warn!(
                tag = T::TAG,
                "duplicate indicator registration detected; overriding previous decoder"
            );
        }
    }

    fn get(&self, tag: &str) -> Option<DecodeFn> {
        self.decoders.get(tag).copied()
    }

    fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

fn decode_as<T>(value: Value) -> IndicatorResult<AnyIndicator>
where
    T: Codec + Into<AnyIndicator>,
{
    T::decode(value).map(Into::into)
}

static REGISTRY: Lazy<CodecRegistry> = Lazy::new(|| {
    let mut registry = CodecRegistry::new();
    AnyIndicator::register_all(&mut registry);
    debug!(count = registry.decoders.len(), "indicator codecs registered");
    registry
});

/// Returns every registered tag in sorted order.
pub fn registered_tags() -> Vec<&'static str> {
    REGISTRY.tags()
}

/// Decodes an indicator document.
pub fn decode(document: &str) -> IndicatorResult<AnyIndicator> {
    let value: Value = serde_json::from_str(document)?;
    decode_value(value)
}

/// Decodes an indicator from an already parsed JSON value.
pub fn decode_value(value: Value) -> IndicatorResult<AnyIndicator> {
    if !value.is_object() {
        return Err(IndicatorError::Decode(format!(
            "indicator must be a JSON object, found {value}"
        )));
    }
    let tag = match value.get(TAG_FIELD) {
        Some(Value::String(tag)) => tag.clone(),
        Some(other) => {
            return Err(IndicatorError::Decode(format!(
                "'{TAG_FIELD}' must be a string, found {other}"
            )))
        }
        None => String::new(),
    };
    let decoder = REGISTRY
        .get(&tag)
        .ok_or_else(|| IndicatorError::UnknownTag(tag.clone()))?;
    trace!(tag = %tag, "decoding indicator");
    decoder(value)
}

/// Encodes an indicator tree as a JSON document.
pub fn encode(indicator: &AnyIndicator) -> IndicatorResult<String> {
    Ok(serde_json::to_string(indicator)?)
}

/// Encodes an indicator tree as a JSON value.
pub fn encode_value(indicator: &AnyIndicator) -> IndicatorResult<Value> {
    Ok(serde_json::to_value(indicator)?)
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    name: &'static str,
    #[serde(flatten)]
    fields: &'a T,
}

/// Serializes `indicator` preceded by its tag. Usable with `serialize_with`.
pub(crate) fn tagged<T, S>(indicator: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Codec,
    S: Serializer,
{
    Tagged {
        name: T::TAG,
        fields: indicator,
    }
    .serialize(serializer)
}

pub(crate) fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Deserializes the type-specific fields of an indicator object.
pub(crate) fn fields<T: DeserializeOwned>(value: Value) -> IndicatorResult<T> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn length(indicator: &'static str, raw: i64) -> IndicatorResult<usize> {
    if raw < 1 {
        return Err(IndicatorError::invalid_length(indicator, raw));
    }
    usize::try_from(raw).map_err(|_| IndicatorError::invalid_length(indicator, raw))
}

pub(crate) fn offset(indicator: &'static str, raw: i64) -> IndicatorResult<usize> {
    usize::try_from(raw).map_err(|_| IndicatorError::InvalidOffset {
        indicator,
        offset: raw,
    })
}

pub(crate) fn enumeration<T>(field: &'static str, raw: Option<String>) -> IndicatorResult<T>
where
    T: FromStr<Err = IndicatorError>,
{
    match raw {
        Some(value) => value.parse(),
        None => Err(IndicatorError::InvalidEnum {
            field,
            value: String::new(),
        }),
    }
}

/// Decodes a required nested indicator of any kind.
pub(crate) fn source(
    indicator: &'static str,
    field: &'static str,
    raw: Option<Value>,
) -> IndicatorResult<AnyIndicator> {
    match raw {
        None | Some(Value::Null) => Err(IndicatorError::SubIndicatorMissing { indicator, field }),
        Some(value) => decode_value(value),
    }
}

/// Decodes a required nested indicator that must be of kind `T`.
pub(crate) fn typed_source<T>(
    indicator: &'static str,
    field: &'static str,
    raw: Option<Value>,
) -> IndicatorResult<T>
where
    T: Codec + TryFrom<AnyIndicator, Error = AnyIndicator>,
{
    let decoded = source(indicator, field, raw)?;
    T::try_from(decoded).map_err(|other| IndicatorError::UnexpectedSource {
        indicator,
        field,
        expected: T::TAG,
        found: other.tag(),
    })
}
