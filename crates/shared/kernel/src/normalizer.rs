//! Source normalization.
//!
//! Every entry point reduces its input to a [`Normalized`] pair: the canonical [`SourceMap`]
//! and the flags that input shape always forces. Normalization never validates; the only
//! failure is a JSON export that does not parse.

use crate::collection::Collection;
use crate::error::{DtoError, DtoErrorExt};
use crate::request::{CurrentRequest, EmptyRequest};
use crate::source::{
    Arrayable, Enumerable, JsonSerializable, Jsonable, Record, Request, SourceMap, SourceShape,
    Traversable, Value, coerce,
};
use porter_domain::flags::Flags;
use std::fmt;
use tracing::{debug, warn};

/// Flags forced on request sources.
pub const REQUEST_FLAGS: Flags = Flags::PARTIAL.union(Flags::IGNORE_UNKNOWN_PROPERTIES);

/// Flags forced on record sources.
pub const MODEL_FLAGS: Flags = REQUEST_FLAGS.union(Flags::CAST_PRIMITIVES);

/// A canonical source map plus the flags its entry point forces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub source: SourceMap,
    pub forced: Flags,
}

impl Normalized {
    #[must_use]
    pub const fn new(source: SourceMap, forced: Flags) -> Self {
        Self { source, forced }
    }

    /// A map with nothing forced.
    #[must_use]
    pub const fn plain(source: SourceMap) -> Self {
        Self::new(source, Flags::NONE)
    }
}

/// Normalizes an explicit request.
pub fn from_request<R: Request + ?Sized>(request: &R) -> Normalized {
    Normalized::new(request.all_fields(), REQUEST_FLAGS)
}

/// Normalizes the ambient request installed by the hosting environment.
///
/// Without an installed request this normalizes an empty one, so construction still runs with
/// the request flags and an empty map.
pub fn from_current_request() -> Normalized {
    CurrentRequest::get().map_or_else(
        || {
            warn!("No current request installed, normalizing an empty request");
            from_request(&EmptyRequest)
        },
        |request| from_request(&*request),
    )
}

/// Normalizes a record through its exported attributes.
pub fn from_model<M: Record + ?Sized>(record: &M) -> Normalized {
    Normalized::new(record.attributes(), MODEL_FLAGS)
}

/// Normalizes any source by its first matching capability.
///
/// # Errors
/// Returns [`DtoError::MalformedJson`] if a [`Jsonable`] export does not parse.
pub fn from_generic<S: SourceShape + ?Sized>(source: &S) -> Result<Normalized, DtoError> {
    let capability = Capability::of(source);
    debug!(capability = capability.name(), "Normalizing generic source");
    capability.materialize().map(Normalized::plain)
}

/// Normalizes one collection item: records take the model path, anything else the generic one.
///
/// # Errors
/// Returns [`DtoError::MalformedJson`] if a non-record item exports malformed JSON.
pub fn from_item<S: SourceShape + ?Sized>(item: &S) -> Result<Normalized, DtoError> {
    match item.as_record() {
        Some(record) => Ok(from_model(record)),
        None => from_generic(item),
    }
}

/// Normalizes every item of a collection, keeping keys, order and cardinality.
///
/// # Errors
/// Returns the first item failure.
pub fn from_collection<T: SourceShape>(
    collection: &Collection<T>,
) -> Result<Collection<Normalized>, DtoError> {
    collection.try_map(from_item)
}

/// The capability generic dispatch settled on, in precedence order.
pub enum Capability<'a> {
    Enumerable(&'a dyn Enumerable),
    Arrayable(&'a dyn Arrayable),
    Jsonable(&'a dyn Jsonable),
    JsonSerializable(&'a dyn JsonSerializable),
    Traversable(&'a dyn Traversable),
    Fallback(Value),
}

impl<'a> Capability<'a> {
    /// Picks the first capability `source` exposes.
    pub fn of<S: SourceShape + ?Sized>(source: &'a S) -> Self {
        if let Some(enumerable) = source.as_enumerable() {
            return Self::Enumerable(enumerable);
        }
        if let Some(arrayable) = source.as_arrayable() {
            return Self::Arrayable(arrayable);
        }
        if let Some(jsonable) = source.as_jsonable() {
            return Self::Jsonable(jsonable);
        }
        if let Some(serializable) = source.as_json_serializable() {
            return Self::JsonSerializable(serializable);
        }
        if let Some(traversable) = source.as_traversable() {
            return Self::Traversable(traversable);
        }
        Self::Fallback(source.as_value())
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Enumerable(_) => "enumerable",
            Self::Arrayable(_) => "arrayable",
            Self::Jsonable(_) => "jsonable",
            Self::JsonSerializable(_) => "json_serializable",
            Self::Traversable(_) => "traversable",
            Self::Fallback(_) => "fallback",
        }
    }

    /// Exports the source and coerces the result into a map.
    ///
    /// # Errors
    /// Returns [`DtoError::MalformedJson`] if a [`Jsonable`] export does not parse.
    pub fn materialize(self) -> Result<SourceMap, DtoError> {
        let value = match self {
            Self::Enumerable(enumerable) => enumerable.all(),
            Self::Arrayable(arrayable) => arrayable.to_array(),
            Self::Jsonable(jsonable) => {
                serde_json::from_str::<Value>(&jsonable.to_json()).context("Parsing JSON export")?
            }
            Self::JsonSerializable(serializable) => serializable.json_serialize(),
            // A repeated key overwrites the value but keeps its first position.
            Self::Traversable(traversable) => Value::Object(traversable.iterate().collect()),
            Self::Fallback(value) => value,
        };
        Ok(coerce(value))
    }
}

impl fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fallback(value) => f.debug_tuple("Fallback").field(value).finish(),
            other => f.write_str(other.name()),
        }
    }
}
