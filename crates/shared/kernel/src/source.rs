//! Source shapes accepted by the construction entry points.
//!
//! A value takes part in generic dispatch by implementing [`SourceShape`] and returning the
//! capabilities it supports. The normalizer checks them in a fixed order, so a type may expose
//! several at once (a collection is enumerable, arrayable, jsonable and traversable) and the
//! first one wins.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

pub use serde_json::Value;

/// Canonical key-value map handed to a DTO's hydration engine.
///
/// Insertion ordered: keys keep the order in which the source exported them.
pub type SourceMap = serde_json::Map<String, Value>;

/// An HTTP request able to export every field it carries.
pub trait Request: Send + Sync {
    /// All body, query and path fields, keys and value shapes verbatim.
    fn all_fields(&self) -> SourceMap;
}

/// A persisted record (ORM model) able to export its loaded attributes.
pub trait Record {
    fn attributes(&self) -> SourceMap;
}

/// A collection-like value that can materialize all of its elements.
pub trait Enumerable {
    fn all(&self) -> Value;
}

pub trait Arrayable {
    fn to_array(&self) -> Value;
}

/// A value exporting itself as a JSON document.
pub trait Jsonable {
    fn to_json(&self) -> String;
}

/// A value describing its own serializable form.
pub trait JsonSerializable {
    fn json_serialize(&self) -> Value;
}

/// A value that can be walked as `(key, value)` pairs.
pub trait Traversable {
    fn iterate(&self) -> Box<dyn Iterator<Item = (String, Value)> + '_>;
}

/// Capability table consulted by generic dispatch.
///
/// Every accessor defaults to "not supported"; [`SourceShape::as_value`] is the permissive
/// fallback used when nothing else matches and defaults to `null` (an empty map).
pub trait SourceShape {
    /// Marks the value as a record so collections route it through the model path.
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        None
    }

    fn as_arrayable(&self) -> Option<&dyn Arrayable> {
        None
    }

    fn as_jsonable(&self) -> Option<&dyn Jsonable> {
        None
    }

    fn as_json_serializable(&self) -> Option<&dyn JsonSerializable> {
        None
    }

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        None
    }

    fn as_value(&self) -> Value {
        Value::Null
    }
}

/// Coerces an exported value into a [`SourceMap`].
///
/// Objects are kept, arrays are keyed by index, `null` becomes empty and any other scalar
/// becomes a single entry under `"0"`.
#[must_use]
pub fn coerce(value: Value) -> SourceMap {
    match value {
        Value::Object(map) => map,
        Value::Null => SourceMap::new(),
        Value::Array(items) => {
            items.into_iter().enumerate().map(|(index, item)| (index.to_string(), item)).collect()
        }
        scalar => {
            let mut map = SourceMap::new();
            map.insert("0".to_owned(), scalar);
            map
        }
    }
}

/// Serializes into a [`Value`], degrading to `null` if the type cannot be represented.
pub(crate) fn to_value_lossy<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(
            error = %e,
            source_type = std::any::type_name::<T>(),
            "Source value is not representable as JSON, using null"
        );
        Value::Null
    })
}

/// Wraps any [`Serialize`] value as a self-describing source.
///
/// ```rust
/// use porter_kernel::source::{Serialized, SourceShape};
///
/// #[derive(serde::Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let source = Serialized(Point { x: 1, y: 2 });
/// assert!(source.as_json_serializable().is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Serialized<T>(pub T);

impl<T: Serialize> JsonSerializable for Serialized<T> {
    fn json_serialize(&self) -> Value {
        to_value_lossy(&self.0)
    }
}

impl<T: Serialize> SourceShape for Serialized<T> {
    fn as_json_serializable(&self) -> Option<&dyn JsonSerializable> {
        Some(self)
    }
}

/// Ordered `(key, value)` pairs, walked through [`Traversable`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pairs(pub Vec<(String, Value)>);

impl Pairs {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Pairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Traversable for Pairs {
    fn iterate(&self) -> Box<dyn Iterator<Item = (String, Value)> + '_> {
        Box::new(self.0.iter().cloned())
    }
}

impl SourceShape for Pairs {
    fn as_traversable(&self) -> Option<&dyn Traversable> {
        Some(self)
    }
}

// --- Plain values take the fallback path ---

impl SourceShape for Value {
    fn as_value(&self) -> Value {
        self.clone()
    }
}

impl SourceShape for SourceMap {
    fn as_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl SourceShape for Vec<Value> {
    fn as_value(&self) -> Value {
        Value::Array(self.clone())
    }
}

impl SourceShape for str {
    fn as_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl SourceShape for String {
    fn as_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl SourceShape for bool {
    fn as_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl SourceShape for i64 {
    fn as_value(&self) -> Value {
        Value::from(*self)
    }
}

impl SourceShape for u64 {
    fn as_value(&self) -> Value {
        Value::from(*self)
    }
}

impl SourceShape for f64 {
    fn as_value(&self) -> Value {
        Value::from(*self)
    }
}

impl SourceShape for () {}

impl<T: SourceShape> SourceShape for Option<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(SourceShape::as_record)
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        self.as_ref().and_then(SourceShape::as_enumerable)
    }

    fn as_arrayable(&self) -> Option<&dyn Arrayable> {
        self.as_ref().and_then(SourceShape::as_arrayable)
    }

    fn as_jsonable(&self) -> Option<&dyn Jsonable> {
        self.as_ref().and_then(SourceShape::as_jsonable)
    }

    fn as_json_serializable(&self) -> Option<&dyn JsonSerializable> {
        self.as_ref().and_then(SourceShape::as_json_serializable)
    }

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        self.as_ref().and_then(SourceShape::as_traversable)
    }

    fn as_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, SourceShape::as_value)
    }
}

macro_rules! forward_source_shape {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl<T: SourceShape + ?Sized> SourceShape for $wrapper {
                fn as_record(&self) -> Option<&dyn Record> {
                    (**self).as_record()
                }

                fn as_enumerable(&self) -> Option<&dyn Enumerable> {
                    (**self).as_enumerable()
                }

                fn as_arrayable(&self) -> Option<&dyn Arrayable> {
                    (**self).as_arrayable()
                }

                fn as_jsonable(&self) -> Option<&dyn Jsonable> {
                    (**self).as_jsonable()
                }

                fn as_json_serializable(&self) -> Option<&dyn JsonSerializable> {
                    (**self).as_json_serializable()
                }

                fn as_traversable(&self) -> Option<&dyn Traversable> {
                    (**self).as_traversable()
                }

                fn as_value(&self) -> Value {
                    (**self).as_value()
                }
            }
        )*
    };
}

forward_source_shape!(&T, Box<T>, Arc<T>);

/// Implements [`SourceShape`] and [`Arrayable`] for a [`Record`] type.
///
/// Inside collections the record takes the model path; passed to `from_source` it is exported
/// through its attributes like any arrayable value.
#[macro_export]
macro_rules! record_source {
    ($ty:ty) => {
        impl $crate::source::Arrayable for $ty {
            fn to_array(&self) -> $crate::source::Value {
                $crate::source::Value::Object($crate::source::Record::attributes(self))
            }
        }

        impl $crate::source::SourceShape for $ty {
            fn as_record(&self) -> Option<&dyn $crate::source::Record> {
                Some(self)
            }

            fn as_arrayable(&self) -> Option<&dyn $crate::source::Arrayable> {
                Some(self)
            }
        }
    };
}

/// Implements [`SourceShape`] and [`Arrayable`] for a [`Request`] type so it can also be
/// passed to `from_source` (without the forced request flags).
#[macro_export]
macro_rules! request_source {
    ($ty:ty) => {
        impl $crate::source::Arrayable for $ty {
            fn to_array(&self) -> $crate::source::Value {
                $crate::source::Value::Object($crate::source::Request::all_fields(self))
            }
        }

        impl $crate::source::SourceShape for $ty {
            fn as_arrayable(&self) -> Option<&dyn $crate::source::Arrayable> {
                Some(self)
            }
        }
    };
}
