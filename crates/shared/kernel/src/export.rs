use crate::dto::Dto;
use crate::source::{SourceMap, coerce, to_value_lossy};
use serde::Serialize;

/// Exports a built DTO back into source form.
pub trait DtoExport: Dto + Serialize {
    /// The DTO as a source map; a non-map form is coerced the same way sources are.
    fn to_array(&self) -> SourceMap {
        coerce(to_value_lossy(self))
    }

    /// # Errors
    /// Returns the serializer error if the DTO cannot be written as JSON.
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<D: Dto + Serialize> DtoExport for D {}
