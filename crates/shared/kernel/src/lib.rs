//! Porter kernel: source normalization, flag composition and DTO construction dispatch.
//!
//! A DTO type implements [`Dto::construct`], its hydration engine. Porter supplies the entry
//! points in front of it: each one reduces its input to a canonical [`SourceMap`], merges the
//! effective flags and calls the engine exactly once.
//!
//! ```text
//! effective = process_default | type_default | call_site | forced
//! ```
//!
//! | Entry point                | Forced flags                                           |
//! |----------------------------|--------------------------------------------------------|
//! | `from_request`             | `PARTIAL \| IGNORE_UNKNOWN_PROPERTIES`                 |
//! | `from_current_request`     | `PARTIAL \| IGNORE_UNKNOWN_PROPERTIES`                 |
//! | `from_model`               | `PARTIAL \| IGNORE_UNKNOWN_PROPERTIES \| CAST_PRIMITIVES` |
//! | `from_source`, `make`      | none                                                   |
//! | `from_collection`          | per item: model flags for records, none otherwise      |
//!
//! ## Generic sources
//! `from_source` checks capabilities in a fixed order (enumerable, arrayable, jsonable,
//! json-serializable, traversable) and falls back to coercing the plain value:
//!
//! ```rust
//! use porter_kernel::prelude::*;
//!
//! #[derive(Debug)]
//! struct Raw(SourceMap);
//!
//! impl Dto for Raw {
//!     fn construct(source: SourceMap, _: &Hydration) -> Result<Self, HydrationError> {
//!         Ok(Self(source))
//!     }
//! }
//!
//! let raw = Raw::from_source(&serde_json::json!(["a", "b"]), Flags::NONE).unwrap();
//! assert_eq!(raw.0["1"], "b");
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! let cfg = porter_kernel::config::load_and_install(Some("config/porter.toml"))?;
//! ```

pub mod collection;
pub mod composer;
pub mod config;
pub mod dispatch;
mod dto;
mod error;
mod export;
pub mod hydration;
pub mod normalizer;
pub mod registry;
pub mod request;
#[cfg(feature = "server")]
pub mod server;
pub mod source;

pub use collection::Collection;
pub use dto::Dto;
pub use error::{DtoError, DtoErrorExt, HydrationError, HydrationErrorExt};
pub use export::DtoExport;
pub use hydration::Hydration;
pub use porter_domain as domain;
pub use porter_domain::flags::Flags;
pub use registry::Listener;
pub use source::{SourceMap, Value};

pub mod prelude {
    pub use crate::collection::Collection;
    pub use crate::dto::Dto;
    pub use crate::error::{DtoError, DtoErrorExt, HydrationError, HydrationErrorExt};
    pub use crate::export::DtoExport;
    pub use crate::hydration::Hydration;
    pub use crate::registry::Listener;
    pub use crate::request::CurrentRequest;
    pub use crate::source::{
        Arrayable, Enumerable, JsonSerializable, Jsonable, Pairs, Record, Request, Serialized,
        SourceMap, SourceShape, Traversable, Value,
    };
    pub use crate::{record_source, request_source};
    pub use porter_domain::flags::Flags;
}
