//! Facade crate for Porter.
//! Re-exports the domain and kernel crates and wires configuration at startup.
//! Keep this crate thin: behavior lives in `porter-kernel`.
//!
//! ## Usage
//! - Add `porter` (with `server` for the axum extractor and middleware).
//! - Call [`init`] once at startup to load `porter.*` and `PORTER__*` overrides.
//! - Implement [`prelude::Dto`] for your types and build them through its entry points.

use porter_domain::config::PorterConfig;
use porter_kernel::config::ConfigError;
use std::path::Path;

pub use porter_domain as domain;
pub use porter_kernel as kernel;
pub use porter_kernel::{record_source, request_source};

pub mod prelude {
    pub use porter_kernel::prelude::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use porter_kernel::server::{
        HttpRequest, HttpRequestRejection, Hydrated, HydratedRejection, capture_current_request,
    };
}

/// Loads configuration and installs it as the process default.
///
/// `path` defaults to `porter` in the working directory, which may be absent.
///
/// # Errors
/// Returns an error if an explicit file is missing or the configuration does not deserialize.
pub fn init(path: Option<impl AsRef<Path>>) -> Result<PorterConfig, ConfigError> {
    porter_kernel::config::load_and_install(path)
}
