//! axum integration: request snapshots, the [`Hydrated`] extractor and the middleware that
//! installs the current request for a handler chain.

mod extract;
mod middleware;
mod request;

pub use extract::{Hydrated, HydratedRejection};
pub use middleware::capture_current_request;
pub use request::{DEFAULT_BODY_LIMIT, HttpRequest, HttpRequestRejection};
