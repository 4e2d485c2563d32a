//! Ambient request context.
//!
//! The hosting environment installs the request being served for the duration of a task;
//! `Dto::from_current_request` reads it back without the caller threading it through.

use crate::source::{Request, SourceMap};
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT_REQUEST: Arc<dyn Request>;
}

/// Access to the request installed for the current task.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentRequest;

impl CurrentRequest {
    /// Runs `future` with `request` installed as the current request.
    pub async fn scope<F>(request: Arc<dyn Request>, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_REQUEST.scope(request, future).await
    }

    /// Runs `f` with `request` installed, for synchronous callers and tests.
    pub fn sync_scope<R>(request: Arc<dyn Request>, f: impl FnOnce() -> R) -> R {
        CURRENT_REQUEST.sync_scope(request, f)
    }

    #[must_use]
    pub fn get() -> Option<Arc<dyn Request>> {
        CURRENT_REQUEST.try_with(Arc::clone).ok()
    }

    #[must_use]
    pub fn is_set() -> bool {
        CURRENT_REQUEST.try_with(|_| ()).is_ok()
    }
}

/// A request carrying no fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRequest;

impl Request for EmptyRequest {
    fn all_fields(&self) -> SourceMap {
        SourceMap::new()
    }
}
