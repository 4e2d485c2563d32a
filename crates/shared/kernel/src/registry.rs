//! Listener registry keyed by DTO type.
//!
//! A [`Listener`] resolves property values while a DTO hydrates, typically to supply defaults
//! backed by injected services. Listeners are registered once at startup; construction only
//! looks them up.

use crate::dto::Dto;
use crate::source::Value;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{TypeId, type_name};
use std::fmt::Debug;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Resolves property values for one DTO type.
///
/// Dependencies are plain struct fields set when the listener is built.
pub trait Listener: Debug + Send + Sync + 'static {
    /// Returns the value to hydrate `property` with. Defaults to the incoming value.
    fn resolve(&self, property: &str, value: Value) -> Value {
        let _ = property;
        value
    }
}

#[derive(Debug, Clone)]
struct Registration {
    dto: &'static str,
    listener: Arc<dyn Listener>,
}

static LISTENERS: LazyLock<RwLock<FxHashMap<TypeId, Registration>>> =
    LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Registers `listener` for `D`, replacing any previous one.
pub fn listen<D: Dto>(listener: impl Listener) {
    listen_shared::<D>(Arc::new(listener));
}

/// Registers an already shared listener for `D`.
pub fn listen_shared<D: Dto>(listener: Arc<dyn Listener>) {
    let dto = type_name::<D>();
    debug!(dto, "Registering DTO listener");
    LISTENERS.write().insert(TypeId::of::<D>(), Registration { dto, listener });
}

/// Removes the listener for `D`; returns whether one was registered.
pub fn forget<D: Dto>() -> bool {
    LISTENERS.write().remove(&TypeId::of::<D>()).is_some()
}

#[must_use]
pub fn listener_for<D: Dto>() -> Option<Arc<dyn Listener>> {
    LISTENERS.read().get(&TypeId::of::<D>()).map(|registration| Arc::clone(&registration.listener))
}

/// Type names of every DTO with a listener (for diagnostics).
#[must_use]
pub fn registered() -> Vec<&'static str> {
    let mut names: Vec<_> =
        LISTENERS.read().values().map(|registration| registration.dto).collect();
    names.sort_unstable();
    names
}

pub fn clear() {
    LISTENERS.write().clear();
}

/// Number of registered listeners.
#[must_use]
pub fn listeners() -> usize {
    LISTENERS.read().len()
}
