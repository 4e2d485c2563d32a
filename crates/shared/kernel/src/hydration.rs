use crate::registry::Listener;
use crate::source::Value;
use porter_domain::flags::Flags;
use std::sync::Arc;

/// Everything a DTO's hydration engine receives besides the source map.
#[derive(Debug, Clone, Default)]
pub struct Hydration {
    flags: Flags,
    listener: Option<Arc<dyn Listener>>,
}

impl Hydration {
    #[must_use]
    pub const fn new(flags: Flags) -> Self {
        Self { flags, listener: None }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Option<Arc<dyn Listener>>) -> Self {
        self.listener = listener;
        self
    }

    /// The effective flags for this construction call.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub const fn has(&self, flags: Flags) -> bool {
        self.flags.contains(flags)
    }

    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.has(Flags::PARTIAL)
    }

    #[must_use]
    pub const fn ignores_unknown_properties(&self) -> bool {
        self.has(Flags::IGNORE_UNKNOWN_PROPERTIES)
    }

    #[must_use]
    pub const fn casts_primitives(&self) -> bool {
        self.has(Flags::CAST_PRIMITIVES)
    }

    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.has(Flags::MUTABLE)
    }

    #[must_use]
    pub fn listener(&self) -> Option<&Arc<dyn Listener>> {
        self.listener.as_ref()
    }

    /// Passes `value` through the registered listener, if any.
    #[must_use]
    pub fn resolve(&self, property: &str, value: Value) -> Value {
        match &self.listener {
            Some(listener) => listener.resolve(property, value),
            None => value,
        }
    }
}
