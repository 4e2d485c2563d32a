use crate::flags::Flags;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Top-level configuration shared across the workspace.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PorterConfigInner {
    pub dto: DtoConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PorterConfig {
    #[serde(flatten, default)]
    inner: Arc<PorterConfigInner>,
}

impl PorterConfig {
    /// Shortcut for a configuration that only sets the default flags.
    #[must_use]
    pub fn with_flags(flags: Flags) -> Self {
        let mut config = Self::default();
        config.dto.flags = flags;
        config
    }
}

impl Deref for PorterConfig {
    type Target = PorterConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PorterConfig {
    fn deref_mut(&mut self) -> &mut PorterConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// DTO construction settings (the `dto` section).
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DtoConfig {
    /// Flags merged into every construction call (`dto.flags`).
    pub flags: Flags,
}
