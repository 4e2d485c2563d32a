use config::{Config, Environment, File};
use parking_lot::RwLock;
use porter_domain::config::PorterConfig;
use porter_domain::constants::{DEFAULT_CONFIG_FILE, DTO_FLAGS_KEY, ENV_PREFIX, ENV_SEPARATOR};
use porter_domain::flags::Flags;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error{}: {source}", crate::error::format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

trait ConfigErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError>;
}

impl<T> ConfigErrorExt<T> for Result<T, config::ConfigError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError> {
        self.map_err(|source| ConfigError::Config { source, context: Some(context.into()) })
    }
}

/// Loads configuration from a file with environment overrides.
///
/// 1. **Base file**: `path`, or `porter` (any supported extension) in the working directory.
///    An explicit path must exist; the default file is optional.
/// 2. **Environment**: variables prefixed with `PORTER__`, nested keys separated by `__`
///    (`PORTER__DTO__FLAGS=PARTIAL|MUTABLE` maps to `dto.flags`).
///
/// # Errors
/// Returns an error if an explicit file is missing or the merged values do not deserialize
/// into `T`.
///
/// # Example
/// ```rust
/// use porter_kernel::config::load_config;
/// use porter_kernel::domain::config::PorterConfig;
///
/// let cfg: PorterConfig = load_config(None::<&str>).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR));

    info!("Loading config from {}", effective_path.display());

    builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

static CURRENT: LazyLock<RwLock<PorterConfig>> =
    LazyLock::new(|| RwLock::new(PorterConfig::default()));

/// Installs `config` as the process-wide configuration.
pub fn install(config: PorterConfig) {
    debug!(key = DTO_FLAGS_KEY, flags = %config.dto.flags, "Installing Porter config");
    *CURRENT.write() = config;
}

/// Loads configuration through [`load_config`] and installs it.
///
/// # Errors
/// See [`load_config`].
pub fn load_and_install(path: Option<impl AsRef<Path>>) -> Result<PorterConfig, ConfigError> {
    let config: PorterConfig = load_config(path)?;
    install(config.clone());
    Ok(config)
}

#[must_use]
pub fn current() -> PorterConfig {
    CURRENT.read().clone()
}

/// Process-wide default flags (`dto.flags`), read on every construction call.
#[must_use]
pub fn flags() -> Flags {
    CURRENT.read().dto.flags
}

pub fn set_flags(flags: Flags) {
    let mut current = CURRENT.write();
    current.dto.flags = flags;
}

/// Restores the empty configuration.
pub fn reset() {
    install(PorterConfig::default());
}
