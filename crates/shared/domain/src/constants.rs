/// Dotted configuration key holding the process-wide default flags.
pub const DTO_FLAGS_KEY: &str = "dto.flags";

/// Environment prefix for configuration overrides (`PORTER__DTO__FLAGS`).
pub const ENV_PREFIX: &str = "PORTER";

/// Separator between nested configuration keys in environment variables.
pub const ENV_SEPARATOR: &str = "__";

/// Configuration file loaded when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "porter";

/// Separator accepted between flag names in textual flag sets.
pub const FLAG_SEPARATOR: char = '|';
