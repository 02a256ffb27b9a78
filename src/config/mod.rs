//! Configuration module for dirwatcher
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (DIRWATCHER_*)
//! 3. Explicit `--config` file, else user config (~/.config/dirwatcher/config.toml)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    apply_env_overrides, resolve, resolve_file, user_config_path, with_env_overrides,
    ConfigWarning,
};
pub use types::{validate_marker, Config, LogConfig, WatchConfig, MAX_DELAY_SECS};
