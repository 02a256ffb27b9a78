//! Configuration loading

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        file: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `<config_dir>/dirwatcher/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dirwatcher").join("config.toml"))
}

/// Resolve file configuration: an explicit `--config` file wins over the
/// user config. Env overrides are applied on top.
pub fn resolve(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let (config, warnings) = resolve_file(explicit, user_config_path().as_deref())?;
    Ok((with_env_overrides(config), warnings))
}

/// File layer only. A missing user config falls back to defaults; a missing
/// explicit config is an error.
pub fn resolve_file(
    explicit: Option<&Path>,
    user_config: Option<&Path>,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    if let Some(path) = explicit {
        return load_with_warnings(path);
    }
    match user_config {
        Some(path) if path.exists() => load_with_warnings(path),
        _ => Ok((Config::default(), Vec::new())),
    }
}

/// Apply environment variable overrides (DIRWATCHER_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |name| std::env::var(name).ok(), &mut std::io::stderr())
}

/// Apply overrides from `lookup`. Invalid values are reported to `writer`
/// and leave the setting untouched.
pub fn apply_env_overrides<L, W>(mut config: Config, lookup: L, writer: &mut W) -> Config
where
    L: Fn(&str) -> Option<String>,
    W: Write,
{
    let seconds = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    };

    // DIRWATCHER_INTERVAL
    if let Some(value) = lookup("DIRWATCHER_INTERVAL") {
        let validator = EnvVarValidator::new("DIRWATCHER_INTERVAL", "a positive number of seconds");
        config.watch.interval = validator.parse_with_writer(
            &value,
            |v| seconds(v).filter(|s| *s > 0.0),
            config.watch.interval,
            writer,
        );
    }

    // DIRWATCHER_EXTENSION
    if let Some(value) = lookup("DIRWATCHER_EXTENSION") {
        config.watch.extension = value;
    }

    // DIRWATCHER_BACKOFF
    if let Some(value) = lookup("DIRWATCHER_BACKOFF") {
        let validator = EnvVarValidator::new("DIRWATCHER_BACKOFF", "zero or more seconds");
        config.watch.backoff =
            validator.parse_with_writer(&value, seconds, config.watch.backoff, writer);
    }

    // DIRWATCHER_MAX_BYTES
    if let Some(value) = lookup("DIRWATCHER_MAX_BYTES") {
        let validator = EnvVarValidator::new("DIRWATCHER_MAX_BYTES", "a byte count above zero");
        config.watch.max_bytes_per_scan = validator.parse_with_writer(
            &value,
            |v| v.trim().parse::<u64>().ok().filter(|n| *n > 0).map(Some),
            config.watch.max_bytes_per_scan,
            writer,
        );
    }

    // DIRWATCHER_LOG_FILE
    if let Some(value) = lookup("DIRWATCHER_LOG_FILE") {
        if !value.is_empty() {
            config.log.file = Some(PathBuf::from(value));
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "interval",
        "extension",
        "backoff",
        "max_bytes_per_scan",
        "log",
        "file",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
