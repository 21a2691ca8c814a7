//! Runtime configuration from environment variables.

use std::path::PathBuf;

use crate::adapters::DEFAULT_MODEL_PATH;

pub const MODEL_PATH_ENV: &str = "SLEEPSENSE_MODEL_PATH";
pub const LOG_MODE_ENV: &str = "SLEEPSENSE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "SLEEPSENSE_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "sleepsense.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal, stdout otherwise.
    Auto,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    ///
    /// Writing logs to the terminal would corrupt the TUI's alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            model_path: get(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            log_mode: get(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: get(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_path, PathBuf::from("models/sleep_model.json"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (MODEL_PATH_ENV, "/opt/models/tree.json"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "/tmp/sleepsense.log"),
        ]));
        assert_eq!(config.model_path, PathBuf::from("/opt/models/tree.json"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/tmp/sleepsense.log"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[(MODEL_PATH_ENV, "  ")]));
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }
}
