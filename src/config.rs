use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_COMMITS_LIMIT: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the log viewer, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub repo_path: PathBuf,
    pub commits_limit: usize,
    pub show_uncommitted: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let repo_path = lookup("GIT_REPO_PATH")
            .filter(|path| !path.is_empty())
            .ok_or(ConfigError::Missing("GIT_REPO_PATH"))?;

        let commits_limit = match lookup("GPIG_COMMITS_LIMIT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "GPIG_COMMITS_LIMIT",
                value,
            })?,
            None => DEFAULT_COMMITS_LIMIT,
        };

        let show_uncommitted = match lookup("GPIG_SHOW_UNCOMMITTED") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                key: "GPIG_SHOW_UNCOMMITTED",
                value,
            })?,
            None => true,
        };

        Ok(Self {
            repo_path: PathBuf::from(repo_path),
            commits_limit,
            show_uncommitted,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
