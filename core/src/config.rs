//! Loading `my_app_configs.jsonc`.
//!
//! The file is JSON with `//` and `/* */` comments. Comments are dropped
//! (outside string literals) and the rest goes through `serde_json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::mapping::BoardMapping;
use crate::types::Credentials;

pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_CONFIG_FILE: &str = "my_app_configs.jsonc";
pub const CONFIG_ENV_VAR: &str = "REDOIT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub credentials: Credentials,
    #[serde(default)]
    pub board_mappings: Vec<BoardMapping>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_comments(raw))
    }
}

/// `$REDOIT_CONFIG`, falling back to `my_app_configs.jsonc` in the working
/// directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Drop comments but keep their newlines, so serde_json error positions
/// still point at the right line.
fn strip_comments(raw: &str) -> String {
    enum State {
        Code,
        Str,
        Escape,
        Line,
        Block,
    }

    let mut out = String::with_capacity(raw.len());
    let mut state = State::Code;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek().copied()) {
                ('"', _) => {
                    state = State::Str;
                    out.push(c);
                }
                ('/', Some('/')) => {
                    chars.next();
                    state = State::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = State::Block;
                }
                _ => out.push(c),
            },
            State::Str => {
                match c {
                    '\\' => state = State::Escape,
                    '"' => state = State::Code,
                    _ => {}
                }
                out.push(c);
            }
            State::Escape => {
                state = State::Str;
                out.push(c);
            }
            State::Line => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                } else if c == '\n' {
                    out.push(c);
                }
            }
        }
    }
    out
}
