//! todolearn configuration.
//!
//! Search order:
//! 1. an explicit path (must exist)
//! 2. `todolearn.toml` in the current directory
//! 3. `~/.config/todolearn/config.toml`
//!
//! Environment variable overrides: `TODOLEARN_DECK`, `TODOLEARN_MODES`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_BATCH_SIZE;

/// Top-level todolearn configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodolearnConfig {
    /// Deck file used when no path is given on the command line.
    #[serde(default = "default_deck_path")]
    pub deck_path: PathBuf,
    /// Active review modes; empty means every registered mode.
    #[serde(default)]
    pub modes: Vec<String>,
    /// Unlearned cards introduced when nothing is due.
    #[serde(default = "default_batch_size")]
    pub new_cards_per_batch: usize,
    /// Input that ends a review session.
    #[serde(default = "default_quit_command")]
    pub quit_command: String,
}

fn default_deck_path() -> PathBuf {
    PathBuf::from("./deck.json")
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_quit_command() -> String {
    "q".to_string()
}

impl Default for TodolearnConfig {
    fn default() -> Self {
        Self {
            deck_path: default_deck_path(),
            modes: Vec::new(),
            new_cards_per_batch: default_batch_size(),
            quit_command: default_quit_command(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Split a comma-separated mode list, dropping blanks.
pub fn parse_mode_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<TodolearnConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TodolearnConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("todolearn.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => TodolearnConfig::default(),
    };

    if let Ok(deck) = std::env::var("TODOLEARN_DECK") {
        config.deck_path = PathBuf::from(deck);
    }
    if let Ok(modes) = std::env::var("TODOLEARN_MODES") {
        config.modes = parse_mode_list(&modes);
    }
    config.deck_path = PathBuf::from(resolve_env_vars(&config.deck_path.to_string_lossy()));

    anyhow::ensure!(
        config.new_cards_per_batch >= 1,
        "new_cards_per_batch must be at least 1"
    );
    anyhow::ensure!(
        !config.quit_command.is_empty(),
        "quit_command must not be empty"
    );

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<TodolearnConfig> {
    Ok(toml::from_str::<TodolearnConfig>(content)?)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("todolearn"))
}
