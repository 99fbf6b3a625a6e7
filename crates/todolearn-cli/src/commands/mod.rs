pub mod import;
pub mod init;
pub mod list;
pub mod modes;
pub mod review;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use todolearn_core::config::{load_config_from, TodolearnConfig};
use todolearn_core::JsonFileStore;

/// Load the config and pick the deck file: `--deck` wins over the config.
pub(crate) fn open_store(
    deck: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<(TodolearnConfig, JsonFileStore)> {
    let config = load_config_from(config_path)?;
    let path = deck.unwrap_or_else(|| config.deck_path.clone());
    tracing::debug!(deck = %path.display(), "using deck");
    Ok((config, JsonFileStore::new(path)))
}
