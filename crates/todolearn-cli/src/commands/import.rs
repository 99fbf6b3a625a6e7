//! The `todolearn import` command.

use std::path::PathBuf;

use anyhow::Result;

use todolearn_core::import::{load_cards, merge_cards};
use todolearn_core::DeckStore;

pub fn execute(
    file: PathBuf,
    deck_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = super::open_store(deck_path, config_path.as_deref())?;
    let cards = load_cards(&file)?;
    let mut deck = store.load()?;

    let summary = merge_cards(&mut deck, cards);
    store.save(&deck)?;

    println!(
        "Imported {} card(s) into {} ({} skipped)",
        summary.added,
        store.path().display(),
        summary.skipped
    );
    Ok(())
}
