//! The `todolearn validate` command.

use std::path::PathBuf;

use anyhow::Result;

use todolearn_core::validate::validate_deck;
use todolearn_core::{DeckStore, ModeRegistry};

pub fn execute(deck_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = super::open_store(deck_path, config_path.as_deref())?;
    anyhow::ensure!(
        store.exists(),
        "deck file not found: {}",
        store.path().display()
    );
    let deck = store.load()?;
    let registry = ModeRegistry::with_builtin();

    println!(
        "Deck: {} ({} cards, {} mode cards)",
        store.path().display(),
        deck.len(),
        deck.mode_cards().len()
    );

    let warnings = validate_deck(&deck, &registry);
    for w in &warnings {
        let prefix = w
            .card_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Deck valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
