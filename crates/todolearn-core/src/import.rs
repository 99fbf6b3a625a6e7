//! TOML card file parser.
//!
//! Loads root cards from TOML files and directories:
//!
//! ```toml
//! [[cards]]
//! question = "card"
//! answer = "die Karte"
//! priority = 2
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::deck::CardDeck;
use crate::model::RootCard;

/// Intermediate TOML structure for parsing card files.
#[derive(Debug, Deserialize)]
struct TomlCardFile {
    #[serde(default)]
    cards: Vec<TomlCard>,
}

#[derive(Debug, Deserialize)]
struct TomlCard {
    #[serde(default)]
    id: Option<String>,
    question: String,
    answer: String,
    #[serde(default)]
    priority: Option<i32>,
    #[serde(default)]
    extra: toml::Table,
}

/// Parse a single TOML file into root cards.
pub fn parse_card_file(path: &Path) -> Result<Vec<RootCard>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read card file: {}", path.display()))?;

    parse_card_file_str(&content, path)
}

/// Parse a TOML string into root cards (useful for testing).
pub fn parse_card_file_str(content: &str, source_path: &Path) -> Result<Vec<RootCard>> {
    let parsed: TomlCardFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    parsed
        .cards
        .into_iter()
        .map(|c| {
            let mut card = RootCard::new(c.question, c.answer);
            if let Some(id) = c.id {
                card.id = id;
            }
            card.priority = c.priority;
            for (key, value) in c.extra {
                let value = serde_json::to_value(value)
                    .with_context(|| format!("unsupported value for extra field '{key}'"))?;
                card.extra.insert(key, value);
            }
            Ok::<_, anyhow::Error>(card)
        })
        .collect()
}

/// Load all `*.toml` card files in a directory, in file name order.
pub fn load_card_directory(dir: &Path) -> Result<Vec<RootCard>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    entries.sort();

    let mut cards = Vec::new();
    for path in &entries {
        cards.extend(parse_card_file(path)?);
    }
    Ok(cards)
}

/// Load cards from a file or a directory of files.
pub fn load_cards(path: &Path) -> Result<Vec<RootCard>> {
    if path.is_dir() {
        load_card_directory(path)
    } else {
        parse_card_file(path)
    }
}

/// Outcome of merging imported cards into a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Add imported cards to `deck`, skipping cards whose id or question is
/// already present.
pub fn merge_cards(deck: &mut CardDeck, cards: Vec<RootCard>) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for card in cards {
        if deck.cards().iter().any(|c| c.question == card.question) {
            tracing::warn!(question = %card.question, "question already in deck, skipping");
            summary.skipped += 1;
            continue;
        }
        match deck.add_card(card) {
            Ok(()) => summary.added += 1,
            Err(e) => {
                tracing::warn!("skipping card: {e}");
                summary.skipped += 1;
            }
        }
    }
    summary
}
