//! Deck persistence.
//!
//! A [`DeckStore`] loads a whole deck at the start of a session and saves it
//! at the end. [`JsonFileStore`] keeps the deck in a pretty-printed JSON
//! file and saves by upserting records by id, so records written by other
//! tools survive a round trip.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deck::CardDeck;

/// Load/save contract for deck storage backends.
pub trait DeckStore {
    /// Load the full collection.
    fn load(&self) -> Result<CardDeck>;

    /// Persist the collection, upserting records by id.
    fn save(&self, deck: &CardDeck) -> Result<()>;
}

/// Deck stored as a JSON document: `{ "cards": [...], "mode_cards": [...] }`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

/// Raw on-disk layout. Records stay untyped so unknown fields and records
/// are preserved when merging.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DeckDocument {
    #[serde(default)]
    cards: Vec<Value>,
    #[serde(default)]
    mode_cards: Vec<Value>,
    #[serde(flatten)]
    other: serde_json::Map<String, Value>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_document(&self) -> Result<Option<DeckDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read deck from {}", self.path.display()))?;
        let document = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse deck JSON: {}", self.path.display()))?;
        Ok(Some(document))
    }
}

impl DeckStore for JsonFileStore {
    fn load(&self) -> Result<CardDeck> {
        let Some(document) = self.read_document()? else {
            tracing::info!(path = %self.path.display(), "no deck file, starting empty");
            return Ok(CardDeck::new());
        };

        let cards = document
            .cards
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<_>>>()
            .with_context(|| format!("invalid card record in {}", self.path.display()))?;
        let mode_cards = document
            .mode_cards
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<_>>>()
            .with_context(|| format!("invalid mode card record in {}", self.path.display()))?;

        let deck = CardDeck::from_parts(cards, mode_cards);
        tracing::debug!(
            path = %self.path.display(),
            cards = deck.len(),
            mode_cards = deck.mode_cards().len(),
            "loaded deck"
        );
        Ok(deck)
    }

    fn save(&self, deck: &CardDeck) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();

        upsert_all(&mut document.cards, deck.cards())?;
        upsert_all(&mut document.mode_cards, deck.mode_cards())?;

        let json = serde_json::to_string_pretty(&document).context("failed to serialize deck")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write deck to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "saved deck");
        Ok(())
    }
}

/// Merge each record into the stored one with the same `id`, or append
/// it. Keys a record does not carry are kept.
fn upsert_all<T: Serialize>(stored: &mut Vec<Value>, records: &[T]) -> Result<()> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(stored.len());
    for (i, existing) in stored.iter().enumerate() {
        if let Some(id) = existing.get("id").and_then(Value::as_str) {
            index.entry(id.to_string()).or_insert(i);
        }
    }

    for record in records {
        let record = serde_json::to_value(record)?;
        let id = record.get("id").and_then(Value::as_str).map(str::to_string);
        let Some(id) = id else {
            stored.push(record);
            continue;
        };
        match index.get(&id) {
            Some(&i) => match (&mut stored[i], record) {
                (Value::Object(existing), Value::Object(fields)) => existing.extend(fields),
                (existing, record) => *existing = record,
            },
            None => {
                index.insert(id, stored.len());
                stored.push(record);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::FULL_ANSWER;
    use crate::model::RootCard;
    use chrono::{TimeZone, Utc};

    fn sample_deck() -> CardDeck {
        CardDeck::from_cards([
            RootCard::new("card", "die Karte").with_id("card"),
            RootCard::new("learn", "lernen").with_id("learn"),
        ])
        .unwrap()
    }

    #[test]
    fn missing_file_loads_empty_deck() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("deck.json"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_scheduling() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deck.json"));
        let due = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();

        let mut deck = sample_deck();
        deck.introduce_mode("learn", FULL_ANSWER, due).unwrap();
        store.save(&deck).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, deck);
        assert_eq!(
            loaded.get_mode_card("learn", FULL_ANSWER).unwrap().due,
            Some(due)
        );
    }

    #[test]
    fn save_upserts_and_keeps_unrelated_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(
            &path,
            r#"{
  "cards": [
    { "id": "learn", "question": "learn", "answer": "old answer", "x-note": "verb" },
    { "id": "remote-only", "question": "correct", "answer": "richtig", "x-color": "red" }
  ],
  "mode_cards": [],
  "calendar": "work"
}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        store.save(&sample_deck()).unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let cards = saved["cards"].as_array().unwrap();
        let ids: Vec<&str> = cards.iter().map(|c| c["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["learn", "remote-only", "card"]);
        assert_eq!(cards[0]["answer"], "lernen");
        assert_eq!(cards[1]["x-color"], "red");
        assert_eq!(cards[0]["x-note"], "verb");
        assert_eq!(saved["calendar"], "work");

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn resaving_a_large_deck_keeps_one_record_per_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("deck.json"));
        let cards = (0..5_000).map(|i| RootCard::new(format!("q{i}"), format!("a{i}")));
        let mut deck = CardDeck::from_cards(cards).unwrap();
        store.save(&deck).unwrap();

        let id = deck.cards()[42].id.clone();
        deck.introduce_mode(&id, FULL_ANSWER, Utc::now()).unwrap();
        store.save(&deck).unwrap();
        store.save(&deck).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 5_000);
        assert_eq!(loaded.mode_cards().len(), 1);
        assert_eq!(loaded, deck);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse deck JSON"));
    }
}
