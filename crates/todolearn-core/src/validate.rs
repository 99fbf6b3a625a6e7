//! Deck consistency checks.
//!
//! Decks loaded from disk may have been edited by hand or by another tool.
//! These checks report problems without failing the load.

use std::collections::HashSet;

use crate::deck::CardDeck;
use crate::mode::ModeRegistry;

/// A validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The card id (if applicable).
    pub card_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn card(id: &str, message: String) -> Self {
        Self {
            card_id: Some(id.to_string()),
            message,
        }
    }
}

/// Validate a deck against the mode registry.
pub fn validate_deck(deck: &CardDeck, registry: &ModeRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate ids
    let mut seen = HashSet::new();
    for card in deck.cards() {
        if !seen.insert(card.id.as_str()) {
            warnings.push(ValidationWarning::card(
                &card.id,
                format!("duplicate card ID: {}", card.id),
            ));
        }
    }
    let mut seen = HashSet::new();
    for mode_card in deck.mode_cards() {
        if !seen.insert(mode_card.id.as_str()) {
            warnings.push(ValidationWarning::card(
                &mode_card.id,
                format!("duplicate mode card ID: {}", mode_card.id),
            ));
        }
    }

    // Empty content
    for card in deck.cards() {
        if card.question.trim().is_empty() {
            warnings.push(ValidationWarning::card(&card.id, "question is empty".into()));
        }
        if card.answer.trim().is_empty() {
            warnings.push(ValidationWarning::card(&card.id, "answer is empty".into()));
        }
    }

    // Mode cards: dangling roots, unknown modes, repeated (root, mode) pairs
    let mut pairs = HashSet::new();
    for mode_card in deck.mode_cards() {
        if deck.get_card_by_uid(&mode_card.related_to).is_err() {
            warnings.push(ValidationWarning::card(
                &mode_card.id,
                format!("refers to missing card {}", mode_card.related_to),
            ));
        }
        if !registry.contains(&mode_card.mode) {
            warnings.push(ValidationWarning::card(
                &mode_card.id,
                format!("unknown review mode: {}", mode_card.mode),
            ));
        }
        if !pairs.insert((mode_card.related_to.as_str(), mode_card.mode.as_str())) {
            warnings.push(ValidationWarning::card(
                &mode_card.id,
                format!(
                    "card {} has more than one '{}' mode card",
                    mode_card.related_to, mode_card.mode
                ),
            ));
        }
        if mode_card.progress > 100 {
            warnings.push(ValidationWarning::card(
                &mode_card.id,
                format!("progress {} is above 100", mode_card.progress),
            ));
        }
    }

    warnings
}
