//! The card deck: owner of all root and mode cards.
//!
//! Selection is split in two. [`CardDeck::next_due_card`] picks among cards
//! already introduced into a mode, and [`CardDeck::select_unlearned_cards`]
//! finds root cards that still need introducing. The review session prefers
//! the former and falls back to the latter.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};
use crate::model::{BoundCard, ModeCard, RootCard};
use crate::review::ReviewResult;

/// In-memory collection of root cards and mode cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDeck {
    #[serde(default)]
    cards: Vec<RootCard>,
    #[serde(default)]
    mode_cards: Vec<ModeCard>,
}

impl CardDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck from root cards that have not been introduced yet.
    pub fn from_cards(cards: impl IntoIterator<Item = RootCard>) -> Result<Self> {
        let mut deck = Self::new();
        for card in cards {
            deck.add_card(card)?;
        }
        Ok(deck)
    }

    /// Build a deck from raw collections without any consistency checks.
    ///
    /// Used when loading records written by another tool; run
    /// [`crate::validate::validate_deck`] to find problems.
    pub fn from_parts(cards: Vec<RootCard>, mode_cards: Vec<ModeCard>) -> Self {
        Self { cards, mode_cards }
    }

    pub fn cards(&self) -> &[RootCard] {
        &self.cards
    }

    pub fn mode_cards(&self) -> &[ModeCard] {
        &self.mode_cards
    }

    /// Number of root cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Insert a root card.
    pub fn add_card(&mut self, card: RootCard) -> Result<()> {
        if self.cards.iter().any(|c| c.id == card.id) {
            return Err(CardError::DuplicateCard(card.id));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Exact lookup of a root card.
    pub fn get_card_by_uid(&self, uid: &str) -> Result<&RootCard> {
        self.cards
            .iter()
            .find(|c| c.id == uid)
            .ok_or_else(|| CardError::not_found(uid))
    }

    /// Exact lookup of the mode card for a (root, mode) pair.
    pub fn get_mode_card(&self, root_uid: &str, mode: &str) -> Result<&ModeCard> {
        self.mode_cards
            .iter()
            .find(|m| m.related_to == root_uid && m.mode == mode)
            .ok_or_else(|| CardError::ModeCardNotFound {
                root: root_uid.to_string(),
                mode: mode.to_string(),
            })
    }

    /// All mode cards belonging to one root card.
    pub fn mode_cards_of<'a>(&'a self, root_uid: &'a str) -> impl Iterator<Item = &'a ModeCard> {
        self.mode_cards
            .iter()
            .filter(move |m| m.related_to == root_uid)
    }

    /// Join a mode card with its root card.
    pub fn bind<'a>(&'a self, mode_card: &'a ModeCard) -> Result<BoundCard<'a>> {
        let root = self.get_card_by_uid(&mode_card.related_to)?;
        Ok(BoundCard { root, mode_card })
    }

    /// Introduce a root card into a review mode.
    ///
    /// Fails with [`CardError::DuplicateModeCard`] rather than replacing an
    /// existing mode card, so scheduling history is never lost.
    pub fn introduce_mode(
        &mut self,
        root_uid: &str,
        mode: &str,
        due: DateTime<Utc>,
    ) -> Result<&ModeCard> {
        self.get_card_by_uid(root_uid)?;
        if self.get_mode_card(root_uid, mode).is_ok() {
            return Err(CardError::DuplicateModeCard {
                root: root_uid.to_string(),
                mode: mode.to_string(),
            });
        }

        let mode_card = ModeCard::new(root_uid, mode, due);
        tracing::debug!(root = root_uid, mode, %due, id = %mode_card.id, "introduced card");
        self.mode_cards.push(mode_card);
        Ok(&self.mode_cards[self.mode_cards.len() - 1])
    }

    /// Root cards with no mode card in any of `modes`, highest priority
    /// first. Equal priorities keep insertion order.
    ///
    /// Mode cards of modes outside `modes` do not count as learned.
    pub fn select_unlearned_cards<'a>(
        &'a self,
        modes: &[String],
        limit: Option<usize>,
    ) -> impl Iterator<Item = &'a RootCard> + 'a {
        let learned: HashSet<&str> = self
            .mode_cards
            .iter()
            .filter(|m| modes.contains(&m.mode))
            .map(|m| m.related_to.as_str())
            .collect();

        let mut candidates: Vec<&RootCard> = self
            .cards
            .iter()
            .filter(|c| !learned.contains(c.id.as_str()))
            .collect();
        candidates.sort_by_key(|c| Reverse(c.effective_priority()));

        candidates.into_iter().take(limit.unwrap_or(usize::MAX))
    }

    /// The earliest-due mode card among `modes`.
    ///
    /// With `due_by`, cards due after that instant are skipped. Cards that
    /// were never scheduled are skipped too. Ties go to the card stored
    /// first.
    pub fn next_due_card(
        &self,
        modes: &[String],
        due_by: Option<DateTime<Utc>>,
    ) -> Option<&ModeCard> {
        self.next_due_card_where(modes, due_by, |_| true)
    }

    /// [`next_due_card`](Self::next_due_card) restricted to mode cards
    /// accepted by `include`.
    pub fn next_due_card_where(
        &self,
        modes: &[String],
        due_by: Option<DateTime<Utc>>,
        include: impl Fn(&ModeCard) -> bool,
    ) -> Option<&ModeCard> {
        self.mode_cards
            .iter()
            .filter(|m| modes.contains(&m.mode) && include(m))
            .filter_map(|m| m.due.map(|due| (due, m)))
            .filter(|(due, _)| due_by.map_or(true, |limit| *due <= limit))
            .min_by_key(|(due, _)| *due)
            .map(|(_, m)| m)
    }

    /// Apply the scheduling outcome of a graded review.
    pub fn record_review(&mut self, result: &ReviewResult) -> Result<()> {
        let id = &result.review.card.id;
        let next_due = result.next_due();
        let mode_card = self
            .mode_cards
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| CardError::not_found(id.as_str()))?;
        mode_card.due = Some(next_due);
        tracing::debug!(
            id = %mode_card.id,
            mode = %mode_card.mode,
            mark = result.mark,
            %next_due,
            "rescheduled card"
        );
        Ok(())
    }
}
