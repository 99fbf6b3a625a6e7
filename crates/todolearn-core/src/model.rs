//! Core data model types for todolearn.
//!
//! A deck holds two flat collections: root cards carrying the learning
//! content, and mode cards carrying per-mode scheduling state. A mode card
//! points at its root card by id only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A piece of learning content: a question and its expected answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCard {
    /// Unique identifier.
    #[serde(default = "new_id")]
    pub id: String,
    /// Text shown to the learner.
    pub question: String,
    /// The exact response expected from the learner.
    pub answer: String,
    /// Introduction precedence; higher values are introduced first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Extension fields carried through load/save untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RootCard {
    /// Create a card with a freshly generated id.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            question: question.into(),
            answer: answer.into(),
            priority: None,
            extra: BTreeMap::new(),
        }
    }

    /// Use an explicit id instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the introduction priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Effective priority used for ordering (missing counts as zero).
    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(0)
    }
}

/// Scheduling state of one root card in one review mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeCard {
    /// Unique identifier.
    pub id: String,
    /// Review mode name, a key into the mode registry.
    pub mode: String,
    /// Id of the root card this mode card belongs to.
    pub related_to: String,
    /// When the card is next due; `None` means never scheduled.
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    /// Completion percentage (0-100).
    #[serde(default)]
    pub progress: u8,
}

impl ModeCard {
    pub(crate) fn new(root_id: &str, mode: &str, due: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            mode: mode.to_string(),
            related_to: root_id.to_string(),
            due: Some(due),
            progress: 0,
        }
    }
}

/// A mode card joined with the root card it refers to.
///
/// This is what review modes render and rate. It borrows from the deck and
/// lives only for the duration of a single operation.
#[derive(Debug, Clone, Copy)]
pub struct BoundCard<'a> {
    pub root: &'a RootCard,
    pub mode_card: &'a ModeCard,
}

impl<'a> BoundCard<'a> {
    pub fn raw_question(&self) -> &'a str {
        &self.root.question
    }

    pub fn correct_response(&self) -> &'a str {
        &self.root.answer
    }

    pub fn progress(&self) -> u8 {
        self.mode_card.progress
    }

    pub fn due(&self) -> Option<DateTime<Utc>> {
        self.mode_card.due
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
