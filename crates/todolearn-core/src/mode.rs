//! Review modes and the registry that maps mode names to them.
//!
//! A review mode decides how a card is asked and how an answer is marked.
//! Modes are registered once at startup on an explicit [`ModeRegistry`]
//! that is then passed to the deck operations and the review session.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CardError, Result};
use crate::model::BoundCard;

/// Name of the baseline mode: show the question, expect the full answer.
pub const FULL_ANSWER: &str = "full-answer";

// ---------------------------------------------------------------------------
// ReviewMode trait
// ---------------------------------------------------------------------------

/// Strategy for presenting and grading a card.
pub trait ReviewMode: Send + Sync {
    /// Registry key (e.g. "full-answer").
    fn name(&self) -> &str;

    /// Render the prompt shown to the learner.
    fn question(&self, card: &BoundCard<'_>) -> String;

    /// Score a response against the correct one. Zero means no credit.
    fn mark(&self, response: &str, correct_response: &str) -> u32;

    /// Priority signal for card ordering; higher is harder.
    fn rate_difficulty(&self, card: &BoundCard<'_>) -> i32;
}

/// The baseline mode: the question is asked verbatim and only an exact
/// answer earns a mark.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullAnswerMode;

impl ReviewMode for FullAnswerMode {
    fn name(&self) -> &str {
        FULL_ANSWER
    }

    fn question(&self, card: &BoundCard<'_>) -> String {
        card.raw_question().to_string()
    }

    fn mark(&self, response: &str, correct_response: &str) -> u32 {
        u32::from(response == correct_response)
    }

    fn rate_difficulty(&self, card: &BoundCard<'_>) -> i32 {
        100 - i32::from(card.progress())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Mapping from mode name to review mode.
#[derive(Clone, Default)]
pub struct ModeRegistry {
    modes: BTreeMap<String, Arc<dyn ReviewMode>>,
}

impl ModeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in modes.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .modes
            .insert(FULL_ANSWER.to_string(), Arc::new(FullAnswerMode));
        registry
    }

    /// Register a mode under its own name.
    pub fn register(&mut self, mode: Arc<dyn ReviewMode>) -> Result<()> {
        let name = mode.name().to_string();
        if self.modes.contains_key(&name) {
            return Err(CardError::DuplicateMode(name));
        }
        self.modes.insert(name, mode);
        Ok(())
    }

    /// Look up a mode by name.
    pub fn get(&self, name: &str) -> Result<&dyn ReviewMode> {
        self.modes
            .get(name)
            .map(|mode| mode.as_ref())
            .ok_or_else(|| CardError::UnknownMode(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Registered mode names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.modes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Resolve the active mode list: all registered modes when `requested`
    /// is empty, otherwise `requested` after checking every name is known.
    pub fn resolve_active(&self, requested: &[String]) -> Result<Vec<String>> {
        if requested.is_empty() {
            return Ok(self.names());
        }
        for name in requested {
            self.get(name)?;
        }
        Ok(requested.to_vec())
    }
}

impl std::fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.modes.keys().collect::<Vec<_>>())
            .finish()
    }
}
