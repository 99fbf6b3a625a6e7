//! Card and session error types.
//!
//! Lookups on stale ids, registry/deck mismatches and protocol misuse all
//! surface as a [`CardError`]. Absence of due work is not an error: the
//! selection operations return `Option` instead.

use thiserror::Error;

/// Errors raised by the deck, the mode registry and the review session.
#[derive(Debug, Error)]
pub enum CardError {
    /// No root or mode card with this id exists in the deck.
    #[error("card not found: {id}")]
    NotFound { id: String },

    /// The root card has not been introduced into this mode.
    #[error("card {root} has no '{mode}' mode card")]
    ModeCardNotFound { root: String, mode: String },

    /// A mode card names a review mode that is not registered.
    #[error("unknown review mode: {0}")]
    UnknownMode(String),

    /// A mode card already exists for this (root, mode) pair.
    #[error("card {root} was already introduced into mode '{mode}'")]
    DuplicateModeCard { root: String, mode: String },

    /// A root card with this id is already in the deck.
    #[error("duplicate card id: {0}")]
    DuplicateCard(String),

    /// A review mode with this name is already registered.
    #[error("review mode already registered: {0}")]
    DuplicateMode(String),

    /// `respond` was called with no pending review, or `start` was called twice.
    #[error("review session is not awaiting a response")]
    SessionNotAwaiting,
}

impl CardError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        CardError::NotFound { id: id.into() }
    }

    /// Returns `true` if the error points at a mismatch between the deck
    /// contents and the mode registry rather than at a missing record.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CardError::UnknownMode(_) | CardError::DuplicateMode(_)
        )
    }
}

/// Convenience alias for results carrying a [`CardError`].
pub type Result<T> = std::result::Result<T, CardError>;
