//! The review session coordinator.
//!
//! A session is a resumable sequence driven by the caller: each call hands
//! back the next question (and the graded result of the previous answer)
//! and then waits for the caller to respond. The session owns no I/O, so
//! the same protocol serves the interactive CLI and scripted tests.
//!
//! Each selection step prefers a card that is already due. When none is,
//! up to one batch of unlearned cards is introduced into every active mode,
//! and then the earliest-due card is taken even if it is not due yet. A
//! session only finishes once the deck has no card in any active mode.
//!
//! Mode cards whose root card is missing are passed over with a warning for
//! the rest of the session, so stale records never abort a review.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::deck::CardDeck;
use crate::error::{CardError, Result};
use crate::mode::ModeRegistry;
use crate::model::ModeCard;
use crate::review::{Review, ReviewResult};

/// How many unlearned cards are introduced when nothing is due.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// The caller's answer to a pending question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    /// End the session without grading the pending question.
    Stop,
}

impl Reply {
    /// Interpret a raw line of input, treating `quit` as the stop sentinel.
    pub fn from_input(input: &str, quit: &str) -> Self {
        if input == quit {
            Reply::Stop
        } else {
            Reply::Answer(input.to_string())
        }
    }
}

/// What the session yields after each call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    /// A question awaits a response.
    Question {
        previous: Option<ReviewResult>,
        review: Review,
    },
    /// The session is over.
    Finished { previous: Option<ReviewResult> },
}

impl SessionStep {
    pub fn previous(&self) -> Option<&ReviewResult> {
        match self {
            SessionStep::Question { previous, .. } | SessionStep::Finished { previous } => {
                previous.as_ref()
            }
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            SessionStep::Question { review, .. } => Some(review),
            SessionStep::Finished { .. } => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStep::Finished { .. })
    }
}

#[derive(Debug)]
enum SessionState {
    NotStarted,
    AwaitingResponse(Review),
    Done,
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub reviewed: usize,
    pub correct: usize,
    pub introduced: usize,
}

/// A review session over one deck.
///
/// The session holds the deck mutably for its whole lifetime, so only one
/// session can be active per deck.
#[derive(Debug)]
pub struct ReviewSession<'a> {
    deck: &'a mut CardDeck,
    registry: &'a ModeRegistry,
    modes: Vec<String>,
    batch_size: usize,
    state: SessionState,
    stats: SessionStats,
    /// Mode cards that cannot be reviewed because their root card is gone.
    skipped: HashSet<String>,
}

impl<'a> ReviewSession<'a> {
    /// Create a session over `modes`, or over every registered mode when
    /// `modes` is empty. Fails with `UnknownMode` for unregistered names.
    pub fn new(
        deck: &'a mut CardDeck,
        registry: &'a ModeRegistry,
        modes: &[String],
    ) -> Result<Self> {
        let modes = registry.resolve_active(modes)?;
        Ok(Self {
            deck,
            registry,
            modes,
            batch_size: DEFAULT_BATCH_SIZE,
            state: SessionState::NotStarted,
            stats: SessionStats::default(),
            skipped: HashSet::new(),
        })
    }

    /// Set how many unlearned cards are introduced per batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Active review modes.
    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The question currently awaiting a response.
    pub fn current(&self) -> Option<&Review> {
        match &self.state {
            SessionState::AwaitingResponse(review) => Some(review),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, SessionState::Done)
    }

    /// Read access to the deck while the session is running.
    pub fn deck(&self) -> &CardDeck {
        &*self.deck
    }

    pub fn start(&mut self) -> Result<SessionStep> {
        self.start_at(Utc::now())
    }

    /// Select the first question.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<SessionStep> {
        if !matches!(self.state, SessionState::NotStarted) {
            return Err(CardError::SessionNotAwaiting);
        }
        self.advance(now, None)
    }

    pub fn respond(&mut self, reply: Reply) -> Result<SessionStep> {
        self.respond_at(reply, Utc::now())
    }

    /// Answer the pending question and select the next one.
    pub fn respond_at(&mut self, reply: Reply, now: DateTime<Utc>) -> Result<SessionStep> {
        let review = match std::mem::replace(&mut self.state, SessionState::Done) {
            SessionState::AwaitingResponse(review) => review,
            SessionState::Done => return Ok(SessionStep::Finished { previous: None }),
            SessionState::NotStarted => {
                self.state = SessionState::NotStarted;
                return Err(CardError::SessionNotAwaiting);
            }
        };

        let response = match reply {
            Reply::Answer(response) => response,
            Reply::Stop => {
                self.finish();
                return Ok(SessionStep::Finished { previous: None });
            }
        };

        let result = ReviewResult::respond(review, response, self.registry, now)?;
        self.deck.record_review(&result)?;
        self.stats.reviewed += 1;
        if result.is_correct() {
            self.stats.correct += 1;
        }

        self.advance(now, Some(result))
    }

    /// Run one selection step at `now`.
    fn advance(
        &mut self,
        now: DateTime<Utc>,
        previous: Option<ReviewResult>,
    ) -> Result<SessionStep> {
        let mut introduced = false;
        loop {
            let mut selected = self.next_due(Some(now));
            if selected.is_none() {
                if !introduced {
                    self.introduce_batch(now)?;
                    introduced = true;
                }
                selected = self.next_due(None);
            }

            let Some(mode_card) = selected else {
                self.finish();
                return Ok(SessionStep::Finished { previous });
            };

            match Review::new(self.deck, self.registry, &mode_card, now) {
                Ok(review) => {
                    self.state = SessionState::AwaitingResponse(review.clone());
                    return Ok(SessionStep::Question { previous, review });
                }
                Err(CardError::NotFound { id }) => {
                    tracing::warn!(
                        mode_card = %mode_card.id,
                        missing = %id,
                        "skipping mode card of a missing card, run `todolearn validate`"
                    );
                    self.skipped.insert(mode_card.id);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn next_due(&self, due_by: Option<DateTime<Utc>>) -> Option<ModeCard> {
        self.deck
            .next_due_card_where(&self.modes, due_by, |m| !self.skipped.contains(&m.id))
            .cloned()
    }

    /// Introduce the next batch of unlearned cards into every active mode,
    /// due at `now`.
    fn introduce_batch(&mut self, now: DateTime<Utc>) -> Result<()> {
        let mut seen = HashSet::new();
        let batch: Vec<String> = self
            .deck
            .select_unlearned_cards(&self.modes, Some(self.batch_size))
            .filter(|&card| {
                let first = seen.insert(card.id.as_str());
                if !first {
                    tracing::warn!(
                        id = %card.id,
                        "duplicate card id, introducing only the first, run `todolearn validate`"
                    );
                }
                first
            })
            .map(|card| card.id.clone())
            .collect();
        if batch.is_empty() {
            return Ok(());
        }

        for root_id in &batch {
            for mode in &self.modes {
                self.deck.introduce_mode(root_id, mode, now)?;
            }
        }
        self.stats.introduced += batch.len();
        tracing::info!(count = batch.len(), modes = ?self.modes, "introduced new cards");
        Ok(())
    }

    fn finish(&mut self) {
        self.state = SessionState::Done;
        tracing::info!(
            reviewed = self.stats.reviewed,
            correct = self.stats.correct,
            introduced = self.stats.introduced,
            "review session finished"
        );
    }
}
