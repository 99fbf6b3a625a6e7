//! Single reviews and their graded results.
//!
//! The scheduling policy lives in [`ReviewResult::next_delay`]: the interval
//! doubles on every correct answer and collapses after a wrong one. The
//! interval is measured from when the card was *due*, not from when it was
//! last seen, so answering a card late earns a longer next interval.

use chrono::{DateTime, Duration, Utc};

use crate::deck::CardDeck;
use crate::error::Result;
use crate::mode::ModeRegistry;
use crate::model::ModeCard;

/// Interval after a first correct answer, and after a failed answer on a
/// card that was already well spaced.
pub fn base_interval() -> Duration {
    Duration::minutes(1)
}

/// A question put to the learner.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Snapshot of the mode card under test, taken when the question was asked.
    pub card: ModeCard,
    /// Prompt rendered by the card's review mode.
    pub question: String,
    /// Answer of the root card.
    pub correct_response: String,
    /// When the question was presented.
    pub started_at: DateTime<Utc>,
}

impl Review {
    /// Prepare a review of `mode_card`, rendering its question.
    ///
    /// Fails with `UnknownMode` if the card's mode is not registered and
    /// with `NotFound` if its root card is missing from the deck.
    pub fn new(
        deck: &CardDeck,
        registry: &ModeRegistry,
        mode_card: &ModeCard,
        started_at: DateTime<Utc>,
    ) -> Result<Self> {
        let mode = registry.get(&mode_card.mode)?;
        let bound = deck.bind(mode_card)?;
        Ok(Self {
            card: mode_card.clone(),
            question: mode.question(&bound),
            correct_response: bound.correct_response().to_string(),
            started_at,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

/// The graded outcome of a [`Review`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub review: Review,
    /// What the learner typed.
    pub response: String,
    /// Time between presenting the question and receiving the response.
    pub duration: Duration,
    /// Score assigned by the card's review mode.
    pub mark: u32,
}

impl ReviewResult {
    /// Grade `response` with the review's mode.
    pub fn respond(
        review: Review,
        response: impl Into<String>,
        registry: &ModeRegistry,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let response = response.into();
        let mode = registry.get(&review.card.mode)?;
        let mark = mode.mark(&response, &review.correct_response);
        let duration = now - review.started_at;
        Ok(Self {
            review,
            response,
            duration,
            mark,
        })
    }

    /// Whether the response matched the correct answer exactly.
    ///
    /// Scheduling uses this rather than `mark`, so partial credit from a
    /// mode never counts as a success.
    pub fn is_correct(&self) -> bool {
        self.response == self.review.correct_response
    }

    /// How late the card was when it was asked; zero for unscheduled cards.
    pub fn previous_delay(&self) -> Duration {
        match self.review.card.due {
            Some(due) => self.review.started_at - due,
            None => Duration::zero(),
        }
    }

    /// Interval until the card is due again.
    pub fn next_delay(&self) -> Duration {
        let previous = self.previous_delay();
        if self.is_correct() {
            if previous <= Duration::zero() {
                base_interval()
            } else {
                previous * 2
            }
        } else if previous <= base_interval() {
            Duration::zero()
        } else {
            base_interval()
        }
    }

    /// New due date, anchored at the moment the question was asked.
    pub fn next_due(&self) -> DateTime<Utc> {
        self.review.started_at + self.next_delay()
    }
}
