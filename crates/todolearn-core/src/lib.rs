//! todolearn-core: review scheduling and session engine.
//!
//! This crate defines the card model, the review mode registry, the deck
//! with its due-card selection and new-card introduction, the delay
//! algorithm, and the resumable review session that drives it all. Storage
//! and import adapters live alongside for use by the CLI.

pub mod config;
pub mod deck;
pub mod error;
pub mod import;
pub mod mode;
pub mod model;
pub mod review;
pub mod session;
pub mod store;
pub mod validate;

pub use deck::CardDeck;
pub use error::CardError;
pub use mode::{FullAnswerMode, ModeRegistry, ReviewMode, FULL_ANSWER};
pub use model::{BoundCard, ModeCard, RootCard};
pub use review::{Review, ReviewResult};
pub use session::{Reply, ReviewSession, SessionStep};
pub use store::{DeckStore, JsonFileStore};
