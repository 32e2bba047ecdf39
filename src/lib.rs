//! Spaced-repetition review core for vocabulary learning.
//!
//! This crate is the scheduling heart of a vocabulary app:
//! - SM-2 schedule arithmetic ([`sm2`]) — pure, deterministic, unit-testable
//! - the review-session state machine ([`session`]) that walks the due set
//!   card by card and commits each rating exactly once
//! - the store boundary ([`store`]) those commits go through, with a
//!   file-backed and an in-memory implementation
//!
//! A frontend drives a [`ReviewSession`] and renders its read-only
//! projection (current card, flip flag, stats, completion); it never touches
//! schedule state directly.

pub mod clock;
pub mod config;
pub mod models;
pub mod session;
pub mod sm2;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use models::{QualityRating, ReviewStats, VocabStats, VocabularyItem};
pub use session::{ReviewOutcome, ReviewSession, SessionError, SessionState};
pub use sm2::{compute_next_schedule, NextSchedule, MASTERY_INTERVAL, MIN_EASE_FACTOR};
pub use store::{JsonVocabStore, MemoryVocabStore, StoreError, VocabStore};
