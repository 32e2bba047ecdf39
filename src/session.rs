//! Review session state machine.
//!
//! A session owns a frozen snapshot of the due set for one review pass and
//! walks it card by card: show the front, flip, rate, advance. Rating a card
//! computes the next schedule, commits it through the store, and only then
//! touches the session's own state, so a failed commit leaves the card
//! current and retryable.

use log::{debug, info};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::models::{QualityRating, ReviewStats, VocabularyItem};
use crate::sm2::{self, NextSchedule};
use crate::store::{StoreError, VocabStore};

#[derive(Error, Debug)]
pub enum SessionError {
    /// A schedule commit failed. Recoverable: no transition happened and the
    /// same rating can be retried.
    #[error("failed to commit review: {0}")]
    Store(#[from] StoreError),

    #[error("card is still face up; flip it before rating")]
    NotFlipped,

    #[error("no cards are due for review")]
    Empty,

    #[error("session is already completed")]
    Completed,
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The due set was empty at start. Terminal.
    Empty,
    /// Front of the card at `index` is showing.
    Showing { index: usize },
    /// Back of the card at `index` is showing; rating is allowed.
    Flipped { index: usize },
    /// The last card has been rated. Terminal.
    Completed,
}

/// What one accepted rating did to the current card.
#[derive(Debug, Clone, Copy)]
pub struct ReviewOutcome {
    pub schedule: NextSchedule,
    pub mastered: bool,
}

/// One review pass over the due set.
///
/// Generic over the store and the clock so the whole machine runs against
/// [`MemoryVocabStore`](crate::store::MemoryVocabStore) and
/// [`FixedClock`](crate::clock::FixedClock) in tests.
pub struct ReviewSession<S, C = SystemClock> {
    store: S,
    clock: C,
    /// Due-set snapshot, frozen for the lifetime of the session. Membership
    /// and order never change, even if the store does.
    items: Vec<VocabularyItem>,
    state: SessionState,
    stats: ReviewStats,
}

impl<S: VocabStore> ReviewSession<S> {
    /// Start a session over the items due right now.
    pub fn start(store: S) -> Result<Self, SessionError> {
        Self::start_with_clock(store, SystemClock)
    }
}

impl<S: VocabStore, C: Clock> ReviewSession<S, C> {
    pub fn start_with_clock(store: S, clock: C) -> Result<Self, SessionError> {
        let items = store.fetch_due_items(clock.now())?;
        let state = if items.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Showing { index: 0 }
        };
        info!("review session started with {} due items", items.len());

        Ok(Self {
            store,
            clock,
            items,
            state,
            stats: ReviewStats::default(),
        })
    }

    // ─── Projection ─────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The card currently under review, if the session is active.
    pub fn current_card(&self) -> Option<&VocabularyItem> {
        match self.state {
            SessionState::Showing { index } | SessionState::Flipped { index } => {
                self.items.get(index)
            }
            SessionState::Empty | SessionState::Completed => None,
        }
    }

    pub fn is_flipped(&self) -> bool {
        matches!(self.state, SessionState::Flipped { .. })
    }

    /// True in either terminal state: every due card rated, or nothing was
    /// due to begin with.
    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn stats(&self) -> ReviewStats {
        self.stats
    }

    /// (cards rated so far, cards in the pass).
    pub fn progress(&self) -> (usize, usize) {
        (self.stats.reviewed as usize, self.items.len())
    }

    /// The frozen due-set snapshot this pass walks.
    pub fn cards(&self) -> &[VocabularyItem] {
        &self.items
    }

    /// Would-be interval per rating for the current card, for labelling
    /// rating controls.
    pub fn interval_preview(&self) -> Option<[(QualityRating, u32); 4]> {
        self.current_card()
            .map(|item| sm2::preview_intervals(item.ease_factor, item.interval, self.clock.now()))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear the session down and hand the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    // ─── Transitions ────────────────────────────────────────────────────

    /// Toggle between the front and back of the current card.
    pub fn flip(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Showing { index } => {
                self.state = SessionState::Flipped { index };
                Ok(())
            }
            SessionState::Flipped { index } => {
                self.state = SessionState::Showing { index };
                Ok(())
            }
            SessionState::Empty => Err(SessionError::Empty),
            SessionState::Completed => Err(SessionError::Completed),
        }
    }

    /// Rate the current card. Valid only once the card is flipped.
    ///
    /// Computes the next schedule, commits it (plus the mastery promotion
    /// when one fires), updates the session stats, and advances — moving to
    /// [`SessionState::Completed`] after the last card. On a commit failure
    /// nothing changes: same card, still flipped, stats untouched.
    pub fn rate(&mut self, quality: QualityRating) -> Result<ReviewOutcome, SessionError> {
        let index = match self.state {
            SessionState::Flipped { index } => index,
            SessionState::Showing { .. } => return Err(SessionError::NotFlipped),
            SessionState::Empty => return Err(SessionError::Empty),
            SessionState::Completed => return Err(SessionError::Completed),
        };

        let item = &self.items[index];
        let schedule =
            sm2::compute_next_schedule(item.ease_factor, item.interval, quality, self.clock.now());
        let mastered = sm2::reaches_mastery(quality, schedule.interval);

        // Commit first. A retried rate recommits the same schedule values
        // before reattempting the mastery write, so the pair is idempotent.
        self.store.update_schedule(&item.id, &schedule)?;
        if mastered {
            self.store.set_mastered(&item.id)?;
        }

        let item = &mut self.items[index];
        item.ease_factor = schedule.ease_factor;
        item.interval = schedule.interval;
        item.next_review_at = schedule.next_review_at;
        item.review_count += 1;
        if mastered {
            item.is_mastered = true;
        }
        debug!(
            "rated '{}' as {}: next review in {} days",
            item.word,
            quality.name(),
            schedule.interval
        );

        self.stats.reviewed += 1;
        if quality.is_correct() {
            self.stats.correct += 1;
        } else {
            self.stats.incorrect += 1;
        }

        self.state = if index + 1 >= self.items.len() {
            SessionState::Completed
        } else {
            SessionState::Showing { index: index + 1 }
        };

        Ok(ReviewOutcome { schedule, mastered })
    }

    /// Reveal-then-rate shortcut: forces the flip first, then rates.
    pub fn reveal_and_rate(&mut self, quality: QualityRating) -> Result<ReviewOutcome, SessionError> {
        if let SessionState::Showing { index } = self.state {
            self.state = SessionState::Flipped { index };
        }
        self.rate(quality)
    }

    /// Replay the same frozen due set from the top, zeroing the stats.
    ///
    /// This is a session-local restart, not a due-set refresh: the store is
    /// not re-queried, and the snapshot keeps the schedule fields already
    /// committed during the pass.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Empty => Err(SessionError::Empty),
            _ => {
                self.state = SessionState::Showing { index: 0 };
                self.stats = ReviewStats::default();
                Ok(())
            }
        }
    }
}
