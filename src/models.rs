//! Data models for vocabulary items and review bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-assessed recall quality for one review.
///
/// The discriminants are the SM-2 quality scores fed into the scheduler.
/// Anything outside these four values is not a valid rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    Forgot = 0, // No recall, relearn from scratch
    Hard = 3,   // Recalled with serious difficulty
    Good = 4,   // Recalled after hesitation
    Easy = 5,   // Perfect recall
}

impl QualityRating {
    /// All ratings, in ascending score order.
    pub const ALL: [Self; 4] = [Self::Forgot, Self::Hard, Self::Good, Self::Easy];

    /// SM-2 quality score (0, 3, 4 or 5).
    pub fn score(&self) -> u32 {
        *self as u32
    }

    /// A rating counts as a successful recall from score 3 upward.
    pub fn is_correct(&self) -> bool {
        self.score() >= 3
    }

    /// Parse a raw score. Returns `None` for anything outside the four
    /// defined variants; callers must treat that as a contract violation,
    /// not clamp it.
    pub fn from_score(score: u32) -> Option<Self> {
        match score {
            0 => Some(Self::Forgot),
            3 => Some(Self::Hard),
            4 => Some(Self::Good),
            5 => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Forgot),
            '2' => Some(Self::Hard),
            '3' => Some(Self::Good),
            '4' => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Forgot => "Forgot",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

/// A saved vocabulary word with its review schedule.
///
/// Display fields are read-only from the scheduler's perspective; the
/// scheduling fields (`ease_factor`, `interval`, `next_review_at`,
/// `review_count`, `is_mastered`) are mutated exclusively through the
/// review flow. `is_mastered` only ever transitions false→true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: String,
    pub word: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Sentence the word was saved from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Reference to the originating article, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_article: Option<String>,

    // SM-2 schedule
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review_at: DateTime<Utc>,
    pub review_count: u32,
    #[serde(default)]
    pub is_mastered: bool,

    pub created_at: DateTime<Utc>,
}

impl VocabularyItem {
    pub fn new(word: String, meaning: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            word,
            meaning,
            phonetic: None,
            context: None,
            source_article: None,
            ease_factor: 2.5,
            interval: 0,
            next_review_at: now,
            review_count: 0,
            is_mastered: false,
            created_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// Due for review: schedule has arrived and the word is not mastered.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_mastered && self.next_review_at <= now
    }
}

/// Running counts for one review session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
    pub reviewed: u32,
    pub correct: u32,
    pub incorrect: u32,
}

/// Aggregate counts over a vocabulary collection.
#[derive(Debug, Default)]
pub struct VocabStats {
    pub total_words: usize,
    pub new_words: usize,
    pub due_words: usize,
    pub mastered_words: usize,
}

impl VocabStats {
    pub fn collect(items: &[VocabularyItem], now: DateTime<Utc>) -> Self {
        let mut stats = VocabStats {
            total_words: items.len(),
            ..Default::default()
        };

        for item in items {
            if item.is_mastered {
                stats.mastered_words += 1;
                continue;
            }
            if item.is_new() {
                stats.new_words += 1;
            }
            if item.is_due(now) {
                stats.due_words += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_starts_unscheduled() {
        let item = VocabularyItem::new("ephemeral".into(), "lasting a very short time".into());
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.interval, 0);
        assert_eq!(item.review_count, 0);
        assert!(!item.is_mastered);
        assert!(item.is_due(Utc::now()));
    }

    #[test]
    fn mastered_item_is_never_due() {
        let mut item = VocabularyItem::new("word".into(), "meaning".into());
        item.is_mastered = true;
        assert!(!item.is_due(Utc::now() + chrono::Duration::days(365)));
    }

    #[test]
    fn from_score_rejects_undefined_scores() {
        assert_eq!(QualityRating::from_score(4), Some(QualityRating::Good));
        assert_eq!(QualityRating::from_score(1), None);
        assert_eq!(QualityRating::from_score(2), None);
        assert_eq!(QualityRating::from_score(6), None);
    }

    #[test]
    fn correctness_split() {
        assert!(!QualityRating::Forgot.is_correct());
        assert!(QualityRating::Hard.is_correct());
        assert!(QualityRating::Good.is_correct());
        assert!(QualityRating::Easy.is_correct());
    }

    #[test]
    fn stats_classify_items() {
        let fresh = VocabularyItem::new("a".into(), "a".into());
        let now = Utc::now();
        let mut scheduled = VocabularyItem::new("b".into(), "b".into());
        scheduled.review_count = 3;
        scheduled.next_review_at = now + chrono::Duration::days(4);
        let mut mastered = VocabularyItem::new("c".into(), "c".into());
        mastered.is_mastered = true;

        let stats = VocabStats::collect(&[fresh, scheduled, mastered], now);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.new_words, 1);
        assert_eq!(stats.due_words, 1);
        assert_eq!(stats.mastered_words, 1);
    }
}
