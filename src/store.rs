//! Vocabulary store boundary and the bundled reference stores.
//!
//! The review session only ever talks to [`VocabStore`]: a due-set query and
//! two per-item commit operations. [`JsonVocabStore`] persists the collection
//! as a single JSON document; [`MemoryVocabStore`] keeps it in process for
//! tests and embedding.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;

use crate::models::{VocabStats, VocabularyItem};
use crate::sm2::NextSchedule;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vocabulary item not found: {0}")]
    ItemNotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence boundary for vocabulary items.
///
/// The session assumes single-writer access: one active review session per
/// item collection, with each commit settled before the session advances.
pub trait VocabStore {
    /// Items with `next_review_at <= now` that are not mastered, in store
    /// iteration order. The caller treats the result as a frozen snapshot.
    fn fetch_due_items(&self, now: DateTime<Utc>) -> Result<Vec<VocabularyItem>>;

    /// Commit one review: the three schedule fields, plus the item's review
    /// counter advancing by one. Called exactly once per rated card.
    fn update_schedule(&mut self, id: &str, schedule: &NextSchedule) -> Result<()>;

    /// Promote an item to mastered. Mastery is one-directional; there is no
    /// demotion operation.
    fn set_mastered(&mut self, id: &str) -> Result<()>;
}

/// A session can borrow a store the embedding application keeps owning.
impl<S: VocabStore + ?Sized> VocabStore for &mut S {
    fn fetch_due_items(&self, now: DateTime<Utc>) -> Result<Vec<VocabularyItem>> {
        (**self).fetch_due_items(now)
    }

    fn update_schedule(&mut self, id: &str, schedule: &NextSchedule) -> Result<()> {
        (**self).update_schedule(id, schedule)
    }

    fn set_mastered(&mut self, id: &str) -> Result<()> {
        (**self).set_mastered(id)
    }
}

fn find_item<'a>(items: &'a mut [VocabularyItem], id: &str) -> Result<&'a mut VocabularyItem> {
    items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| StoreError::ItemNotFound(id.to_string()))
}

fn due_snapshot(items: &[VocabularyItem], now: DateTime<Utc>) -> Vec<VocabularyItem> {
    items.iter().filter(|i| i.is_due(now)).cloned().collect()
}

fn apply_schedule(items: &mut [VocabularyItem], id: &str, schedule: &NextSchedule) -> Result<()> {
    let item = find_item(items, id)?;
    item.ease_factor = schedule.ease_factor;
    item.interval = schedule.interval;
    item.next_review_at = schedule.next_review_at;
    item.review_count += 1;
    Ok(())
}

/// In-process store. No durability; handy for tests and as the working set
/// of an embedding application that persists elsewhere.
#[derive(Debug, Default)]
pub struct MemoryVocabStore {
    items: Vec<VocabularyItem>,
}

impl MemoryVocabStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: VocabularyItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&VocabularyItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> VocabStats {
        VocabStats::collect(&self.items, now)
    }
}

impl VocabStore for MemoryVocabStore {
    fn fetch_due_items(&self, now: DateTime<Utc>) -> Result<Vec<VocabularyItem>> {
        Ok(due_snapshot(&self.items, now))
    }

    fn update_schedule(&mut self, id: &str, schedule: &NextSchedule) -> Result<()> {
        apply_schedule(&mut self.items, id, schedule)
    }

    fn set_mastered(&mut self, id: &str) -> Result<()> {
        find_item(&mut self.items, id)?.is_mastered = true;
        Ok(())
    }
}

/// File-backed store: the whole collection as one pretty-printed JSON
/// document, rewritten on every commit.
pub struct JsonVocabStore {
    path: PathBuf,
    items: Vec<VocabularyItem>,
}

impl JsonVocabStore {
    /// Open the store at `path`, creating an empty collection if the file
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            Vec::new()
        };
        debug!("opened vocabulary store at {:?} ({} items)", path, items.len());
        Ok(Self { path, items })
    }

    /// Default storage location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocab-srs")
            .join("vocabulary.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&VocabularyItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> VocabStats {
        VocabStats::collect(&self.items, now)
    }

    /// Add a freshly saved word and persist the collection.
    pub fn add_item(&mut self, item: VocabularyItem) -> Result<()> {
        self.items.push(item);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl VocabStore for JsonVocabStore {
    fn fetch_due_items(&self, now: DateTime<Utc>) -> Result<Vec<VocabularyItem>> {
        Ok(due_snapshot(&self.items, now))
    }

    fn update_schedule(&mut self, id: &str, schedule: &NextSchedule) -> Result<()> {
        apply_schedule(&mut self.items, id, schedule)?;
        self.save()
    }

    fn set_mastered(&mut self, id: &str) -> Result<()> {
        find_item(&mut self.items, id)?.is_mastered = true;
        self.save()
    }
}
