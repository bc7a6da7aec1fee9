//! Record store for PRDs and their epics.
//!
//! Handlers talk to a [`PrdRepository`]; the server wires in [`MemoryStore`].
//! Every read-modify-write sequence is a single repository call so an
//! implementation can make it atomic.

pub mod memory;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Epic, PrdContent, PrdRecord, PrdStatus, UserStory};

pub use memory::MemoryStore;

/// Fields for a newly generated PRD.
#[derive(Debug, Clone)]
pub struct NewPrd {
    pub title: String,
    pub content: PrdContent,
    pub status: PrdStatus,
    pub original_file_name: Option<String>,
    pub processing_time_ms: Option<u64>,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PrdUpdate {
    pub title: Option<String>,
    pub content: Option<PrdContent>,
    pub status: Option<PrdStatus>,
}

impl PrdUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.status.is_none()
    }
}

/// An epic together with the id of the PRD that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct EpicLocation {
    pub prd_id: i64,
    pub epic: Epic,
}

#[async_trait]
pub trait PrdRepository: Send + Sync {
    /// All PRDs, newest first.
    async fn list_prds(&self) -> AppResult<Vec<PrdRecord>>;

    async fn get_prd(&self, id: i64) -> AppResult<Option<PrdRecord>>;

    async fn create_prd(&self, prd: NewPrd) -> AppResult<PrdRecord>;

    /// Returns `None` when the PRD does not exist.
    async fn update_prd(&self, id: i64, update: PrdUpdate) -> AppResult<Option<PrdRecord>>;

    /// Deletes the PRD and its epics. Returns `false` when it did not exist.
    async fn delete_prd(&self, id: i64) -> AppResult<bool>;

    /// Swap in a new epic batch if the PRD is still at `expected_revision`.
    ///
    /// Fails with `NotFound` if the PRD is gone and `Conflict` if it changed;
    /// the previous batch is untouched in both cases.
    async fn replace_epics(
        &self,
        prd_id: i64,
        expected_revision: u64,
        epics: Vec<Epic>,
        processing_time_ms: u64,
    ) -> AppResult<PrdRecord>;

    async fn find_epic(&self, epic_id: &str) -> AppResult<Option<EpicLocation>>;

    /// Append one story to the epic. Returns the updated epic, or `None` if
    /// the epic no longer exists.
    async fn append_story(&self, epic_id: &str, story: UserStory)
    -> AppResult<Option<EpicLocation>>;

    /// Remove one epic from its PRD. Returns `false` when it did not exist.
    async fn delete_epic(&self, epic_id: &str) -> AppResult<bool>;
}
