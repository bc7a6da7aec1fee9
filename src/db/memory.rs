//! In-process record store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{EpicLocation, NewPrd, PrdRepository, PrdUpdate};
use crate::error::{AppError, AppResult};
use crate::models::{Epic, PrdRecord, UserStory};

#[derive(Debug)]
struct StoreState {
    next_id: i64,
    prds: BTreeMap<i64, PrdRecord>,
    /// epic id -> owning PRD id
    epic_index: HashMap<String, i64>,
}

/// Lock-guarded map of PRD records. Contents are lost on restart.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_id: 1,
                prds: BTreeMap::new(),
                epic_index: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| AppError::Internal("Record store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| AppError::Internal("Record store lock poisoned".to_string()))
    }
}

fn touch(record: &mut PrdRecord) {
    record.revision += 1;
    record.updated_at = Utc::now();
}

#[async_trait]
impl PrdRepository for MemoryStore {
    async fn list_prds(&self) -> AppResult<Vec<PrdRecord>> {
        let state = self.read()?;
        Ok(state.prds.values().rev().cloned().collect())
    }

    async fn get_prd(&self, id: i64) -> AppResult<Option<PrdRecord>> {
        let state = self.read()?;
        Ok(state.prds.get(&id).cloned())
    }

    async fn create_prd(&self, prd: NewPrd) -> AppResult<PrdRecord> {
        let mut state = self.write()?;
        let id = state.next_id;
        state.next_id += 1;

        let now = Utc::now();
        let record = PrdRecord {
            id,
            title: prd.title,
            content: prd.content,
            status: prd.status,
            original_file_name: prd.original_file_name,
            processing_time_ms: prd.processing_time_ms,
            created_at: now,
            updated_at: now,
            revision: 1,
            epics: Vec::new(),
            epics_generated_at: None,
            epics_processing_time_ms: None,
        };
        state.prds.insert(id, record.clone());
        debug!("Stored PRD {}", id);
        Ok(record)
    }

    async fn update_prd(&self, id: i64, update: PrdUpdate) -> AppResult<Option<PrdRecord>> {
        let mut state = self.write()?;
        let Some(record) = state.prds.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            record.title = title;
        }
        if let Some(content) = update.content {
            record.content = content;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        touch(record);
        Ok(Some(record.clone()))
    }

    async fn delete_prd(&self, id: i64) -> AppResult<bool> {
        let mut state = self.write()?;
        let Some(record) = state.prds.remove(&id) else {
            return Ok(false);
        };
        for epic in &record.epics {
            state.epic_index.remove(&epic.id);
        }
        debug!("Deleted PRD {} with {} epics", id, record.epics.len());
        Ok(true)
    }

    async fn replace_epics(
        &self,
        prd_id: i64,
        expected_revision: u64,
        epics: Vec<Epic>,
        processing_time_ms: u64,
    ) -> AppResult<PrdRecord> {
        let mut state = self.write()?;
        let StoreState {
            prds, epic_index, ..
        } = &mut *state;

        let record = prds
            .get_mut(&prd_id)
            .ok_or_else(|| AppError::NotFound(format!("PRD {}", prd_id)))?;

        if record.revision != expected_revision {
            return Err(AppError::Conflict(format!(
                "PRD {} was modified while epics were being generated; retry the request",
                prd_id
            )));
        }

        for old in &record.epics {
            epic_index.remove(&old.id);
        }
        for epic in &epics {
            epic_index.insert(epic.id.clone(), prd_id);
        }

        record.epics = epics;
        record.epics_generated_at = Some(Utc::now());
        record.epics_processing_time_ms = Some(processing_time_ms);
        touch(record);
        Ok(record.clone())
    }

    async fn find_epic(&self, epic_id: &str) -> AppResult<Option<EpicLocation>> {
        let state = self.read()?;
        let Some(&prd_id) = state.epic_index.get(epic_id) else {
            return Ok(None);
        };
        let epic = state
            .prds
            .get(&prd_id)
            .and_then(|prd| prd.epics.iter().find(|e| e.id == epic_id))
            .cloned();
        Ok(epic.map(|epic| EpicLocation { prd_id, epic }))
    }

    async fn append_story(
        &self,
        epic_id: &str,
        story: UserStory,
    ) -> AppResult<Option<EpicLocation>> {
        let mut state = self.write()?;
        let Some(&prd_id) = state.epic_index.get(epic_id) else {
            return Ok(None);
        };
        let Some(record) = state.prds.get_mut(&prd_id) else {
            return Ok(None);
        };
        let Some(index) = record.epics.iter().position(|e| e.id == epic_id) else {
            return Ok(None);
        };

        record.epics[index].user_stories.push(story);
        touch(record);
        Ok(Some(EpicLocation {
            prd_id,
            epic: record.epics[index].clone(),
        }))
    }

    async fn delete_epic(&self, epic_id: &str) -> AppResult<bool> {
        let mut state = self.write()?;
        let Some(prd_id) = state.epic_index.remove(epic_id) else {
            return Ok(false);
        };
        let Some(record) = state.prds.get_mut(&prd_id) else {
            return Ok(false);
        };
        let before = record.epics.len();
        record.epics.retain(|e| e.id != epic_id);
        if record.epics.len() == before {
            return Ok(false);
        }
        touch(record);
        Ok(true)
    }
}
