//! In-memory stores for tests and embedding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StaffDirectory, TemplateStore};
use crate::coverage::StaffMember;
use crate::error::StoreError;
use crate::schedule::TemplateSet;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Template store backed by a map of team id to template set.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    teams: Mutex<HashMap<String, TemplateSet>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load_templates(&self, team_id: &str) -> Result<TemplateSet, StoreError> {
        lock(&self.teams)
            .get(team_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                team: team_id.to_string(),
            })
    }

    fn save_templates(&self, team_id: &str, set: &TemplateSet) -> Result<(), StoreError> {
        set.validate()?;
        lock(&self.teams).insert(team_id.to_string(), set.clone());
        Ok(())
    }
}

/// Staff directory backed by a map of team id to roster.
#[derive(Debug, Default)]
pub struct MemoryStaffDirectory {
    teams: Mutex<HashMap<String, Vec<StaffMember>>>,
}

impl MemoryStaffDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a team's roster.
    pub fn insert(&self, team_id: &str, staff: Vec<StaffMember>) {
        lock(&self.teams).insert(team_id.to_string(), staff);
    }
}

impl StaffDirectory for MemoryStaffDirectory {
    fn list_staff(&self, team_id: &str) -> Result<Vec<StaffMember>, StoreError> {
        Ok(lock(&self.teams).get(team_id).cloned().unwrap_or_default())
    }
}
