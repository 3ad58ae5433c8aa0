//! Persistence: configuration plus the template store and staff directory
//! contracts with their in-memory and TOML-file implementations.

mod config;
mod files;
mod memory;

pub use config::{Config, ShiftsConfig, TeamConfig};
pub use files::{FileStaffDirectory, FileTemplateStore};
pub use memory::{MemoryStaffDirectory, MemoryTemplateStore};

use std::path::PathBuf;

use crate::coverage::StaffMember;
use crate::error::StoreError;
use crate::schedule::TemplateSet;

/// Persists day templates and the week assignment per team.
///
/// Both operations are all-or-nothing. Failures are reported to the caller
/// as a single error and never retried.
pub trait TemplateStore: Send + Sync {
    fn load_templates(&self, team_id: &str) -> Result<TemplateSet, StoreError>;

    /// Validate and store the full set, replacing what was there.
    fn save_templates(&self, team_id: &str, set: &TemplateSet) -> Result<(), StoreError>;
}

/// Read-only source of staff records.
pub trait StaffDirectory: Send + Sync {
    fn list_staff(&self, team_id: &str) -> Result<Vec<StaffMember>, StoreError>;
}

/// Returns `~/.config/rotaboard[-dev]/` based on ROTABOARD_ENV.
///
/// Set ROTABOARD_ENV=dev to use the development data directory, or
/// ROTABOARD_DATA_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("ROTABOARD_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ROTABOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rotaboard-dev")
            } else {
                base_dir.join("rotaboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
