//! TOML-file stores under the data directory.
//!
//! Layout: `<root>/teams/<team>/templates.toml` and
//! `<root>/teams/<team>/staff.toml`. Writes go to a temporary file that is
//! renamed over the target, so readers never see a half-written file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{data_dir, StaffDirectory, TemplateStore};
use crate::coverage::StaffMember;
use crate::error::StoreError;
use crate::schedule::TemplateSet;

/// Wrapper for serializing a roster to TOML
#[derive(Serialize, Deserialize)]
struct StaffFile {
    #[serde(default)]
    staff: Vec<StaffMember>,
}

fn team_dir(root: &Path, team_id: &str) -> Result<PathBuf, StoreError> {
    let valid = !team_id.is_empty()
        && team_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(StoreError::DataDir(format!("invalid team id '{team_id}'")));
    }
    Ok(root.join("teams").join(team_id))
}

fn write_atomically(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Template store keeping one TOML file per team.
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    root: PathBuf,
}

impl FileTemplateStore {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self, StoreError> {
        let root = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Ok(Self { root })
    }

    /// Create a store rooted at a custom directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, team_id: &str) -> Result<PathBuf, StoreError> {
        Ok(team_dir(&self.root, team_id)?.join("templates.toml"))
    }
}

impl TemplateStore for FileTemplateStore {
    fn load_templates(&self, team_id: &str) -> Result<TemplateSet, StoreError> {
        let path = self.path(team_id)?;
        if !path.exists() {
            return Err(StoreError::NotFound {
                team: team_id.to_string(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let set: TemplateSet = toml::from_str(&content)?;
        tracing::info!(team = team_id, templates = set.templates.len(), "loaded templates");
        Ok(set)
    }

    fn save_templates(&self, team_id: &str, set: &TemplateSet) -> Result<(), StoreError> {
        set.validate()?;
        let path = self.path(team_id)?;
        let content = toml::to_string_pretty(set)?;
        write_atomically(&path, &content)?;
        tracing::info!(team = team_id, path = %path.display(), "saved templates");
        Ok(())
    }
}

/// Staff directory keeping one TOML roster per team.
#[derive(Debug, Clone)]
pub struct FileStaffDirectory {
    root: PathBuf,
}

impl FileStaffDirectory {
    /// Open the directory in the default data directory.
    pub fn open() -> Result<Self, StoreError> {
        let root = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Ok(Self { root })
    }

    /// Create a directory rooted at a custom path.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, team_id: &str) -> Result<PathBuf, StoreError> {
        Ok(team_dir(&self.root, team_id)?.join("staff.toml"))
    }

    /// Replace a team's roster. Every record is validated first.
    pub fn save_staff(&self, team_id: &str, staff: &[StaffMember]) -> Result<(), StoreError> {
        for member in staff {
            member.validate()?;
        }
        let file = StaffFile {
            staff: staff.to_vec(),
        };
        let path = self.path(team_id)?;
        write_atomically(&path, &toml::to_string_pretty(&file)?)?;
        tracing::info!(team = team_id, staff = staff.len(), "saved staff roster");
        Ok(())
    }
}

impl StaffDirectory for FileStaffDirectory {
    fn list_staff(&self, team_id: &str) -> Result<Vec<StaffMember>, StoreError> {
        let path = self.path(team_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        let file: StaffFile = toml::from_str(&content)?;
        Ok(file.staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DayTemplate, ShiftBlock, TimeWindow};
    use chrono::Weekday;

    #[test]
    fn templates_roundtrip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::with_root(dir.path());

        let mut set = TemplateSet::new(TimeWindow::new(9.0, 17.0, 30, 15));
        let mut weekend = DayTemplate::new("Weekend");
        weekend.blocks.push(ShiftBlock::with_id("w1", 10.0, 6.0, 2));
        weekend.window = Some(TimeWindow::new(10.0, 16.0, 0, 0));
        set.add_template(weekend).unwrap();
        set.week.set(Weekday::Sun, false, "Weekend");

        store.save_templates("north", &set).unwrap();
        assert_eq!(store.load_templates("north").unwrap(), set);
        assert!(!dir.path().join("teams/north/templates.toml.tmp").exists());
    }

    #[test]
    fn missing_team_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::with_root(dir.path());
        assert!(matches!(
            store.load_templates("north"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn rejects_path_like_team_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::with_root(dir.path());
        let set = TemplateSet::new(TimeWindow::default());
        assert!(matches!(
            store.save_templates("../escape", &set),
            Err(StoreError::DataDir(_))
        ));
    }

    #[test]
    fn staff_roundtrip_with_availability() {
        let dir = tempfile::tempdir().unwrap();
        let directory = FileStaffDirectory::with_root(dir.path());
        assert!(directory.list_staff("north").unwrap().is_empty());

        let mut sam = StaffMember::new("s1", "Sam")
            .with_preferred_lengths([8.0])
            .with_keyholder(true)
            .with_hours(30.0, 40.0);
        sam.availability.set_slot(Weekday::Mon, 0, false);
        sam.availability.set_block(Weekday::Tue, "w1".into(), true);

        directory.save_staff("north", &[sam.clone()]).unwrap();
        assert_eq!(directory.list_staff("north").unwrap(), vec![sam]);
    }

    #[test]
    fn reads_hand_written_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams/north/staff.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            indoc::indoc! {r#"
                [[staff]]
                id = "s1"
                name = "Sam"
                preferred_lengths = [8]
                keyholder = true
                contracted_hours = 30

                [[staff.availability]]
                weekday = "Mon"
                slot = 0
                available = false
            "#},
        )
        .unwrap();

        let staff = FileStaffDirectory::with_root(dir.path())
            .list_staff("north")
            .unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].preferred_lengths, vec![8.0]);
        assert_eq!(staff[0].max_hours, 0.0);
        assert!(!staff[0].availability.is_available(Weekday::Mon, 0, &"x".into()));
    }

    #[test]
    fn invalid_staff_hours_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let directory = FileStaffDirectory::with_root(dir.path());
        let bad = StaffMember::new("s1", "Sam").with_hours(40.0, 20.0);
        assert!(matches!(
            directory.save_staff("north", &[bad]),
            Err(StoreError::Invalid(_))
        ));
    }
}
