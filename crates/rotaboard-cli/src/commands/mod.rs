//! Subcommand implementations.

pub mod block;
pub mod config;
pub mod coverage;
pub mod staff;
pub mod template;
pub mod week;

use std::error::Error;

use rotaboard_core::error::Result as CoreResult;
use rotaboard_core::{
    Config, CoverageAnalyzer, FileStaffDirectory, FileTemplateStore, StaffDirectory,
    StaffMember, StoreError, TemplateSet, TemplateStore,
};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Loaded configuration plus the stores for the selected team.
pub struct Context {
    pub config: Config,
    pub team: String,
    templates: FileTemplateStore,
    staff: FileStaffDirectory,
}

impl Context {
    /// Load the config and open the stores. `team` overrides `team.id`.
    pub fn load(team: Option<String>) -> CoreResult<Self> {
        let config = Config::load()?;
        let team = team.unwrap_or_else(|| config.team.id.clone());
        tracing::debug!(team = %team, "opening stores");
        Ok(Self {
            templates: FileTemplateStore::open()?,
            staff: FileStaffDirectory::open()?,
            config,
            team,
        })
    }

    /// The team's template set, or a fresh one when nothing is saved yet.
    ///
    /// Opening hours always come from the config; blocks of templates
    /// without their own window are pulled inside the configured hours.
    pub fn template_set(&self) -> Result<TemplateSet, StoreError> {
        let window = self.config.business_window();
        let mut set = match self.templates.load_templates(&self.team) {
            Err(StoreError::NotFound { .. }) => return Ok(TemplateSet::new(window)),
            other => other?,
        };
        set.set_business_window(window);
        Ok(set)
    }

    pub fn save_template_set(&self, set: &TemplateSet) -> Result<(), StoreError> {
        self.templates.save_templates(&self.team, set)
    }

    pub fn roster(&self) -> Result<Vec<StaffMember>, StoreError> {
        self.staff.list_staff(&self.team)
    }

    pub fn save_roster(&self, staff: &[StaffMember]) -> Result<(), StoreError> {
        self.staff.save_staff(&self.team, staff)
    }

    pub fn analyzer(&self) -> CoverageAnalyzer {
        CoverageAnalyzer::new(self.config.shift_lengths().clone())
    }
}

/// Parse hours as `HH:MM` or a decimal such as `8.5`.
pub fn parse_hours(s: &str) -> Result<f64, String> {
    let hours = match s.split_once(':') {
        Some((h, m)) => {
            let h: u32 = h.parse().map_err(|_| format!("invalid hour in '{s}'"))?;
            let m: u32 = m.parse().map_err(|_| format!("invalid minutes in '{s}'"))?;
            if m >= 60 {
                return Err(format!("minutes out of range in '{s}'"));
            }
            f64::from(h) + f64::from(m) / 60.0
        }
        None => s.parse::<f64>().map_err(|_| format!("invalid time '{s}'"))?,
    };
    if !(0.0..=24.0).contains(&hours) {
        return Err(format!("time '{s}' is outside 00:00-24:00"));
    }
    Ok(hours)
}
