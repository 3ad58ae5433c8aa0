use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{format_hours, BlockId, ShiftBlock, TimeWindow};
use crate::error::{ConfigError, ValidationError};

/// Weekdays in assignment order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A named, reusable set of shift blocks describing one kind of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTemplate {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<ShiftBlock>,
    /// Overrides the business window for days using this template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

impl DayTemplate {
    /// An empty template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            window: None,
        }
    }

    /// A template holding one block that spans the whole staff window.
    pub fn with_default_block(name: impl Into<String>, window: &TimeWindow) -> Self {
        let mut template = Self::new(name);
        template
            .blocks
            .push(ShiftBlock::new(window.staff_start(), window.staff_span()));
        template
    }

    /// The window this template runs under.
    pub fn window_or(&self, business: &TimeWindow) -> TimeWindow {
        self.window.unwrap_or(*business)
    }

    pub fn block(&self, id: &BlockId) -> Option<&ShiftBlock> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Total labour hours for one day run on this template.
    pub fn labour_hours(&self) -> f64 {
        self.blocks.iter().map(ShiftBlock::labour_hours).sum()
    }

    /// Pull every block inside `window`, shortening blocks longer than it.
    /// Returns how many blocks changed.
    pub fn fit_to(&mut self, window: &TimeWindow) -> usize {
        let span = window.staff_span();
        let mut changed = 0;
        for block in &mut self.blocks {
            let length = block.length.min(span);
            let start = window.clamp_start(block.start, length);
            if length != block.length || start != block.start {
                block.length = length;
                block.start = start;
                changed += 1;
            }
        }
        changed
    }
}

fn check_template_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".into(),
            message: "template name must not be empty".into(),
        });
    }
    Ok(())
}

/// Whether a weekday is open and which template it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub enabled: bool,
    pub template: String,
}

/// Mapping of each weekday (Monday first) to a day template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAssignment {
    days: [DayAssignment; 7],
}

impl WeekAssignment {
    /// Every day enabled and assigned to `template`.
    pub fn uniform(template: &str) -> Self {
        Self {
            days: std::array::from_fn(|_| DayAssignment {
                enabled: true,
                template: template.to_string(),
            }),
        }
    }

    pub fn get(&self, day: Weekday) -> &DayAssignment {
        &self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, enabled: bool, template: impl Into<String>) {
        self.days[day.num_days_from_monday() as usize] = DayAssignment {
            enabled,
            template: template.into(),
        };
    }

    pub fn set_enabled(&mut self, day: Weekday, enabled: bool) {
        self.days[day.num_days_from_monday() as usize].enabled = enabled;
    }

    /// All seven days with their assignment.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayAssignment)> {
        WEEKDAYS.iter().copied().zip(self.days.iter())
    }

    /// Point every day using `from` at `to`. Returns how many days moved.
    pub fn reassign(&mut self, from: &str, to: &str) -> usize {
        let mut moved = 0;
        for day in self.days.iter_mut().filter(|d| d.template == from) {
            day.template = to.to_string();
            moved += 1;
        }
        moved
    }
}

/// Everything the template store persists for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    #[serde(default)]
    pub business_window: TimeWindow,
    pub week: WeekAssignment,
    #[serde(default)]
    pub templates: Vec<DayTemplate>,
}

impl TemplateSet {
    /// A set with a single default template assigned to every day.
    pub fn new(business_window: TimeWindow) -> Self {
        let template = DayTemplate::with_default_block("Default", &business_window);
        Self {
            business_window,
            week: WeekAssignment::uniform(&template.name),
            templates: vec![template],
        }
    }

    pub fn template(&self, name: &str) -> Option<&DayTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn template_mut(&mut self, name: &str) -> Option<&mut DayTemplate> {
        self.templates.iter_mut().find(|t| t.name == name)
    }

    /// Effective window for a template.
    pub fn window_for(&self, template: &DayTemplate) -> TimeWindow {
        template.window_or(&self.business_window)
    }

    /// The template used on `day`, if the day is enabled.
    pub fn day_template(&self, day: Weekday) -> Option<&DayTemplate> {
        let assignment = self.week.get(day);
        if !assignment.enabled {
            return None;
        }
        self.template(&assignment.template)
    }

    /// Enabled days with their template, Monday first.
    pub fn enabled_days(&self) -> impl Iterator<Item = (Weekday, &DayTemplate)> {
        WEEKDAYS
            .iter()
            .filter_map(move |day| self.day_template(*day).map(|t| (*day, t)))
    }

    /// Add a new template.
    ///
    /// # Errors
    ///
    /// Fails when a template with the same name exists.
    pub fn add_template(&mut self, template: DayTemplate) -> Result<(), ValidationError> {
        check_template_name(&template.name)?;
        if self.template(&template.name).is_some() {
            return Err(ValidationError::DuplicateTemplate(template.name));
        }
        self.templates.push(template);
        Ok(())
    }

    /// Replace an existing template of the same name, e.g. after an edit session.
    ///
    /// # Errors
    ///
    /// Fails when no template with that name exists.
    pub fn replace_template(&mut self, template: DayTemplate) -> Result<(), ValidationError> {
        let slot = self
            .template_mut(&template.name)
            .ok_or_else(|| ValidationError::TemplateNotFound(template.name.clone()))?;
        *slot = template;
        Ok(())
    }

    /// Rename a template and every week entry pointing at it.
    ///
    /// # Errors
    ///
    /// Fails when `old` is missing, or `new` is blank or already taken.
    pub fn rename_template(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        check_template_name(new)?;
        if old == new {
            return Ok(());
        }
        if self.template(new).is_some() {
            return Err(ValidationError::DuplicateTemplate(new.to_string()));
        }
        let template = self
            .template_mut(old)
            .ok_or_else(|| ValidationError::TemplateNotFound(old.to_string()))?;
        template.name = new.to_string();
        self.week.reassign(old, new);
        Ok(())
    }

    /// Delete a template, moving its weekdays onto the first remaining one.
    ///
    /// Returns the name of the template that inherited the weekdays.
    ///
    /// # Errors
    ///
    /// Fails when the template is missing or is the last one left.
    pub fn delete_template(&mut self, name: &str) -> Result<String, ValidationError> {
        let idx = self
            .templates
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ValidationError::TemplateNotFound(name.to_string()))?;
        if self.templates.len() == 1 {
            return Err(ValidationError::LastTemplate(name.to_string()));
        }
        self.templates.remove(idx);
        let heir = self.templates[0].name.clone();
        let moved = self.week.reassign(name, &heir);
        tracing::debug!(template = name, heir = %heir, moved, "deleted day template");
        Ok(heir)
    }

    /// Replace the business window and pull blocks of templates that use it
    /// back inside. Returns how many blocks moved.
    pub fn set_business_window(&mut self, window: TimeWindow) -> usize {
        self.business_window = window;
        let mut moved = 0;
        for template in self.templates.iter_mut().filter(|t| t.window.is_none()) {
            moved += template.fit_to(&window);
        }
        if moved > 0 {
            tracing::debug!(moved, "fitted blocks to new business window");
        }
        moved
    }

    /// Boundary validation run before layout or coverage analysis.
    ///
    /// # Errors
    ///
    /// Returns the first malformed window, duplicate template name, malformed
    /// block or week entry referencing a missing template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.business_window.validate()?;

        for (i, template) in self.templates.iter().enumerate() {
            if let Some(window) = &template.window {
                window.validate()?;
            }
            if self.templates[..i].iter().any(|t| t.name == template.name) {
                return Err(ConfigError::InvalidValue {
                    key: "templates".into(),
                    message: format!("duplicate template name '{}'", template.name),
                });
            }
            validate_blocks(template, &self.window_for(template))?;
        }

        for (day, assignment) in self.week.iter() {
            if assignment.enabled && self.template(&assignment.template).is_none() {
                return Err(ConfigError::UnknownTemplate {
                    weekday: weekday_name(day).to_string(),
                    template: assignment.template.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Block invariants: positive length, headcount of at least one, unique
/// ids and containment in the staff window.
fn validate_blocks(template: &DayTemplate, window: &TimeWindow) -> Result<(), ConfigError> {
    for (i, block) in template.blocks.iter().enumerate() {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: format!("templates.{}.blocks.{}", template.name, block.id),
            message,
        };
        if !block.length.is_finite() || block.length <= 0.0 {
            return Err(invalid(format!("length must be positive, got {}", block.length)));
        }
        if block.headcount == 0 {
            return Err(invalid("headcount must be at least 1".into()));
        }
        if !block.start.is_finite() || !window.contains(block.start, block.length) {
            return Err(invalid(format!(
                "{}-{} lies outside the staff window {}-{}",
                format_hours(block.start),
                format_hours(block.end()),
                format_hours(window.staff_start()),
                format_hours(window.staff_end())
            )));
        }
        if template.blocks[..i].iter().any(|b| b.id == block.id) {
            return Err(invalid("duplicate block id".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_template_set() -> TemplateSet {
        let mut set = TemplateSet::new(TimeWindow::default());
        set.add_template(DayTemplate::new("Weekend")).unwrap();
        set.week.set(Weekday::Sat, true, "Weekend");
        set.week.set(Weekday::Sun, true, "Weekend");
        set
    }

    #[test]
    fn default_block_spans_staff_window() {
        let window = TimeWindow::new(9.0, 17.0, 30, 0);
        let template = DayTemplate::with_default_block("Weekday", &window);
        assert_eq!(template.blocks.len(), 1);
        assert_eq!(template.blocks[0].start, 8.5);
        assert_eq!(template.blocks[0].end(), 17.0);
    }

    #[test]
    fn delete_reassigns_weekdays() {
        let mut set = two_template_set();
        let heir = set.delete_template("Weekend").unwrap();
        assert_eq!(heir, "Default");
        assert_eq!(set.week.get(Weekday::Sat).template, "Default");
        assert!(set.validate().is_ok());
    }

    #[test]
    fn delete_refuses_last_template() {
        let mut set = TemplateSet::new(TimeWindow::default());
        assert_eq!(
            set.delete_template("Default"),
            Err(ValidationError::LastTemplate("Default".into()))
        );
    }

    #[test]
    fn rename_updates_week() {
        let mut set = two_template_set();
        set.rename_template("Weekend", "Saturday").unwrap();
        assert_eq!(set.week.get(Weekday::Sun).template, "Saturday");
        assert!(set.rename_template("Saturday", "Default").is_err());
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut set = TemplateSet::new(TimeWindow::default());
        assert!(matches!(
            set.add_template(DayTemplate::new("Default")),
            Err(ValidationError::DuplicateTemplate(_))
        ));
    }

    #[test]
    fn validate_flags_dangling_week_entry() {
        let mut set = TemplateSet::new(TimeWindow::default());
        set.week.set(Weekday::Wed, true, "Missing");
        assert!(matches!(
            set.validate(),
            Err(ConfigError::UnknownTemplate { .. })
        ));

        // Disabled days may point anywhere
        set.week.set_enabled(Weekday::Wed, false);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn validate_checks_template_windows() {
        let mut set = TemplateSet::new(TimeWindow::default());
        let mut late = DayTemplate::new("Late");
        late.window = Some(TimeWindow::new(20.0, 18.0, 0, 0));
        set.add_template(late).unwrap();
        assert!(matches!(
            set.validate(),
            Err(ConfigError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn enabled_days_skip_disabled() {
        let mut set = two_template_set();
        set.week.set_enabled(Weekday::Sun, false);
        let days: Vec<_> = set.enabled_days().map(|(d, _)| d).collect();
        assert_eq!(days.len(), 6);
        assert!(!days.contains(&Weekday::Sun));
    }

    #[test]
    fn rename_rejects_blank_name() {
        let mut set = two_template_set();
        assert!(matches!(
            set.rename_template("Weekend", "   "),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(set.template("Weekend").is_some());
    }

    fn set_with_block(block: ShiftBlock) -> TemplateSet {
        let mut set = TemplateSet::new(TimeWindow::new(9.0, 17.0, 30, 0));
        let mut template = DayTemplate::new("Weekday");
        template.blocks.push(block);
        set.add_template(template).unwrap();
        set.week.set(Weekday::Mon, true, "Weekday");
        set
    }

    fn block_error(set: &TemplateSet) -> String {
        match set.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => key,
            other => panic!("expected a block error, got {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_blocks_inside_window() {
        let set = set_with_block(ShiftBlock::with_id("a", 8.5, 8.5, 2));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_length() {
        let mut block = ShiftBlock::with_id("a", 9.0, 4.0, 1);
        block.length = -4.0;
        assert_eq!(block_error(&set_with_block(block)), "templates.Weekday.blocks.a");

        let mut block = ShiftBlock::with_id("b", 9.0, 4.0, 1);
        block.length = 0.0;
        assert_eq!(block_error(&set_with_block(block)), "templates.Weekday.blocks.b");
    }

    #[test]
    fn validate_rejects_zero_headcount() {
        let mut block = ShiftBlock::with_id("a", 9.0, 4.0, 1);
        block.headcount = 0;
        assert_eq!(block_error(&set_with_block(block)), "templates.Weekday.blocks.a");
    }

    #[test]
    fn validate_rejects_blocks_outside_window() {
        let early = ShiftBlock::with_id("early", 3.0, 4.0, 1);
        assert_eq!(
            block_error(&set_with_block(early)),
            "templates.Weekday.blocks.early"
        );
        let late = ShiftBlock::with_id("late", 14.0, 4.0, 1);
        assert_eq!(
            block_error(&set_with_block(late)),
            "templates.Weekday.blocks.late"
        );
    }

    #[test]
    fn validate_uses_template_window() {
        let mut set = set_with_block(ShiftBlock::with_id("a", 9.0, 4.0, 1));
        if let Some(t) = set.template_mut("Weekday") {
            t.window = Some(TimeWindow::new(10.0, 16.0, 0, 0));
        }
        assert_eq!(block_error(&set), "templates.Weekday.blocks.a");
    }

    #[test]
    fn validate_rejects_duplicate_block_ids() {
        let mut set = set_with_block(ShiftBlock::with_id("a", 9.0, 4.0, 1));
        if let Some(t) = set.template_mut("Weekday") {
            t.blocks.push(ShiftBlock::with_id("a", 12.0, 4.0, 1));
        }
        assert_eq!(block_error(&set), "templates.Weekday.blocks.a");
    }

    #[test]
    fn business_window_change_fits_blocks() {
        let mut set = two_template_set();
        if let Some(t) = set.template_mut("Weekend") {
            t.blocks.push(ShiftBlock::with_id("w", 14.0, 3.0, 1));
            t.window = Some(TimeWindow::new(10.0, 18.0, 0, 0));
        }

        let moved = set.set_business_window(TimeWindow::new(10.0, 14.0, 0, 0));
        assert_eq!(moved, 1);
        let default = &set.template("Default").unwrap().blocks[0];
        assert_eq!((default.start, default.length), (10.0, 4.0));
        // Templates with their own window are untouched
        assert_eq!(set.template("Weekend").unwrap().blocks[0].start, 14.0);
        assert!(set.validate().is_ok());
    }
}
