//! Weekly coverage analysis over day templates and the staff roster.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::staff::StaffMember;
use crate::error::ConfigError;
use crate::schedule::{weekday_name, BlockId, ShiftLengths, TemplateSet};
use crate::timeline::{keyholder_role, KeyholderRole};

/// Summed staff hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffCapacity {
    /// Sum of contracted hours
    pub contracted: f64,
    /// Sum of maximum hours
    pub maximum: f64,
    /// Capacity compared against required hours
    pub effective: f64,
}

/// Staffing of one slot on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCoverage {
    pub weekday: Weekday,
    pub slot_index: usize,
    pub block_id: BlockId,
    pub start: f64,
    pub length: f64,
    pub needed: u32,
    /// Staff whose preferences and availability fit the slot
    pub available: u32,
    /// Of those, how many are keyholders
    pub keyholders_available: u32,
    pub keyholder_role: Option<KeyholderRole>,
}

impl SlotCoverage {
    /// Staff still missing for this slot.
    pub fn shortfall(&self) -> u32 {
        self.needed.saturating_sub(self.available)
    }

    pub fn lacks_keyholder(&self) -> bool {
        self.keyholder_role.is_some() && self.keyholders_available == 0
    }
}

/// A day whose opening and/or closing has no keyholder available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyholderGap {
    pub weekday: Weekday,
    pub role: KeyholderRole,
}

/// Non-fatal finding for the manager. Never blocks saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    UncoveredSlots { count: u32 },
    MissingKeyholder { gaps: Vec<KeyholderGap> },
    CapacityShortfall { required: f64, capacity: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UncoveredSlots { count } => {
                write!(f, "{count} shift slot(s) lack available staff")
            }
            Warning::MissingKeyholder { gaps } => {
                let days: Vec<&str> = gaps.iter().map(|g| weekday_name(g.weekday)).collect();
                write!(f, "No keyholder available for {}", days.join(", "))
            }
            Warning::CapacityShortfall { required, capacity } => write!(
                f,
                "Staff capacity ({capacity:.1}h) is below required hours ({required:.1}h)"
            ),
        }
    }
}

/// Read-only coverage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub warnings: Vec<Warning>,
    pub weekly_required_hours: f64,
    pub staff_capacity: StaffCapacity,
    /// 0-100
    pub coverage_percentage: u32,
    /// Sum of per-slot shortfalls
    pub uncovered_slots: u32,
    pub slots: Vec<SlotCoverage>,
}

impl CoverageReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Days missing a keyholder, with the opening/closing role that lacks one.
    pub fn keyholder_gaps(&self) -> &[KeyholderGap] {
        self.warnings
            .iter()
            .find_map(|w| match w {
                Warning::MissingKeyholder { gaps } => Some(gaps.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

/// Labour hours needed across the enabled weekdays.
pub fn weekly_required_hours(set: &TemplateSet) -> f64 {
    set.enabled_days()
        .map(|(_, template)| template.labour_hours())
        .sum()
}

/// Contracted, maximum and effective capacity of the roster.
///
/// Effective capacity is the summed maximum hours when any are set,
/// otherwise the summed contracted hours.
pub fn staff_capacity(staff: &[StaffMember]) -> StaffCapacity {
    let contracted: f64 = staff.iter().map(|s| s.contracted_hours).sum();
    let maximum: f64 = staff.iter().map(|s| s.max_hours).sum();
    StaffCapacity {
        contracted,
        maximum,
        effective: if maximum > 0.0 { maximum } else { contracted },
    }
}

/// Capacity as a percentage of required hours, capped at 100.
pub fn coverage_percentage(effective_capacity: f64, required_hours: f64) -> u32 {
    if required_hours <= 0.0 {
        return 0;
    }
    (effective_capacity / required_hours * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Computes coverage reports for a configured set of shift lengths.
pub struct CoverageAnalyzer {
    lengths: ShiftLengths,
}

impl CoverageAnalyzer {
    pub fn new(lengths: ShiftLengths) -> Self {
        Self { lengths }
    }

    pub fn lengths(&self) -> &ShiftLengths {
        &self.lengths
    }

    /// Analyze coverage for one week.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the template set or a staff record
    /// fails boundary validation. Shortfalls are reported as warnings.
    pub fn analyze(
        &self,
        set: &TemplateSet,
        staff: &[StaffMember],
    ) -> Result<CoverageReport, ConfigError> {
        set.validate()?;
        for member in staff {
            member.validate()?;
        }

        let slots = self.slot_coverage(set, staff);
        let required = weekly_required_hours(set);
        let capacity = staff_capacity(staff);
        let uncovered_slots: u32 = slots.iter().map(SlotCoverage::shortfall).sum();

        let mut keyholder_gaps: Vec<KeyholderGap> = Vec::new();
        for slot in slots.iter().filter(|s| s.lacks_keyholder()) {
            let role = slot.keyholder_role.unwrap_or(KeyholderRole::OpenAndClose);
            match keyholder_gaps.last_mut() {
                Some(last) if last.weekday == slot.weekday => last.role = last.role.merge(role),
                _ => keyholder_gaps.push(KeyholderGap {
                    weekday: slot.weekday,
                    role,
                }),
            }
        }

        let mut warnings = Vec::new();
        if uncovered_slots > 0 {
            warnings.push(Warning::UncoveredSlots {
                count: uncovered_slots,
            });
        }
        if !keyholder_gaps.is_empty() {
            warnings.push(Warning::MissingKeyholder {
                gaps: keyholder_gaps,
            });
        }
        if capacity.effective < required {
            warnings.push(Warning::CapacityShortfall {
                required,
                capacity: capacity.effective,
            });
        }

        tracing::debug!(
            required,
            capacity = capacity.effective,
            uncovered_slots,
            warnings = warnings.len(),
            "coverage analyzed"
        );

        Ok(CoverageReport {
            warnings,
            weekly_required_hours: required,
            staff_capacity: capacity,
            coverage_percentage: coverage_percentage(capacity.effective, required),
            uncovered_slots,
            slots,
        })
    }

    /// Per-slot staffing for every enabled weekday, Monday first.
    pub fn slot_coverage(&self, set: &TemplateSet, staff: &[StaffMember]) -> Vec<SlotCoverage> {
        let mut slots = Vec::new();
        for (day, template) in set.enabled_days() {
            let window = set.window_for(template);
            for (slot_index, block) in template.blocks.iter().enumerate() {
                let fitting = staff
                    .iter()
                    .filter(|s| s.can_cover(day, slot_index, &block.id, block.length, &self.lengths));
                let (available, keyholders_available) =
                    fitting.fold((0u32, 0u32), |(all, keys), s| {
                        (all + 1, keys + u32::from(s.keyholder))
                    });
                slots.push(SlotCoverage {
                    weekday: day,
                    slot_index,
                    block_id: block.id.clone(),
                    start: block.start,
                    length: block.length,
                    needed: block.headcount,
                    available,
                    keyholders_available,
                    keyholder_role: keyholder_role(block, &window),
                });
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DayTemplate, ShiftBlock, TimeWindow, WeekAssignment};

    fn monday_only(blocks: Vec<ShiftBlock>) -> TemplateSet {
        let mut template = DayTemplate::new("Weekday");
        template.blocks = blocks;
        let mut week = WeekAssignment::uniform("Weekday");
        for day in [
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            week.set_enabled(day, false);
        }
        TemplateSet {
            business_window: TimeWindow::new(9.0, 17.0, 0, 0),
            week,
            templates: vec![template],
        }
    }

    #[test]
    fn required_hours_weight_headcount() {
        let set = monday_only(vec![
            ShiftBlock::with_id("a", 9.0, 4.0, 2),
            ShiftBlock::with_id("b", 13.0, 4.0, 1),
        ]);
        assert_eq!(weekly_required_hours(&set), 12.0);
    }

    #[test]
    fn capacity_prefers_max_hours() {
        let staff = vec![
            StaffMember::new("a", "Ana").with_hours(20.0, 30.0),
            StaffMember::new("b", "Ben").with_hours(10.0, 0.0),
        ];
        let capacity = staff_capacity(&staff);
        assert_eq!(capacity.contracted, 30.0);
        assert_eq!(capacity.maximum, 30.0);
        assert_eq!(capacity.effective, 30.0);

        let contracted_only = vec![StaffMember::new("c", "Cat").with_hours(16.0, 0.0)];
        assert_eq!(staff_capacity(&contracted_only).effective, 16.0);
    }

    #[test]
    fn percentage_is_capped_and_zero_safe() {
        assert_eq!(coverage_percentage(10.0, 0.0), 0);
        assert_eq!(coverage_percentage(50.0, 40.0), 100);
        assert_eq!(coverage_percentage(20.0, 40.0), 50);
        assert_eq!(coverage_percentage(1.0, 3.0), 33);
    }

    #[test]
    fn opener_without_keyholder_warns() {
        let set = monday_only(vec![ShiftBlock::with_id("day", 9.0, 8.0, 1)]);
        let staff = vec![StaffMember::new("a", "Ana")
            .with_preferred_lengths([8.0])
            .with_hours(40.0, 40.0)];
        let report = CoverageAnalyzer::new(ShiftLengths::default())
            .analyze(&set, &staff)
            .unwrap();

        assert_eq!(report.uncovered_slots, 0);
        assert_eq!(
            report.warnings,
            vec![Warning::MissingKeyholder {
                gaps: vec![KeyholderGap {
                    weekday: Weekday::Mon,
                    role: KeyholderRole::OpenAndClose,
                }],
            }]
        );
        assert_eq!(
            report.warnings[0].to_string(),
            "No keyholder available for Monday"
        );
    }

    #[test]
    fn unavailable_staff_leave_slots_uncovered() {
        let set = monday_only(vec![ShiftBlock::with_id("day", 9.0, 8.0, 2)]);
        let mut ana = StaffMember::new("a", "Ana")
            .with_keyholder(true)
            .with_hours(40.0, 40.0);
        ana.availability.set_slot(Weekday::Mon, 0, false);
        let ben = StaffMember::new("b", "Ben")
            .with_keyholder(true)
            .with_hours(40.0, 40.0);

        let report = CoverageAnalyzer::new(ShiftLengths::default())
            .analyze(&set, &[ana, ben])
            .unwrap();
        assert_eq!(report.uncovered_slots, 1);
        assert_eq!(report.slots[0].available, 1);
        assert_eq!(report.warnings[0].to_string(), "1 shift slot(s) lack available staff");
        assert!(report.keyholder_gaps().is_empty());
    }

    #[test]
    fn capacity_shortfall_is_reported() {
        let set = monday_only(vec![ShiftBlock::with_id("day", 9.0, 8.0, 1)]);
        let staff = vec![StaffMember::new("a", "Ana")
            .with_keyholder(true)
            .with_hours(4.0, 0.0)];
        let report = CoverageAnalyzer::new(ShiftLengths::default())
            .analyze(&set, &staff)
            .unwrap();
        assert_eq!(report.coverage_percentage, 50);
        assert!(report
            .warnings
            .contains(&Warning::CapacityShortfall { required: 8.0, capacity: 4.0 }));
    }

    #[test]
    fn keyholder_roles_merge_per_day() {
        let set = monday_only(vec![
            ShiftBlock::with_id("open", 9.0, 4.0, 1),
            ShiftBlock::with_id("mid", 11.0, 2.0, 1),
            ShiftBlock::with_id("close", 13.0, 4.0, 1),
        ]);
        let staff = vec![StaffMember::new("a", "Ana").with_hours(40.0, 40.0)];
        let report = CoverageAnalyzer::new(ShiftLengths::default())
            .analyze(&set, &staff)
            .unwrap();
        assert_eq!(
            report.keyholder_gaps(),
            &[KeyholderGap {
                weekday: Weekday::Mon,
                role: KeyholderRole::OpenAndClose,
            }]
        );
    }

    #[test]
    fn invalid_set_is_rejected_before_analysis() {
        let mut set = monday_only(vec![ShiftBlock::with_id("day", 9.0, 8.0, 1)]);
        set.week.set(Weekday::Tue, true, "Ghost");
        let result = CoverageAnalyzer::new(ShiftLengths::default()).analyze(&set, &[]);
        assert!(matches!(result, Err(ConfigError::UnknownTemplate { .. })));
    }

    #[test]
    fn disabled_days_contribute_nothing() {
        let set = monday_only(vec![ShiftBlock::with_id("day", 9.0, 8.0, 1)]);
        let report = CoverageAnalyzer::new(ShiftLengths::default())
            .analyze(&set, &[])
            .unwrap();
        assert_eq!(report.weekly_required_hours, 8.0);
        assert_eq!(report.slots.len(), 1);
        assert_eq!(report.coverage_percentage, 0);
    }
}
