//! Schedule data model: time windows, shift blocks, day templates and the
//! weekly template assignment.

mod block;
mod lengths;
mod template;
mod window;

pub use block::{BlockId, ShiftBlock};
pub use lengths::ShiftLengths;
pub use template::{
    weekday_name, DayAssignment, DayTemplate, TemplateSet, WeekAssignment, WEEKDAYS,
};
pub use window::{format_hours, snap_to_increment, TimeWindow};

/// Tolerance for comparing fractional hours (about 36 seconds).
pub const EPSILON_HOURS: f64 = 0.01;
