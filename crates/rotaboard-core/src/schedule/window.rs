use serde::{Deserialize, Serialize};

use super::EPSILON_HOURS;
use crate::error::ConfigError;

/// Opening hours of the business plus the staff setup/cleanup buffers.
///
/// Times are fractional hours in `0.0..=24.0`; windows that wrap past
/// midnight are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Hour the doors open (e.g. `9.0`)
    pub open_time: f64,
    /// Hour the doors close (e.g. `17.5`)
    pub close_time: f64,
    /// Setup time before opening, in minutes
    #[serde(default)]
    pub open_buffer: u32,
    /// Cleanup time after closing, in minutes
    #[serde(default)]
    pub close_buffer: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            open_time: 9.0,
            close_time: 17.0,
            open_buffer: 0,
            close_buffer: 0,
        }
    }
}

impl TimeWindow {
    pub fn new(open_time: f64, close_time: f64, open_buffer: u32, close_buffer: u32) -> Self {
        Self {
            open_time,
            close_time,
            open_buffer,
            close_buffer,
        }
    }

    /// Earliest hour staff may be scheduled.
    pub fn staff_start(&self) -> f64 {
        self.open_time - self.open_buffer as f64 / 60.0
    }

    /// Latest hour staff may still be working.
    pub fn staff_end(&self) -> f64 {
        self.close_time + self.close_buffer as f64 / 60.0
    }

    /// Length of the staff window in hours.
    pub fn staff_span(&self) -> f64 {
        self.staff_end() - self.staff_start()
    }

    /// Check the window is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWindow`] when a time is not finite,
    /// falls outside the day, or the close time is not after the open time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_day = |h: f64| h.is_finite() && (0.0..=24.0).contains(&h);
        if !in_day(self.open_time)
            || !in_day(self.close_time)
            || self.close_time <= self.open_time
            || self.staff_end() <= self.staff_start()
        {
            return Err(ConfigError::InvalidWindow {
                open: self.open_time,
                close: self.close_time,
            });
        }
        Ok(())
    }

    /// Clamp a block start so that `[start, start + length]` stays inside
    /// the staff window. Blocks longer than the window are pinned to its start.
    pub fn clamp_start(&self, start: f64, length: f64) -> f64 {
        let lo = self.staff_start();
        let hi = self.staff_end() - length;
        if hi < lo {
            lo
        } else {
            start.clamp(lo, hi)
        }
    }

    /// Whether `[start, start + length]` lies inside the staff window.
    pub fn contains(&self, start: f64, length: f64) -> bool {
        start >= self.staff_start() - EPSILON_HOURS
            && start + length <= self.staff_end() + EPSILON_HOURS
    }
}

/// Round `hours` to the nearest multiple of `increment_minutes`.
///
/// Idempotent: snapping an already snapped value returns it unchanged.
pub fn snap_to_increment(hours: f64, increment_minutes: u32) -> f64 {
    if increment_minutes == 0 {
        return hours;
    }
    let step = increment_minutes as f64 / 60.0;
    (hours / step).round() * step
}

/// Format fractional hours as `HH:MM` (e.g. `8.5` -> `08:30`).
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u32;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
