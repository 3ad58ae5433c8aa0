use serde::{Deserialize, Serialize};

use super::EPSILON_HOURS;
use crate::error::ConfigError;

/// The business's configured shift lengths, in hours.
///
/// Always non-empty, sorted ascending and free of near-duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ShiftLengths(Vec<f64>);

impl ShiftLengths {
    /// Build from any list of lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if no positive, finite length remains after filtering.
    pub fn new(lengths: impl IntoIterator<Item = f64>) -> Result<Self, ConfigError> {
        let mut values: Vec<f64> = lengths
            .into_iter()
            .filter(|l| l.is_finite() && *l > 0.0)
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|a, b| (*a - *b).abs() < EPSILON_HOURS);

        if values.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "shifts.lengths".into(),
                message: "at least one positive shift length is required".into(),
            });
        }
        Ok(Self(values))
    }

    /// Shortest configured length.
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of `length` in the sorted list, within tolerance.
    pub fn position(&self, length: f64) -> Option<usize> {
        self.0
            .iter()
            .position(|l| (l - length).abs() < EPSILON_HOURS)
    }

    /// The length that follows `current`, wrapping after the longest.
    ///
    /// Only lengths up to `max_length` are considered. A `current` value that
    /// is not configured advances to the next longer configured length.
    /// Returns `None` when no configured length fits.
    pub fn next_after(&self, current: f64, max_length: f64) -> Option<f64> {
        let fitting: Vec<f64> = self
            .iter()
            .filter(|l| *l <= max_length + EPSILON_HOURS)
            .collect();
        if fitting.is_empty() {
            return None;
        }
        let next = match fitting
            .iter()
            .position(|l| (l - current).abs() < EPSILON_HOURS)
        {
            Some(idx) => fitting[(idx + 1) % fitting.len()],
            None => fitting
                .iter()
                .copied()
                .find(|l| *l > current)
                .unwrap_or(fitting[0]),
        };
        Some(next)
    }
}

impl Default for ShiftLengths {
    fn default() -> Self {
        Self(vec![4.0, 6.0, 8.0])
    }
}

impl TryFrom<Vec<f64>> for ShiftLengths {
    type Error = ConfigError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShiftLengths> for Vec<f64> {
    fn from(value: ShiftLengths) -> Self {
        value.0
    }
}
