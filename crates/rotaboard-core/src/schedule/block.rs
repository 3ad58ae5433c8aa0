use serde::{Deserialize, Serialize};
use std::fmt;

use super::EPSILON_HOURS;

/// Opaque identifier of a shift block, unique within its day template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn default_headcount() -> u32 {
    1
}

/// One staffed interval within a day template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftBlock {
    pub id: BlockId,
    /// Start hour (fractional)
    pub start: f64,
    /// Duration in hours
    pub length: f64,
    /// Number of staff required
    #[serde(default = "default_headcount")]
    pub headcount: u32,
}

impl ShiftBlock {
    /// Create a block with a freshly generated id and headcount 1.
    pub fn new(start: f64, length: f64) -> Self {
        Self::with_id(BlockId::generate(), start, length, 1)
    }

    pub fn with_id(id: impl Into<BlockId>, start: f64, length: f64, headcount: u32) -> Self {
        Self {
            id: id.into(),
            start,
            length,
            headcount: headcount.max(1),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// Whether the two blocks share time. Touching blocks do not overlap.
    pub fn overlaps(&self, other: &ShiftBlock) -> bool {
        self.start < other.end() - EPSILON_HOURS && other.start < self.end() - EPSILON_HOURS
    }

    /// Labour hours required by this block.
    pub fn labour_hours(&self) -> f64 {
        self.length * self.headcount as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_blocks_do_not_overlap() {
        let a = ShiftBlock::with_id("a", 8.5, 4.0, 1);
        let b = ShiftBlock::with_id("b", 12.5, 4.5, 1);
        let c = ShiftBlock::with_id("c", 10.0, 3.0, 1);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn headcount_is_at_least_one() {
        let block = ShiftBlock::with_id("a", 9.0, 4.0, 0);
        assert_eq!(block.headcount, 1);
        assert_eq!(block.labour_hours(), 4.0);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(BlockId::generate(), BlockId::generate());
    }

    #[test]
    fn headcount_defaults_when_missing() {
        let block: ShiftBlock =
            serde_json::from_str(r#"{"id":"x","start":9.0,"length":6.0}"#).unwrap();
        assert_eq!(block.headcount, 1);
        assert_eq!(block.id.as_str(), "x");
    }
}
