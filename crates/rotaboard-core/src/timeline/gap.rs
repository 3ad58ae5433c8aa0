//! Coverage gaps and keyholder blocks within one day's staff window.

use serde::{Deserialize, Serialize};

use crate::schedule::{ShiftBlock, TimeWindow, EPSILON_HOURS};

/// An interval of the staff window that no block covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub start: f64,
    pub end: f64,
}

impl CoverageGap {
    /// Gap duration in hours
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Find the parts of the staff window left uncovered by `blocks`.
///
/// Blocks are swept by start time while tracking how far coverage reaches;
/// a block starting more than [`EPSILON_HOURS`] past that point opens a gap,
/// as does coverage stopping short of the window end.
pub fn find_gaps(blocks: &[ShiftBlock], window: &TimeWindow) -> Vec<CoverageGap> {
    let mut sorted: Vec<&ShiftBlock> = blocks.iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let window_end = window.staff_end();
    let mut covered_until = window.staff_start();
    let mut gaps = Vec::new();

    for block in sorted {
        if block.start > covered_until + EPSILON_HOURS {
            gaps.push(CoverageGap {
                start: covered_until,
                end: block.start.min(window_end),
            });
        }
        covered_until = covered_until.max(block.end());
    }

    if covered_until < window_end - EPSILON_HOURS {
        gaps.push(CoverageGap {
            start: covered_until,
            end: window_end,
        });
    }

    gaps
}

/// Whether any part of the staff window is uncovered.
pub fn has_gaps(blocks: &[ShiftBlock], window: &TimeWindow) -> bool {
    !find_gaps(blocks, window).is_empty()
}

/// Why a block needs a keyholder on shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyholderRole {
    /// Block is on when the doors open
    Open,
    /// Block is on when the doors close
    Close,
    /// Block spans both opening and closing
    OpenAndClose,
}

impl KeyholderRole {
    /// Combine two roles for the same day.
    pub fn merge(self, other: KeyholderRole) -> KeyholderRole {
        if self == other {
            self
        } else {
            KeyholderRole::OpenAndClose
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KeyholderRole::Open => "open",
            KeyholderRole::Close => "close",
            KeyholderRole::OpenAndClose => "open+close",
        }
    }
}

/// Keyholder role of a block, if it opens or closes the premises.
pub fn keyholder_role(block: &ShiftBlock, window: &TimeWindow) -> Option<KeyholderRole> {
    let opens = block.start <= window.open_time + EPSILON_HOURS;
    let closes = block.end() >= window.close_time - EPSILON_HOURS;
    match (opens, closes) {
        (true, true) => Some(KeyholderRole::OpenAndClose),
        (true, false) => Some(KeyholderRole::Open),
        (false, true) => Some(KeyholderRole::Close),
        (false, false) => None,
    }
}

/// Blocks that open or close the premises, in template order.
pub fn keyholder_blocks<'a>(
    blocks: &'a [ShiftBlock],
    window: &TimeWindow,
) -> Vec<(&'a ShiftBlock, KeyholderRole)> {
    blocks
        .iter()
        .filter_map(|b| keyholder_role(b, window).map(|role| (b, role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new(9.0, 17.0, 30, 0)
    }

    fn block(id: &str, start: f64, length: f64) -> ShiftBlock {
        ShiftBlock::with_id(id, start, length, 1)
    }

    #[test]
    fn exact_tiling_has_no_gaps() {
        let blocks = vec![block("a", 8.5, 4.0), block("b", 12.5, 4.5)];
        assert!(!has_gaps(&blocks, &window()));
    }

    #[test]
    fn detects_gap_in_middle() {
        let blocks = vec![block("a", 8.5, 4.0), block("b", 13.0, 4.0)];
        let gaps = find_gaps(&blocks, &window());
        assert_eq!(gaps, vec![CoverageGap { start: 12.5, end: 13.0 }]);
        assert_eq!(gaps[0].duration(), 0.5);
    }

    #[test]
    fn detects_leading_and_trailing_gaps() {
        let blocks = vec![block("a", 10.0, 4.0)];
        let gaps = find_gaps(&blocks, &window());
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].start, 8.5);
        assert_eq!(gaps[1].end, 17.0);
    }

    #[test]
    fn empty_template_is_one_gap() {
        let gaps = find_gaps(&[], &window());
        assert_eq!(gaps, vec![CoverageGap { start: 8.5, end: 17.0 }]);
    }

    #[test]
    fn contained_block_does_not_shrink_coverage() {
        let blocks = vec![block("a", 8.5, 8.5), block("b", 10.0, 1.0)];
        assert!(!has_gaps(&blocks, &window()));
    }

    #[test]
    fn keyholder_roles() {
        let w = window();
        assert_eq!(keyholder_role(&block("a", 8.5, 4.0), &w), Some(KeyholderRole::Open));
        assert_eq!(keyholder_role(&block("b", 12.5, 4.5), &w), Some(KeyholderRole::Close));
        assert_eq!(
            keyholder_role(&block("c", 8.5, 8.5), &w),
            Some(KeyholderRole::OpenAndClose)
        );
        assert_eq!(keyholder_role(&block("d", 10.0, 3.0), &w), None);
    }

    #[test]
    fn keyholder_blocks_keep_template_order() {
        let blocks = vec![block("mid", 10.0, 3.0), block("late", 13.0, 4.0), block("early", 9.0, 2.0)];
        let found: Vec<_> = keyholder_blocks(&blocks, &window())
            .into_iter()
            .map(|(b, _)| b.id.as_str().to_string())
            .collect();
        assert_eq!(found, vec!["late", "early"]);
    }

    #[test]
    fn merge_roles() {
        assert_eq!(KeyholderRole::Open.merge(KeyholderRole::Open), KeyholderRole::Open);
        assert_eq!(
            KeyholderRole::Open.merge(KeyholderRole::Close),
            KeyholderRole::OpenAndClose
        );
    }
}
