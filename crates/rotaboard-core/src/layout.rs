//! Column layout for overlapping shift blocks.
//!
//! Greedy interval partitioning: blocks are visited by start time and each
//! goes into the first column whose previous block has already ended. The
//! resulting column count equals the largest number of blocks overlapping at
//! any instant, which no layout can beat.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::schedule::{BlockId, ShiftBlock, EPSILON_HOURS};

/// Column assignment for one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub block_id: BlockId,
    pub column: usize,
}

/// Result of laying out a day's blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub column_count: usize,
    /// Placements in visiting order (start ascending, input order on ties)
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Column of a block, if it was part of the input.
    pub fn column_of(&self, id: &BlockId) -> Option<usize> {
        self.placements
            .iter()
            .find(|p| &p.block_id == id)
            .map(|p| p.column)
    }

    /// Lookup table from block id to column.
    pub fn column_map(&self) -> HashMap<BlockId, usize> {
        self.placements
            .iter()
            .map(|p| (p.block_id.clone(), p.column))
            .collect()
    }
}

/// Lay out `blocks` into the fewest non-overlapping columns.
///
/// Pure and deterministic for a given input order. Blocks that merely touch
/// (within [`EPSILON_HOURS`]) share a column.
pub fn layout(blocks: &[ShiftBlock]) -> Layout {
    let mut order: Vec<&ShiftBlock> = blocks.iter().collect();
    // Stable sort keeps input order for equal starts
    order.sort_by(|a, b| a.start.total_cmp(&b.start));

    // End time of the last block placed in each column
    let mut column_ends: Vec<f64> = Vec::new();
    let mut placements = Vec::with_capacity(order.len());

    for block in order {
        let column = match column_ends
            .iter()
            .position(|end| block.start >= end - EPSILON_HOURS)
        {
            Some(column) => {
                column_ends[column] = block.end();
                column
            }
            None => {
                column_ends.push(block.end());
                column_ends.len() - 1
            }
        };
        placements.push(Placement {
            block_id: block.id.clone(),
            column,
        });
    }

    Layout {
        column_count: column_ends.len(),
        placements,
    }
}
