//! Day-template timeline editing.
//!
//! This module provides:
//! - The interactive editor for one day template's shift blocks
//! - Gap detection over the staff window
//! - Opening/closing (keyholder) block detection
//! - Colour tokens keyed by shift length

mod editor;
mod gap;
mod palette;

pub use editor::{DragState, EditOutcome, EditorSettings, IgnoreReason, TimelineEditor};
pub use gap::{find_gaps, has_gaps, keyholder_blocks, keyholder_role, CoverageGap, KeyholderRole};
pub use palette::{color_for_length, ColorToken};
