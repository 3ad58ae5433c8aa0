//! Interactive editing session for one day template.
//!
//! The editor owns the template's blocks while a manager edits them. Every
//! mutation keeps the blocks inside the staff window (clamping rather than
//! failing) and recomputes the column layout before returning, so
//! [`TimelineEditor::layout`] always reflects the committed block set.

use serde::{Deserialize, Serialize};

use super::gap::{find_gaps, keyholder_blocks, CoverageGap, KeyholderRole};
use super::palette::{color_for_length, ColorToken};
use crate::error::ConfigError;
use crate::layout::{layout, Layout};
use crate::schedule::{
    snap_to_increment, BlockId, DayTemplate, ShiftBlock, ShiftLengths, TimeWindow, EPSILON_HOURS,
};

/// Tunables for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Drag/move snapping increment in minutes
    pub snap_minutes: u32,
    /// Upper bound for a block's headcount
    pub max_headcount: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_minutes: 15,
            max_headcount: 10,
        }
    }
}

/// Result of an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// The request was a no-op; the template is unchanged
    Ignored(IgnoreReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownBlock,
    /// A template keeps at least one block while edited
    LastBlock,
    /// No drag in progress
    NoDrag,
}

/// In-flight drag of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub block_id: BlockId,
    /// Committed start when the drag began
    pub origin: f64,
    /// Where the block would land if released now
    pub preview: f64,
}

/// Edit session over a single day template.
#[derive(Debug, Clone)]
pub struct TimelineEditor {
    template: DayTemplate,
    window: TimeWindow,
    lengths: ShiftLengths,
    settings: EditorSettings,
    layout: Layout,
    drag: Option<DragState>,
}

impl TimelineEditor {
    /// Open a session on `template` under `window`.
    ///
    /// Existing blocks are pulled inside the window and an empty template is
    /// seeded with one block.
    ///
    /// # Errors
    ///
    /// Returns an error when the window is malformed.
    pub fn new(
        template: DayTemplate,
        window: TimeWindow,
        lengths: ShiftLengths,
    ) -> Result<Self, ConfigError> {
        Self::with_settings(template, window, lengths, EditorSettings::default())
    }

    /// Open a session with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the window is malformed.
    pub fn with_settings(
        template: DayTemplate,
        window: TimeWindow,
        lengths: ShiftLengths,
        settings: EditorSettings,
    ) -> Result<Self, ConfigError> {
        window.validate()?;
        let mut editor = Self {
            template,
            window,
            lengths,
            settings,
            layout: Layout::default(),
            drag: None,
        };

        let span = editor.window.staff_span();
        let max_headcount = editor.settings.max_headcount.max(1);
        for block in &mut editor.template.blocks {
            block.length = block.length.min(span);
            block.start = editor.window.clamp_start(block.start, block.length);
            block.headcount = block.headcount.clamp(1, max_headcount);
        }

        if editor.template.blocks.is_empty() {
            editor.add_block();
        } else {
            editor.commit();
        }
        Ok(editor)
    }

    pub fn template(&self) -> &DayTemplate {
        &self.template
    }

    pub fn blocks(&self) -> &[ShiftBlock] {
        &self.template.blocks
    }

    pub fn block(&self, id: &BlockId) -> Option<&ShiftBlock> {
        self.template.block(id)
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn lengths(&self) -> &ShiftLengths {
        &self.lengths
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Column layout of the current blocks.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// End the session and hand back the edited template.
    pub fn into_template(self) -> DayTemplate {
        self.template
    }

    fn commit(&mut self) {
        self.layout = layout(&self.template.blocks);
    }

    fn block_mut(&mut self, id: &BlockId) -> Option<&mut ShiftBlock> {
        self.template.blocks.iter_mut().find(|b| &b.id == id)
    }

    fn ignored(&self, id: &BlockId, reason: IgnoreReason) -> EditOutcome {
        tracing::debug!(template = %self.template.name, block = %id, ?reason, "edit ignored");
        EditOutcome::Ignored(reason)
    }

    /// Where a block of `length` would land if moved to `proposed_start`.
    fn resolve_start(&self, proposed_start: f64, length: f64) -> f64 {
        let snapped = snap_to_increment(proposed_start, self.settings.snap_minutes);
        self.window.clamp_start(snapped, length)
    }

    /// Move a block, snapping to the increment and clamping into the window.
    ///
    /// Overlaps are allowed; the layout puts them in separate columns.
    pub fn move_block(&mut self, id: &BlockId, proposed_start: f64) -> EditOutcome {
        let Some(length) = self.block(id).map(|b| b.length) else {
            return self.ignored(id, IgnoreReason::UnknownBlock);
        };
        let start = self.resolve_start(proposed_start, length);
        if let Some(block) = self.block_mut(id) {
            block.start = start;
        }
        self.commit();
        tracing::debug!(template = %self.template.name, block = %id, start, "moved block");
        EditOutcome::Applied
    }

    /// Advance a block to the next configured length, wrapping around.
    ///
    /// A block ending at the staff window end stays anchored there so closing
    /// shifts keep closing. Otherwise the start is kept and only pulled back
    /// when the longer block would overflow the window.
    pub fn cycle_length(&mut self, id: &BlockId) -> EditOutcome {
        let window = self.window;
        let span = window.staff_span();
        let Some((current, end)) = self.block(id).map(|b| (b.length, b.end())) else {
            return self.ignored(id, IgnoreReason::UnknownBlock);
        };
        let new_length = self.lengths.next_after(current, span).unwrap_or(span);
        let touches_end = (end - window.staff_end()).abs() < EPSILON_HOURS;

        if let Some(block) = self.block_mut(id) {
            block.length = new_length;
            block.start = if touches_end {
                (window.staff_end() - new_length).max(window.staff_start())
            } else {
                window.clamp_start(block.start, new_length)
            };
        }
        self.commit();
        tracing::debug!(template = %self.template.name, block = %id, length = new_length, "cycled length");
        EditOutcome::Applied
    }

    /// Change the headcount by `delta`, clamped to `1..=max_headcount`.
    pub fn adjust_headcount(&mut self, id: &BlockId, delta: i32) -> EditOutcome {
        let max = i64::from(self.settings.max_headcount.max(1));
        let Some(current) = self.block(id).map(|b| b.headcount) else {
            return self.ignored(id, IgnoreReason::UnknownBlock);
        };
        let headcount = (i64::from(current) + i64::from(delta)).clamp(1, max) as u32;
        if let Some(block) = self.block_mut(id) {
            block.headcount = headcount;
        }
        self.commit();
        EditOutcome::Applied
    }

    /// Add a block of the shortest configured length in the earliest free
    /// slot, falling back to the window start when nothing fits.
    pub fn add_block(&mut self) -> BlockId {
        let length = self.lengths.first().min(self.window.staff_span());
        let mut sorted: Vec<&ShiftBlock> = self.template.blocks.iter().collect();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut candidate = self.window.staff_start();
        for block in sorted {
            if candidate + length <= block.start + EPSILON_HOURS {
                break;
            }
            candidate = candidate.max(block.end());
        }
        if candidate + length > self.window.staff_end() + EPSILON_HOURS {
            candidate = self.window.staff_start();
        }

        let block = ShiftBlock::new(candidate, length);
        let id = block.id.clone();
        self.template.blocks.push(block);
        self.commit();
        tracing::debug!(template = %self.template.name, block = %id, start = candidate, "added block");
        id
    }

    /// Remove a block unless it is the last one.
    pub fn remove_block(&mut self, id: &BlockId) -> EditOutcome {
        let Some(idx) = self.template.blocks.iter().position(|b| &b.id == id) else {
            return self.ignored(id, IgnoreReason::UnknownBlock);
        };
        if self.template.blocks.len() == 1 {
            return self.ignored(id, IgnoreReason::LastBlock);
        }
        self.template.blocks.remove(idx);
        if self.drag.as_ref().is_some_and(|d| &d.block_id == id) {
            self.drag = None;
        }
        self.commit();
        tracing::debug!(template = %self.template.name, block = %id, "removed block");
        EditOutcome::Applied
    }

    /// Whether any part of the staff window is uncovered.
    pub fn detect_gaps(&self) -> bool {
        !self.gaps().is_empty()
    }

    /// Uncovered intervals of the staff window.
    pub fn gaps(&self) -> Vec<CoverageGap> {
        find_gaps(&self.template.blocks, &self.window)
    }

    /// Blocks that open or close the premises.
    pub fn keyholder_blocks(&self) -> Vec<(&ShiftBlock, KeyholderRole)> {
        keyholder_blocks(&self.template.blocks, &self.window)
    }

    /// Colour token for a block.
    pub fn color_of(&self, id: &BlockId) -> Option<ColorToken> {
        self.block(id)
            .map(|b| color_for_length(b.length, &self.lengths))
    }

    /// Start dragging a block. Replaces any drag already in progress.
    pub fn begin_drag(&mut self, id: &BlockId) -> EditOutcome {
        let Some(start) = self.block(id).map(|b| b.start) else {
            return self.ignored(id, IgnoreReason::UnknownBlock);
        };
        self.drag = Some(DragState {
            block_id: id.clone(),
            origin: start,
            preview: start,
        });
        EditOutcome::Applied
    }

    /// Update the drag preview. Nothing is committed; returns the position
    /// the block would land on, or `None` without an active drag.
    pub fn drag_to(&mut self, proposed_start: f64) -> Option<f64> {
        let id = self.drag.as_ref()?.block_id.clone();
        let length = self.block(&id)?.length;
        let preview = self.resolve_start(proposed_start, length);
        if let Some(drag) = self.drag.as_mut() {
            drag.preview = preview;
        }
        Some(preview)
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Release the drag, committing the last preview as a single move.
    pub fn end_drag(&mut self) -> EditOutcome {
        match self.drag.take() {
            Some(drag) => self.move_block(&drag.block_id, drag.preview),
            None => EditOutcome::Ignored(IgnoreReason::NoDrag),
        }
    }

    /// Abandon the drag; the block stays where it was.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new(9.0, 17.0, 30, 0)
    }

    fn lengths() -> ShiftLengths {
        ShiftLengths::new([4.0, 4.5, 6.0, 8.0]).unwrap()
    }

    fn editor_with(blocks: Vec<ShiftBlock>) -> TimelineEditor {
        let mut template = DayTemplate::new("Weekday");
        template.blocks = blocks;
        TimelineEditor::new(template, window(), lengths()).unwrap()
    }

    fn scenario_editor() -> TimelineEditor {
        editor_with(vec![
            ShiftBlock::with_id("open", 8.5, 4.0, 1),
            ShiftBlock::with_id("close", 12.5, 4.5, 1),
        ])
    }

    #[test]
    fn scenario_two_blocks_one_column_no_gaps() {
        let editor = scenario_editor();
        assert_eq!(editor.layout().column_count, 1);
        assert!(!editor.detect_gaps());
    }

    #[test]
    fn scenario_overlapping_third_block() {
        let editor = editor_with(vec![
            ShiftBlock::with_id("open", 8.5, 4.0, 1),
            ShiftBlock::with_id("close", 12.5, 4.5, 1),
            ShiftBlock::with_id("mid", 10.0, 3.0, 1),
        ]);
        assert_eq!(editor.layout().column_count, 2);
    }

    #[test]
    fn new_rejects_bad_window() {
        let result = TimelineEditor::new(
            DayTemplate::new("x"),
            TimeWindow::new(17.0, 9.0, 0, 0),
            lengths(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_seeds_empty_template() {
        let editor = editor_with(vec![]);
        assert_eq!(editor.blocks().len(), 1);
        assert_eq!(editor.blocks()[0].start, 8.5);
        assert_eq!(editor.blocks()[0].length, 4.0);
        assert_eq!(editor.layout().column_count, 1);
    }

    #[test]
    fn new_pulls_blocks_into_window() {
        let editor = editor_with(vec![ShiftBlock::with_id("a", 15.0, 4.0, 40)]);
        let block = &editor.blocks()[0];
        assert_eq!(block.start, 13.0);
        assert_eq!(block.headcount, 10);
    }

    #[test]
    fn move_snaps_and_clamps() {
        let mut editor = scenario_editor();
        let id = BlockId::from("open");

        assert!(editor.move_block(&id, 9.13).is_applied());
        assert_eq!(editor.block(&id).unwrap().start, 9.25);

        editor.move_block(&id, 2.0);
        assert_eq!(editor.block(&id).unwrap().start, 8.5);

        editor.move_block(&id, 16.0);
        assert_eq!(editor.block(&id).unwrap().start, 13.0);
    }

    #[test]
    fn move_recomputes_layout() {
        let mut editor = scenario_editor();
        editor.move_block(&"close".into(), 10.0);
        assert_eq!(editor.layout().column_count, 2);
        assert!(editor.detect_gaps());
    }

    #[test]
    fn move_unknown_block_is_noop() {
        let mut editor = scenario_editor();
        let before = editor.template().clone();
        assert_eq!(
            editor.move_block(&"ghost".into(), 10.0),
            EditOutcome::Ignored(IgnoreReason::UnknownBlock)
        );
        assert_eq!(editor.template(), &before);
    }

    #[test]
    fn cycle_length_keeps_start_for_opening_block() {
        let mut editor = scenario_editor();
        let id = BlockId::from("open");
        editor.cycle_length(&id);
        let block = editor.block(&id).unwrap();
        assert_eq!(block.length, 4.5);
        assert_eq!(block.start, 8.5);
    }

    #[test]
    fn cycle_length_anchors_closing_block() {
        let mut editor = scenario_editor();
        let id = BlockId::from("close");
        editor.cycle_length(&id);
        let block = editor.block(&id).unwrap();
        assert_eq!(block.length, 6.0);
        assert_eq!(block.end(), 17.0);

        // 8.0 fits the 8.5h window; next wrap goes back to 4.0 still anchored
        editor.cycle_length(&id);
        editor.cycle_length(&id);
        let block = editor.block(&id).unwrap();
        assert_eq!(block.length, 4.0);
        assert_eq!(block.end(), 17.0);
    }

    #[test]
    fn cycle_length_pulls_back_overflowing_block() {
        let mut editor = editor_with(vec![ShiftBlock::with_id("a", 11.0, 4.5, 1)]);
        let id = BlockId::from("a");
        editor.cycle_length(&id);
        let block = editor.block(&id).unwrap();
        assert_eq!(block.length, 6.0);
        assert_eq!(block.start, 11.0);

        editor.cycle_length(&id);
        let block = editor.block(&id).unwrap();
        assert_eq!(block.length, 8.0);
        assert_eq!(block.start, 9.0);
    }

    #[test]
    fn cycle_length_in_short_window_uses_span() {
        let mut template = DayTemplate::new("Short");
        template.blocks.push(ShiftBlock::with_id("a", 10.0, 3.0, 1));
        let mut editor = TimelineEditor::new(
            template,
            TimeWindow::new(10.0, 13.0, 0, 0),
            lengths(),
        )
        .unwrap();
        editor.cycle_length(&"a".into());
        let block = editor.block(&"a".into()).unwrap();
        assert_eq!(block.length, 3.0);
        assert_eq!(block.start, 10.0);
    }

    #[test]
    fn headcount_clamps() {
        let mut editor = scenario_editor();
        let id = BlockId::from("open");
        editor.adjust_headcount(&id, -5);
        assert_eq!(editor.block(&id).unwrap().headcount, 1);
        editor.adjust_headcount(&id, 3);
        assert_eq!(editor.block(&id).unwrap().headcount, 4);
        editor.adjust_headcount(&id, 100);
        assert_eq!(editor.block(&id).unwrap().headcount, 10);
    }

    #[test]
    fn add_block_fills_first_gap() {
        let mut editor = editor_with(vec![
            ShiftBlock::with_id("a", 8.5, 4.0, 1),
            ShiftBlock::with_id("b", 17.0 - 0.5, 0.5, 1),
        ]);
        let id = editor.add_block();
        let block = editor.block(&id).unwrap();
        assert_eq!(block.start, 12.5);
        assert_eq!(block.length, 4.0);
        assert_eq!(editor.layout().column_count, 1);
    }

    #[test]
    fn add_block_falls_back_to_window_start() {
        let mut editor = scenario_editor();
        let id = editor.add_block();
        assert_eq!(editor.block(&id).unwrap().start, 8.5);
        assert_eq!(editor.layout().column_count, 2);
    }

    #[test]
    fn remove_refuses_last_block() {
        let mut editor = scenario_editor();
        assert!(editor.remove_block(&"open".into()).is_applied());
        assert_eq!(
            editor.remove_block(&"close".into()),
            EditOutcome::Ignored(IgnoreReason::LastBlock)
        );
        assert_eq!(editor.blocks().len(), 1);
        assert!(editor.detect_gaps());
    }

    #[test]
    fn keyholder_blocks_found() {
        let editor = scenario_editor();
        let roles: Vec<_> = editor.keyholder_blocks().into_iter().map(|(_, r)| r).collect();
        assert_eq!(roles, vec![KeyholderRole::Open, KeyholderRole::Close]);
    }

    #[test]
    fn drag_previews_then_commits_once() {
        let mut editor = scenario_editor();
        let id = BlockId::from("open");
        editor.begin_drag(&id);
        assert_eq!(editor.drag_to(9.6), Some(9.5));
        assert_eq!(editor.drag_to(20.0), Some(13.0));
        assert_eq!(editor.drag_to(10.1), Some(10.0));
        // Nothing committed yet
        assert_eq!(editor.block(&id).unwrap().start, 8.5);

        assert!(editor.end_drag().is_applied());
        assert_eq!(editor.block(&id).unwrap().start, 10.0);
        assert!(editor.drag_state().is_none());
    }

    #[test]
    fn cancelled_drag_leaves_block() {
        let mut editor = scenario_editor();
        let id = BlockId::from("open");
        editor.begin_drag(&id);
        editor.drag_to(11.0);
        editor.cancel_drag();
        assert_eq!(editor.block(&id).unwrap().start, 8.5);
        assert_eq!(editor.end_drag(), EditOutcome::Ignored(IgnoreReason::NoDrag));
        assert_eq!(editor.drag_to(11.0), None);
    }

    #[test]
    fn colours_follow_length() {
        let editor = scenario_editor();
        assert_eq!(editor.color_of(&"open".into()), Some(ColorToken::Teal));
        assert_eq!(editor.color_of(&"close".into()), Some(ColorToken::Blue));
        assert_eq!(editor.color_of(&"ghost".into()), None);
    }

    #[test]
    fn into_template_returns_edits() {
        let mut editor = scenario_editor();
        editor.adjust_headcount(&"open".into(), 1);
        let template = editor.into_template();
        assert_eq!(template.block(&"open".into()).unwrap().headcount, 2);
    }
}
