//! Shift block editing commands for CLI.
//!
//! Each command opens an edit session on one template, applies a single
//! edit and saves the set.

use clap::Subcommand;
use rotaboard_core::schedule::format_hours;
use rotaboard_core::timeline::IgnoreReason;
use rotaboard_core::{BlockId, EditOutcome, TemplateSet, TimelineEditor};

use super::{parse_hours, CmdResult, Context};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Add a block of the shortest length in the earliest free slot
    Add { template: String },
    /// Move a block; the start snaps to the increment and stays in the window
    Move {
        template: String,
        id: String,
        /// New start (HH:MM or hours)
        #[arg(value_parser = parse_hours)]
        start: f64,
    },
    /// Switch a block to the next configured length
    Cycle { template: String, id: String },
    /// Change how many staff a block needs
    Headcount {
        template: String,
        id: String,
        /// Change, e.g. 1 or -1
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Remove a block (a template keeps at least one)
    Remove { template: String, id: String },
}

fn open_editor(ctx: &Context, set: &TemplateSet, name: &str) -> Result<TimelineEditor, String> {
    let template = set
        .template(name)
        .cloned()
        .ok_or_else(|| format!("template not found: {name}"))?;
    let window = set.window_for(&template);
    TimelineEditor::with_settings(
        template,
        window,
        ctx.config.shift_lengths().clone(),
        ctx.config.editor,
    )
    .map_err(|e| e.to_string())
}

fn check(outcome: EditOutcome, id: &BlockId) -> Result<(), String> {
    match outcome {
        EditOutcome::Applied => Ok(()),
        EditOutcome::Ignored(IgnoreReason::UnknownBlock) => Err(format!("block not found: {id}")),
        EditOutcome::Ignored(IgnoreReason::LastBlock) => {
            Err(format!("cannot remove {id}: a template needs at least one block"))
        }
        EditOutcome::Ignored(IgnoreReason::NoDrag) => Err("no drag in progress".into()),
    }
}

pub fn run(ctx: &Context, action: BlockAction) -> CmdResult {
    let mut set = ctx.template_set()?;

    let (editor, id) = match action {
        BlockAction::Add { template } => {
            let was_empty = set.template(&template).is_some_and(|t| t.blocks.is_empty());
            let mut editor = open_editor(ctx, &set, &template)?;
            // Opening an empty template already seeds its first block
            let seeded = if was_empty {
                editor.blocks().first().map(|b| b.id.clone())
            } else {
                None
            };
            let id = match seeded {
                Some(id) => id,
                None => editor.add_block(),
            };
            (editor, id)
        }
        BlockAction::Move {
            template,
            id,
            start,
        } => {
            let id = BlockId::from(id);
            let mut editor = open_editor(ctx, &set, &template)?;
            check(editor.move_block(&id, start), &id)?;
            (editor, id)
        }
        BlockAction::Cycle { template, id } => {
            let id = BlockId::from(id);
            let mut editor = open_editor(ctx, &set, &template)?;
            check(editor.cycle_length(&id), &id)?;
            (editor, id)
        }
        BlockAction::Headcount {
            template,
            id,
            delta,
        } => {
            let id = BlockId::from(id);
            let mut editor = open_editor(ctx, &set, &template)?;
            check(editor.adjust_headcount(&id, delta), &id)?;
            (editor, id)
        }
        BlockAction::Remove { template, id } => {
            let id = BlockId::from(id);
            let mut editor = open_editor(ctx, &set, &template)?;
            check(editor.remove_block(&id), &id)?;
            println!("Block removed: {id}");
            let gaps = editor.gaps();
            set.replace_template(editor.into_template())?;
            ctx.save_template_set(&set)?;
            for gap in gaps {
                println!(
                    "warning: staff window uncovered {}-{}",
                    format_hours(gap.start),
                    format_hours(gap.end)
                );
            }
            return Ok(());
        }
    };

    if let Some(block) = editor.block(&id) {
        println!(
            "{id}: {}-{} ({:.1}h) x{} [{}]",
            format_hours(block.start),
            format_hours(block.end()),
            block.length,
            block.headcount,
            editor.color_of(&id).map(|c| c.hex()).unwrap_or("-")
        );
    }
    if editor.detect_gaps() {
        println!("warning: staff window has uncovered time");
    }
    set.replace_template(editor.into_template())?;
    ctx.save_template_set(&set)?;
    Ok(())
}
