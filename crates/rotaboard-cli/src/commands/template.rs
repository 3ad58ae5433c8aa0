//! Day template management commands for CLI.

use clap::Subcommand;
use rotaboard_core::schedule::{format_hours, weekday_name};
use rotaboard_core::timeline::{find_gaps, keyholder_role};
use rotaboard_core::{
    color_for_length, layout, ColorToken, DayTemplate, KeyholderRole, TimeWindow, TimelineEditor,
};
use serde::Serialize;

use super::{parse_hours, CmdResult, Context};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List day templates
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a template's blocks, columns, gaps and keyholder shifts
    Show {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a template with one block spanning the staff window
    Create {
        name: String,
        /// Create without the default block
        #[arg(long)]
        empty: bool,
    },
    /// Rename a template and its week assignments
    Rename { old: String, new: String },
    /// Delete a template; its weekdays move to the first remaining template
    Delete { name: String },
    /// Override the opening hours for days using this template
    Window {
        name: String,
        /// Opening time (HH:MM or hours)
        #[arg(long, value_parser = parse_hours)]
        open: Option<f64>,
        /// Closing time (HH:MM or hours)
        #[arg(long, value_parser = parse_hours)]
        close: Option<f64>,
        /// Setup minutes before opening
        #[arg(long)]
        open_buffer: Option<u32>,
        /// Cleanup minutes after closing
        #[arg(long)]
        close_buffer: Option<u32>,
        /// Drop the override and use the business hours
        #[arg(long, conflicts_with_all = ["open", "close", "open_buffer", "close_buffer"])]
        clear: bool,
    },
}

#[derive(Serialize)]
struct TemplateSummary<'a> {
    name: &'a str,
    blocks: usize,
    labour_hours: f64,
    days: Vec<&'static str>,
}

#[derive(Serialize)]
struct BlockView<'a> {
    id: &'a str,
    start: f64,
    end: f64,
    length: f64,
    headcount: u32,
    column: usize,
    keyholder_role: Option<KeyholderRole>,
    color: ColorToken,
}

#[derive(Serialize)]
struct TemplateView<'a> {
    name: &'a str,
    window: TimeWindow,
    column_count: usize,
    blocks: Vec<BlockView<'a>>,
    gaps: Vec<(f64, f64)>,
}

pub fn run(ctx: &Context, action: TemplateAction) -> CmdResult {
    let mut set = ctx.template_set()?;

    match action {
        TemplateAction::List { json } => {
            let summaries: Vec<TemplateSummary> = set
                .templates
                .iter()
                .map(|t| TemplateSummary {
                    name: &t.name,
                    blocks: t.blocks.len(),
                    labour_hours: t.labour_hours(),
                    days: set
                        .week
                        .iter()
                        .filter(|(_, a)| a.enabled && a.template == t.name)
                        .map(|(day, _)| weekday_name(day))
                        .collect(),
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for s in &summaries {
                    println!(
                        "{:<16} {:>2} block(s) {:>6.1}h  {}",
                        s.name,
                        s.blocks,
                        s.labour_hours,
                        s.days.join(", ")
                    );
                }
            }
        }
        TemplateAction::Show { name, json } => {
            let template = set
                .template(&name)
                .ok_or_else(|| format!("template not found: {name}"))?;
            let window = set.window_for(template);
            let lengths = ctx.config.shift_lengths();
            let columns = layout(&template.blocks);

            let mut blocks: Vec<BlockView> = template
                .blocks
                .iter()
                .map(|b| BlockView {
                    id: b.id.as_str(),
                    start: b.start,
                    end: b.end(),
                    length: b.length,
                    headcount: b.headcount,
                    column: columns.column_of(&b.id).unwrap_or(0),
                    keyholder_role: keyholder_role(b, &window),
                    color: color_for_length(b.length, lengths),
                })
                .collect();
            blocks.sort_by(|a, b| a.start.total_cmp(&b.start));

            let view = TemplateView {
                name: &template.name,
                window,
                column_count: columns.column_count,
                blocks,
                gaps: find_gaps(&template.blocks, &window)
                    .iter()
                    .map(|g| (g.start, g.end))
                    .collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_template(&view);
            }
        }
        TemplateAction::Create { name, empty } => {
            let template = if empty {
                DayTemplate::new(&name)
            } else {
                DayTemplate::with_default_block(&name, &set.business_window)
            };
            set.add_template(template)?;
            ctx.save_template_set(&set)?;
            println!("Template created: {name}");
        }
        TemplateAction::Rename { old, new } => {
            set.rename_template(&old, &new)?;
            ctx.save_template_set(&set)?;
            println!("Template renamed: {old} -> {new}");
        }
        TemplateAction::Delete { name } => {
            let heir = set.delete_template(&name)?;
            ctx.save_template_set(&set)?;
            println!("Template deleted: {name} (days moved to {heir})");
        }
        TemplateAction::Window {
            name,
            open,
            close,
            open_buffer,
            close_buffer,
            clear,
        } => {
            let business = set.business_window;
            let mut template = set
                .template(&name)
                .cloned()
                .ok_or_else(|| format!("template not found: {name}"))?;

            template.window = if clear {
                None
            } else {
                let mut window = template.window_or(&business);
                window.open_time = open.unwrap_or(window.open_time);
                window.close_time = close.unwrap_or(window.close_time);
                window.open_buffer = open_buffer.unwrap_or(window.open_buffer);
                window.close_buffer = close_buffer.unwrap_or(window.close_buffer);
                Some(window)
            };

            // Pull existing blocks inside the new window
            let window = template.window_or(&business);
            let had_blocks = !template.blocks.is_empty();
            let editor = TimelineEditor::with_settings(
                template,
                window,
                ctx.config.shift_lengths().clone(),
                ctx.config.editor,
            )?;
            let mut template = editor.into_template();
            if !had_blocks {
                template.blocks.clear();
            }

            set.replace_template(template)?;
            ctx.save_template_set(&set)?;
            println!(
                "Template window: {name} {}-{} (staff {}-{})",
                format_hours(window.open_time),
                format_hours(window.close_time),
                format_hours(window.staff_start()),
                format_hours(window.staff_end())
            );
        }
    }
    Ok(())
}

fn print_template(view: &TemplateView) {
    let w = &view.window;
    println!(
        "{} ({}-{}, staff {}-{}), {} column(s)",
        view.name,
        format_hours(w.open_time),
        format_hours(w.close_time),
        format_hours(w.staff_start()),
        format_hours(w.staff_end()),
        view.column_count
    );
    println!("  COL  START  END    LEN    HEAD  ROLE        ID");
    for b in &view.blocks {
        let role = b.keyholder_role.map(|r| r.label()).unwrap_or("-");
        println!(
            "  {:<4} {}  {}  {:>4.1}h  {:<4}  {:<10}  {}",
            b.column,
            format_hours(b.start),
            format_hours(b.end),
            b.length,
            b.headcount,
            role,
            b.id
        );
    }
    for (start, end) in &view.gaps {
        println!("  gap: {}-{}", format_hours(*start), format_hours(*end));
    }
}
