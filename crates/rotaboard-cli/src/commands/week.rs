//! Week assignment commands for CLI.

use chrono::Weekday;
use clap::Subcommand;
use rotaboard_core::schedule::{weekday_name, WEEKDAYS};
use serde::Serialize;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum WeekAction {
    /// Show which template each weekday uses
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Use a template on a weekday and enable the day
    Assign {
        /// Weekday (e.g. mon, Tuesday)
        day: Weekday,
        template: String,
    },
    /// Enable a weekday
    Enable { day: Weekday },
    /// Disable a weekday; it needs no staff
    Disable { day: Weekday },
}

#[derive(Serialize)]
struct DayView<'a> {
    day: &'static str,
    enabled: bool,
    template: &'a str,
    labour_hours: f64,
}

pub fn run(ctx: &Context, action: WeekAction) -> CmdResult {
    let mut set = ctx.template_set()?;

    match action {
        WeekAction::Show { json } => {
            let days: Vec<DayView> = WEEKDAYS
                .iter()
                .map(|&day| {
                    let assignment = set.week.get(day);
                    DayView {
                        day: weekday_name(day),
                        enabled: assignment.enabled,
                        template: &assignment.template,
                        labour_hours: set.day_template(day).map_or(0.0, |t| t.labour_hours()),
                    }
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                for d in &days {
                    let state = if d.enabled { "on " } else { "off" };
                    println!(
                        "{:<10} {state}  {:<16} {:>5.1}h",
                        d.day, d.template, d.labour_hours
                    );
                }
            }
        }
        WeekAction::Assign { day, template } => {
            if set.template(&template).is_none() {
                return Err(format!("template not found: {template}").into());
            }
            set.week.set(day, true, &template);
            ctx.save_template_set(&set)?;
            println!("{} uses {template}", weekday_name(day));
        }
        WeekAction::Enable { day } => {
            set.week.set_enabled(day, true);
            ctx.save_template_set(&set)?;
            println!("{} enabled", weekday_name(day));
        }
        WeekAction::Disable { day } => {
            set.week.set_enabled(day, false);
            ctx.save_template_set(&set)?;
            println!("{} disabled", weekday_name(day));
        }
    }
    Ok(())
}
