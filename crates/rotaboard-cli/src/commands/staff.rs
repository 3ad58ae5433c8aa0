//! Staff roster commands for CLI.

use std::path::PathBuf;

use chrono::Weekday;
use clap::{ArgAction, Subcommand};
use rotaboard_core::{BlockId, SlotRef, StaffMember};
use serde::{Deserialize, Serialize};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum StaffAction {
    /// List staff
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add or replace a staff member
    Add {
        id: String,
        name: String,
        /// Preferred shift lengths in hours, e.g. 4,8 (empty = any)
        #[arg(long, value_delimiter = ',')]
        lengths: Vec<f64>,
        /// Can open and close the premises
        #[arg(long)]
        keyholder: bool,
        /// Contracted hours per week
        #[arg(long, default_value_t = 0.0)]
        contracted: f64,
        /// Maximum hours per week (0 = not set)
        #[arg(long, default_value_t = 0.0)]
        max: f64,
    },
    /// Remove a staff member
    Remove { id: String },
    /// Record availability for a slot
    Availability {
        id: String,
        day: Weekday,
        /// Slot index in the day's template, or a block id
        slot: String,
        #[arg(action = ArgAction::Set)]
        available: bool,
    },
    /// Merge staff from a TOML roster file (`[[staff]]` tables)
    Import { path: PathBuf },
    /// Print the roster as TOML
    Export,
}

/// Roster file layout shared by import and export.
#[derive(Serialize, Deserialize)]
struct Roster {
    #[serde(default)]
    staff: Vec<StaffMember>,
}

fn parse_slot(slot: String) -> SlotRef {
    match slot.parse::<usize>() {
        Ok(index) => SlotRef::Index(index),
        Err(_) => SlotRef::Block(BlockId::from(slot)),
    }
}

pub fn run(ctx: &Context, action: StaffAction) -> CmdResult {
    let mut roster = ctx.roster()?;

    match action {
        StaffAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else if roster.is_empty() {
                println!("No staff. Use 'staff add' or 'staff import'.");
            } else {
                for s in &roster {
                    let lengths = if s.preferred_lengths.is_empty() {
                        "any".to_string()
                    } else {
                        s.preferred_lengths
                            .iter()
                            .map(|l| format!("{l}h"))
                            .collect::<Vec<_>>()
                            .join("/")
                    };
                    println!(
                        "{:<10} {:<20} {:<12} {:>5.1}h/{:>5.1}h {}",
                        s.id,
                        s.name,
                        lengths,
                        s.contracted_hours,
                        s.max_hours,
                        if s.keyholder { "keyholder" } else { "" }
                    );
                }
            }
        }
        StaffAction::Add {
            id,
            name,
            lengths,
            keyholder,
            contracted,
            max,
        } => {
            let mut member = StaffMember::new(&id, name)
                .with_preferred_lengths(lengths)
                .with_keyholder(keyholder)
                .with_hours(contracted, max);
            // Keep availability already recorded for a replaced record
            if let Some(pos) = roster.iter().position(|s| s.id == id) {
                member.availability = roster.remove(pos).availability;
            }
            member.validate()?;
            roster.push(member);
            ctx.save_roster(&roster)?;
            println!("Staff saved: {id}");
        }
        StaffAction::Remove { id } => {
            let before = roster.len();
            roster.retain(|s| s.id != id);
            if roster.len() == before {
                return Err(format!("staff not found: {id}").into());
            }
            ctx.save_roster(&roster)?;
            println!("Staff removed: {id}");
        }
        StaffAction::Availability {
            id,
            day,
            slot,
            available,
        } => {
            let member = roster
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| format!("staff not found: {id}"))?;
            member.availability.set(day, parse_slot(slot), available);
            ctx.save_roster(&roster)?;
            println!("ok");
        }
        StaffAction::Import { path } => {
            let content = std::fs::read_to_string(&path)?;
            let imported: Roster = toml::from_str(&content)?;
            let count = imported.staff.len();
            for member in imported.staff {
                match roster.iter_mut().find(|s| s.id == member.id) {
                    Some(existing) => *existing = member,
                    None => roster.push(member),
                }
            }
            ctx.save_roster(&roster)?;
            println!("Imported {count} staff record(s)");
        }
        StaffAction::Export => {
            let file = Roster { staff: roster };
            print!("{}", toml::to_string_pretty(&file)?);
        }
    }
    Ok(())
}
