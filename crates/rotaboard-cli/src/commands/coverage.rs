use clap::Args;
use rotaboard_core::schedule::{format_hours, weekday_name};

use super::{CmdResult, Context};

#[derive(Args)]
pub struct CoverageArgs {
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
    /// List every slot, not only the short ones
    #[arg(long)]
    all: bool,
    /// Exit with an error when the report has warnings
    #[arg(long)]
    strict: bool,
}

pub fn run(ctx: &Context, args: CoverageArgs) -> CmdResult {
    let set = ctx.template_set()?;
    let staff = ctx.roster()?;
    let report = ctx.analyzer().analyze(&set, &staff)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Required hours:  {:.1}h/week", report.weekly_required_hours);
        println!(
            "Staff capacity:  {:.1}h (contracted {:.1}h, max {:.1}h)",
            report.staff_capacity.effective,
            report.staff_capacity.contracted,
            report.staff_capacity.maximum
        );
        println!("Coverage:        {}%", report.coverage_percentage);
        println!("Uncovered slots: {}", report.uncovered_slots);

        let slots = report
            .slots
            .iter()
            .filter(|s| args.all || s.shortfall() > 0 || s.lacks_keyholder());
        for slot in slots {
            let keyholder = match slot.keyholder_role {
                Some(role) if slot.keyholders_available == 0 => format!(" no keyholder ({})", role.label()),
                Some(role) => format!(" {}", role.label()),
                None => String::new(),
            };
            println!(
                "  {:<9} #{} {}-{}  {}/{} staff{keyholder}",
                weekday_name(slot.weekday),
                slot.slot_index,
                format_hours(slot.start),
                format_hours(slot.start + slot.length),
                slot.available,
                slot.needed
            );
        }

        for warning in &report.warnings {
            println!("warning: {warning}");
        }
    }

    if args.strict && report.has_warnings() {
        return Err(format!("coverage has {} warning(s)", report.warnings.len()).into());
    }
    Ok(())
}
