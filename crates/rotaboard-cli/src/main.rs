use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "rotaboard-cli", version, about = "Rotaboard CLI")]
struct Cli {
    /// Team to operate on (defaults to team.id in the config)
    #[arg(long, global = true)]
    team: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Day template management
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Shift block editing
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Weekday to template assignment
    Week {
        #[command(subcommand)]
        action: commands::week::WeekAction,
    },
    /// Staff roster and availability
    Staff {
        #[command(subcommand)]
        action: commands::staff::StaffAction,
    },
    /// Staffing coverage report for the week
    Coverage(commands::coverage::CoverageArgs),
    /// Generate shell completions
    Completions { shell: Shell },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> commands::CmdResult {
    match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rotaboard-cli", &mut std::io::stdout());
            Ok(())
        }
        Commands::Template { action } => commands::template::run(&Context::load(cli.team)?, action),
        Commands::Block { action } => commands::block::run(&Context::load(cli.team)?, action),
        Commands::Week { action } => commands::week::run(&Context::load(cli.team)?, action),
        Commands::Staff { action } => commands::staff::run(&Context::load(cli.team)?, action),
        Commands::Coverage(args) => commands::coverage::run(&Context::load(cli.team)?, args),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
