mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    agent::AgentSubcommand, config::ConfigSubcommand, profile::ProfileSubcommand,
    skill::SkillSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cp-ninja",
    about = "Detect a workspace stack and apply development profiles",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .cp-ninja/ or .git/)
    #[arg(long, global = true, env = "CP_NINJA_ROOT")]
    root: Option<PathBuf>,

    /// Global data directory (default: ~/.cp-ninja)
    #[arg(long, global = true, env = "CP_NINJA_HOME")]
    home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory layout and seed the built-in presets
    Init,

    /// Inspect the workspace and print its fact sheet
    Analyze,

    /// Rank presets for the workspace
    Suggest,

    /// Apply the best preset and scaffold templates and configs
    Bootstrap,

    /// Manage profiles and the active profile
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Browse agent prompt templates
    Agent {
        #[command(subcommand)]
        subcommand: AgentSubcommand,
    },

    /// Browse the skills catalog
    Skill {
        #[command(subcommand)]
        subcommand: SkillSubcommand,
    },

    /// Inspect and validate ~/.cp-ninja/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let result = root::resolve_dirs(&root, cli.home.as_deref()).and_then(|dirs| {
        let ws = root::Workspace { root, dirs };
        match cli.command {
            Commands::Init => cmd::init::run(&ws, cli.json),
            Commands::Analyze => cmd::analyze::run(&ws, cli.json),
            Commands::Suggest => cmd::suggest::run(&ws, cli.json),
            Commands::Bootstrap => cmd::bootstrap::run(&ws, cli.json),
            Commands::Profile { subcommand } => cmd::profile::run(&ws, subcommand, cli.json),
            Commands::Agent { subcommand } => cmd::agent::run(&ws, subcommand, cli.json),
            Commands::Skill { subcommand } => cmd::skill::run(&ws, subcommand, cli.json),
            Commands::Config { subcommand } => cmd::config::run(&ws, subcommand, cli.json),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
