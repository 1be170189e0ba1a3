use crate::output::print_json;
use crate::root::Workspace;
use anyhow::Context;
use clap::Subcommand;
use ninja_core::agents::AgentTemplates;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum AgentSubcommand {
    /// List available agent templates
    List {
        /// Directory of built-in `<id>-prompt.md` templates
        #[arg(long)]
        builtin_dir: Option<PathBuf>,
    },

    /// Print an agent template
    Show {
        id: String,
        /// Directory of built-in `<id>-prompt.md` templates
        #[arg(long)]
        builtin_dir: Option<PathBuf>,
    },
}

fn templates(ws: &Workspace, builtin_dir: Option<PathBuf>) -> AgentTemplates {
    let templates = AgentTemplates::new(&ws.dirs);
    match builtin_dir {
        Some(dir) => templates.with_builtin_dir(dir),
        None => templates,
    }
}

pub fn run(ws: &Workspace, subcmd: AgentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AgentSubcommand::List { builtin_dir } => {
            let ids = templates(ws, builtin_dir)
                .list()
                .context("failed to list agent templates")?;
            if json {
                return print_json(&ids);
            }
            if ids.is_empty() {
                println!("No agent templates in {}", ws.dirs.agents_dir.display());
            }
            for id in ids {
                println!("{id}");
            }
            Ok(())
        }
        AgentSubcommand::Show { id, builtin_dir } => {
            let text = templates(ws, builtin_dir)
                .get(&id)
                .with_context(|| format!("failed to read agent template '{id}'"))?
                .with_context(|| format!("agent template '{id}' not found"))?;
            if json {
                return print_json(&serde_json::json!({ "id": id, "template": text }));
            }
            print!("{text}");
            Ok(())
        }
    }
}
