use crate::output::{print_json, print_list, print_table};
use crate::root::Workspace;
use anyhow::Context;
use clap::Subcommand;
use ninja_core::agents::AgentTemplates;
use ninja_core::orchestrator::Orchestrator;
use ninja_core::profile::{ProfileDefinition, ProfileStore};
use ninja_core::NinjaError;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// List profiles in the global store
    List,

    /// Show a profile's skills, agents and standards
    Show { name: String },

    /// Make a profile active for this workspace and scaffold resources
    Use { name: String },

    /// Print the active profile name
    Active,

    /// Validate a profile JSON file and add it to the store
    Create { file: PathBuf },
}

pub fn run(ws: &Workspace, subcmd: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProfileSubcommand::List => list(ws, json),
        ProfileSubcommand::Show { name } => show(ws, &name, json),
        ProfileSubcommand::Use { name } => use_profile(ws, &name, json),
        ProfileSubcommand::Active => active(ws, json),
        ProfileSubcommand::Create { file } => create(ws, &file, json),
    }
}

fn list(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let store = ProfileStore::new(&ws.dirs);
    let names = store.list().context("failed to list profiles")?;
    let active = store.active_name().context("failed to read active profile")?;

    if json {
        return print_json(&serde_json::json!({ "profiles": names, "active": active }));
    }
    if names.is_empty() {
        println!("No profiles. Run `cp-ninja init` to seed the defaults.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = names
        .iter()
        .map(|name| {
            let (marker, description) = match store.resolve(name) {
                Ok(Some(p)) => ("", p.description),
                Ok(None) => ("", String::new()),
                Err(e) => ("!", e.to_string()),
            };
            let current = if active.as_deref() == Some(name.as_str()) {
                "*"
            } else {
                marker
            };
            vec![current.to_string(), name.clone(), description]
        })
        .collect();
    print_table(&["", "NAME", "DESCRIPTION"], &rows);
    Ok(())
}

fn load(store: &ProfileStore, name: &str) -> anyhow::Result<ProfileDefinition> {
    store
        .resolve(name)
        .with_context(|| format!("failed to load profile '{name}'"))?
        .ok_or_else(|| NinjaError::ProfileNotFound(name.to_string()).into())
}

fn show(ws: &Workspace, name: &str, json: bool) -> anyhow::Result<()> {
    let profile = load(&ProfileStore::new(&ws.dirs), name)?;
    let missing = AgentTemplates::new(&ws.dirs).missing_for(&profile)?;

    if json {
        return print_json(&serde_json::json!({
            "profile": profile,
            "missingAgentTemplates": missing,
        }));
    }

    println!("{}", profile.name);
    if !profile.description.is_empty() {
        println!("  {}", profile.description);
    }
    print_list("Skills", &profile.skills);
    print_list("Agent templates", &profile.agent_templates);
    print_list("Coding standards", &profile.coding_standards);
    print_list("Auto-activate files", &profile.auto_activate.file_patterns);
    print_list("Auto-activate dependencies", &profile.auto_activate.dependencies);
    if !missing.is_empty() {
        println!("[warning] missing agent templates: {}", missing.join(", "));
    }
    Ok(())
}

fn use_profile(ws: &Workspace, name: &str, json: bool) -> anyhow::Result<()> {
    let facts = super::inspect(ws)?;
    let mut orchestrator = Orchestrator::new(ws.dirs.clone());
    let report = orchestrator
        .apply(name, &facts)
        .with_context(|| format!("failed to apply profile '{name}'"))?;

    if json {
        return print_json(&report);
    }
    println!("Active profile: {}", report.profile.name);
    print_list("Created", &report.created_resources);
    Ok(())
}

fn active(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let active = ProfileStore::new(&ws.dirs)
        .active_name()
        .context("failed to read active profile")?;

    if json {
        return print_json(&serde_json::json!({ "active": active }));
    }
    match active {
        Some(name) => println!("{name}"),
        None => println!("No active profile."),
    }
    Ok(())
}

fn create(ws: &Workspace, file: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let profile = ProfileDefinition::parse(&data).map_err(|fault| NinjaError::ProfileLoad {
        path: file.to_path_buf(),
        fault,
    })?;
    let path = ProfileStore::new(&ws.dirs)
        .create(&profile)
        .context("failed to write profile")?;

    if json {
        return print_json(&serde_json::json!({ "name": profile.name, "path": path }));
    }
    println!("Created profile '{}' at {}", profile.name, path.display());
    Ok(())
}
