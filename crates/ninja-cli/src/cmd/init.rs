use crate::output::print_json;
use crate::root::Workspace;
use anyhow::Context;
use ninja_core::orchestrator::Orchestrator;
use ninja_core::presets;

pub fn run(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let mut orchestrator = Orchestrator::new(ws.dirs.clone());
    let report = orchestrator
        .initialize()
        .context("failed to initialize cp-ninja directories")?;

    if json {
        return print_json(&serde_json::json!({
            "globalDir": ws.dirs.global_dir,
            "projectDir": ws.dirs.project_dir,
            "seeded": report.seeded,
        }));
    }

    println!("global:  {}", ws.dirs.global_dir.display());
    println!("project: {}", ws.dirs.project_dir.display());
    for name in presets::preset_names() {
        let status = if report.seeded.iter().any(|s| s == name) {
            "created"
        } else {
            "exists"
        };
        println!("  {status}: profiles/{name}.json");
    }
    Ok(())
}
