use crate::output::{print_json, print_list};
use crate::root::Workspace;
use ninja_core::orchestrator::Orchestrator;

pub fn run(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let facts = super::inspect(ws)?;
    let mut orchestrator = Orchestrator::new(ws.dirs.clone());
    let report = orchestrator.bootstrap(&facts);

    if json {
        print_json(&report)?;
    } else {
        print_list("Applied presets", &report.applied_presets);
        print_list("Created", &report.created_resources);
        for outcome in &report.scaffold {
            if let Err(e) = &outcome.result {
                println!("  [skipped] {} {}: {e}", outcome.kind.label(), outcome.target);
            }
        }
        for e in &report.errors {
            eprintln!("[error] {e}");
        }
    }

    if !report.success {
        anyhow::bail!("bootstrap did not complete");
    }
    Ok(())
}
