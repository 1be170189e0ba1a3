use crate::output::{print_json, print_list};
use crate::root::Workspace;

pub fn run(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let facts = super::inspect(ws)?;
    if json {
        return print_json(&facts);
    }

    println!("Workspace: {}", ws.root.display());
    println!("Project type: {}", facts.project_type);
    print_list("Languages", &facts.languages.iter().cloned().collect::<Vec<_>>());
    print_list("Frameworks", &facts.frameworks.iter().cloned().collect::<Vec<_>>());
    print_list("Team indicators", &facts.team_indicators);
    Ok(())
}
