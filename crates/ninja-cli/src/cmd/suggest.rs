use crate::output::{print_json, print_table};
use crate::root::Workspace;
use ninja_core::recommend::Recommender;

pub fn run(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let facts = super::inspect(ws)?;
    let suggestions = Recommender::default().suggest(&facts);

    if json {
        return print_json(&suggestions);
    }
    if suggestions.is_empty() {
        println!("No presets match this workspace.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = suggestions
        .iter()
        .map(|s| {
            vec![
                s.preset.clone(),
                format!("{:.0}%", s.confidence * 100.0),
                s.reason.clone(),
            ]
        })
        .collect();
    print_table(&["PRESET", "CONFIDENCE", "REASON"], &rows);
    Ok(())
}
