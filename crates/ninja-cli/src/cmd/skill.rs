use crate::output::{print_json, print_table};
use crate::root::Workspace;
use anyhow::Context;
use clap::Subcommand;
use ninja_core::skills::{self, SkillSource};
use std::path::{Path, PathBuf};

const SEARCH_DEPTH: usize = 3;

#[derive(Subcommand)]
pub enum SkillSubcommand {
    /// List built-in and personal skills
    List {
        /// Directory of built-in skills
        #[arg(long)]
        skills_dir: Option<PathBuf>,
    },

    /// Print a skill's instructions. Prefix with `builtin:` to skip personal skills.
    Show {
        name: String,
        /// Directory of built-in skills
        #[arg(long)]
        skills_dir: Option<PathBuf>,
    },
}

pub fn run(ws: &Workspace, subcmd: SkillSubcommand, json: bool) -> anyhow::Result<()> {
    let personal = ws.dirs.personal_skills_dir();
    match subcmd {
        SkillSubcommand::List { skills_dir } => list(skills_dir.as_deref(), &personal, json),
        SkillSubcommand::Show { name, skills_dir } => {
            show(&name, skills_dir.as_deref(), &personal, json)
        }
    }
}

fn list(builtin: Option<&Path>, personal: &Path, json: bool) -> anyhow::Result<()> {
    let mut found = skills::find_skills_in_dir(personal, SkillSource::Personal, SEARCH_DEPTH)
        .context("failed to scan personal skills")?;
    if let Some(dir) = builtin {
        found.extend(
            skills::find_skills_in_dir(dir, SkillSource::Builtin, SEARCH_DEPTH)
                .context("failed to scan built-in skills")?,
        );
    }

    if json {
        return print_json(&found);
    }
    if found.is_empty() {
        println!("No skills found.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = found
        .iter()
        .map(|s| vec![s.name.clone(), s.source.to_string(), s.description.clone()])
        .collect();
    print_table(&["NAME", "SOURCE", "DESCRIPTION"], &rows);
    Ok(())
}

fn show(name: &str, builtin: Option<&Path>, personal: &Path, json: bool) -> anyhow::Result<()> {
    let skill = skills::resolve_skill(name, builtin, personal)
        .with_context(|| format!("failed to read skill '{name}'"))?
        .with_context(|| format!("skill '{name}' not found"))?;
    let content = std::fs::read_to_string(&skill.skill_file)
        .with_context(|| format!("failed to read {}", skill.skill_file.display()))?;

    if json {
        return print_json(&serde_json::json!({
            "skill": skill,
            "instructions": skills::strip_frontmatter(&content),
        }));
    }
    print!("{}", skills::strip_frontmatter(&content));
    Ok(())
}
