use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const SKILL_FILE: &str = "SKILL.md";
const BUILTIN_PREFIX: &str = "builtin:";
const FRONTMATTER_FENCE: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Builtin,
    Personal,
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillSource::Builtin => "builtin",
            SkillSource::Personal => "personal",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub dir: PathBuf,
    pub skill_file: PathBuf,
    pub source: SkillSource,
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Split `---\n<yaml>\n---\n<body>` into its YAML block and body.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix(FRONTMATTER_FENCE)?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// The document body with any leading frontmatter block removed.
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content)
        .map(|(_, body)| body.trim_start_matches(['\r', '\n']))
        .unwrap_or(content)
}

fn read_skill(dir: &Path, source: SkillSource) -> Result<Option<Skill>> {
    let skill_file = dir.join(SKILL_FILE);
    let Some(content) = crate::io::read_optional(&skill_file)? else {
        return Ok(None);
    };
    let meta = split_frontmatter(&content)
        .and_then(|(yaml, _)| match serde_yaml::from_str::<Frontmatter>(yaml) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!(path = %skill_file.display(), error = %e, "bad skill frontmatter");
                None
            }
        })
        .unwrap_or_default();
    let fallback_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Some(Skill {
        name: meta.name.unwrap_or(fallback_name),
        description: meta.description.unwrap_or_default(),
        dir: dir.to_path_buf(),
        skill_file,
        source,
    }))
}

/// Every directory under `dir` (down to `max_depth` levels) holding a
/// `SKILL.md`, sorted by name. A missing `dir` yields nothing.
pub fn find_skills_in_dir(dir: &Path, source: SkillSource, max_depth: usize) -> Result<Vec<Skill>> {
    let mut skills = Vec::new();
    collect(dir, source, max_depth, &mut skills)?;
    skills.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(skills)
}

fn collect(dir: &Path, source: SkillSource, depth: usize, out: &mut Vec<Skill>) -> Result<()> {
    if depth == 0 || !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        match read_skill(&path, source)? {
            Some(skill) => out.push(skill),
            None => collect(&path, source, depth - 1, out)?,
        }
    }
    Ok(())
}

/// Find a skill by directory name. Personal skills shadow built-ins unless
/// the name carries the `builtin:` prefix.
pub fn resolve_skill(
    name: &str,
    builtin_dir: Option<&Path>,
    personal_dir: &Path,
) -> Result<Option<Skill>> {
    let (name, allow_personal) = match name.strip_prefix(BUILTIN_PREFIX) {
        Some(stripped) => (stripped, false),
        None => (name, true),
    };
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Ok(None);
    }
    if allow_personal {
        if let Some(skill) = read_skill(&personal_dir.join(name), SkillSource::Personal)? {
            return Ok(Some(skill));
        }
    }
    match builtin_dir {
        Some(dir) => read_skill(&dir.join(name), SkillSource::Builtin),
        None => Ok(None),
    }
}
