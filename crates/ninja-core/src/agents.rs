use crate::error::Result;
use crate::paths::ResourceDirectories;
use crate::profile::ProfileDefinition;
use std::path::{Path, PathBuf};

const TEMPLATE_SUFFIX: &str = "-prompt.md";

/// Read-only lookup of agent prompt templates by identifier.
///
/// User templates live in `<global>/resources/agents/<id>-prompt.md`; an
/// optional built-in directory is consulted when the user has none.
#[derive(Debug, Clone)]
pub struct AgentTemplates {
    user_dir: PathBuf,
    builtin_dir: Option<PathBuf>,
}

impl AgentTemplates {
    pub fn new(dirs: &ResourceDirectories) -> Self {
        Self {
            user_dir: dirs.agents_dir.clone(),
            builtin_dir: None,
        }
    }

    pub fn with_builtin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.builtin_dir = Some(dir.into());
        self
    }

    fn candidates(&self, id: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let file = format!("{id}{TEMPLATE_SUFFIX}");
        std::iter::once(self.user_dir.as_path())
            .chain(self.builtin_dir.as_deref())
            .map(move |dir| dir.join(&file))
    }

    /// Template text for `id`, or `None` if neither directory has it.
    pub fn get(&self, id: &str) -> Result<Option<String>> {
        if id.is_empty() || id.contains(['/', '\\']) {
            return Ok(None);
        }
        for path in self.candidates(id) {
            if let Some(text) = crate::io::read_optional(&path)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Every available identifier: user templates first, then built-ins not
    /// shadowed by a user template.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut ids = ids_in(&self.user_dir)?;
        if let Some(builtin) = &self.builtin_dir {
            for id in ids_in(builtin)? {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Agent templates a profile names that cannot be found.
    pub fn missing_for(&self, profile: &ProfileDefinition) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for id in &profile.agent_templates {
            if self.get(id)?.is_none() {
                missing.push(id.clone());
            }
        }
        Ok(missing)
    }
}

fn ids_in(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut ids: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX))
                .map(str::to_string)
        })
        .collect();
    ids.sort();
    Ok(ids)
}
