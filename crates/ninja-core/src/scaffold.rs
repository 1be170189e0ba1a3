use crate::error::{NinjaError, Result};
use crate::inspector::FactSheet;
use crate::paths::ResourceDirectories;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ScaffoldResource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldKind {
    LanguageTemplate,
    FrameworkConfig,
}

impl ScaffoldKind {
    pub fn label(self) -> &'static str {
        match self {
            ScaffoldKind::LanguageTemplate => "Template",
            ScaffoldKind::FrameworkConfig => "Config",
        }
    }
}

/// A file the scaffold step wrote under the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldResource {
    pub kind: ScaffoldKind,
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for ScaffoldResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.name)
    }
}

/// One attempt in a best-effort batch. A failure carries the rendered error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldOutcome {
    pub kind: ScaffoldKind,
    pub target: String,
    pub result: std::result::Result<ScaffoldResource, String>,
}

impl ScaffoldOutcome {
    pub fn created(&self) -> Option<&ScaffoldResource> {
        self.result.as_ref().ok()
    }
}

// ---------------------------------------------------------------------------
// Framework config file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkConfig {
    pub framework: String,
    pub created_at: DateTime<Utc>,
    pub recommendations: Vec<String>,
}

impl FrameworkConfig {
    pub fn new(framework: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            framework: framework.to_string(),
            created_at,
            recommendations: vec![
                format!("Use {framework} best practices"),
                format!("Follow {framework} conventions"),
            ],
        }
    }
}

pub fn language_template(language: &str) -> String {
    format!(
        "# {} Development Template\n\nThis template provides best practices for {language} development.\n",
        language.to_uppercase()
    )
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write `<project>/templates/<language>.md`, replacing any previous copy.
pub fn write_language_template(
    dirs: &ResourceDirectories,
    language: &str,
) -> Result<ScaffoldResource> {
    if language.trim().is_empty() {
        return Err(NinjaError::EmptyResourceName);
    }
    let path = dirs.template_path(language);
    crate::io::atomic_write(&path, language_template(language).as_bytes())?;
    Ok(ScaffoldResource {
        kind: ScaffoldKind::LanguageTemplate,
        name: language.to_string(),
        path,
    })
}

/// Write `<project>/configs/<framework>.json`, replacing any previous copy.
/// The file stem is flattened with `paths::resource_stem`; the config body
/// keeps the framework name as declared.
pub fn write_framework_config(
    dirs: &ResourceDirectories,
    framework: &str,
    now: DateTime<Utc>,
) -> Result<ScaffoldResource> {
    if framework.trim().is_empty() {
        return Err(NinjaError::EmptyResourceName);
    }
    let path = dirs.framework_config_path(framework);
    let data = serde_json::to_string_pretty(&FrameworkConfig::new(framework, now))?;
    crate::io::atomic_write(&path, data.as_bytes())?;
    Ok(ScaffoldResource {
        kind: ScaffoldKind::FrameworkConfig,
        name: framework.to_string(),
        path,
    })
}

/// One template per detected language, then one config per detected
/// framework. Each write is independent: a failure is logged and recorded in
/// its outcome, and the batch carries on.
pub fn scaffold_for(dirs: &ResourceDirectories, facts: &FactSheet) -> Vec<ScaffoldOutcome> {
    let now = Utc::now();
    let languages = facts.languages.iter().map(|language| {
        (
            ScaffoldKind::LanguageTemplate,
            language,
            write_language_template(dirs, language),
        )
    });
    let frameworks = facts.frameworks.iter().map(|framework| {
        (
            ScaffoldKind::FrameworkConfig,
            framework,
            write_framework_config(dirs, framework, now),
        )
    });

    languages
        .chain(frameworks)
        .map(|(kind, target, result)| {
            let result = result.map_err(|e| {
                tracing::warn!(resource = %target, kind = kind.label(), error = %e, "scaffold write failed");
                e.to_string()
            });
            ScaffoldOutcome {
                kind,
                target: target.clone(),
                result,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
