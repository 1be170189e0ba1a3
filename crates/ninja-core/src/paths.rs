use crate::error::{NinjaError, Result};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const NINJA_DIR: &str = ".cp-ninja";

pub const PROFILES_DIR: &str = "profiles";
pub const AGENTS_DIR: &str = "resources/agents";
pub const SKILLS_DIR: &str = "skills";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ACTIVE_PROFILE_FILE: &str = "active-profile";
pub const TEMPLATES_DIR: &str = "templates";
pub const CONFIGS_DIR: &str = "configs";

pub const PACKAGE_MANIFEST: &str = "package.json";

// ---------------------------------------------------------------------------
// ResourceDirectories
// ---------------------------------------------------------------------------

/// The four directories a session works against. Resolved once and handed to
/// every component that touches disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDirectories {
    pub global_dir: PathBuf,
    pub project_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub agents_dir: PathBuf,
}

impl ResourceDirectories {
    pub fn from_roots(global_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        let global_dir = global_dir.into();
        Self {
            profiles_dir: global_dir.join(PROFILES_DIR),
            agents_dir: global_dir.join(AGENTS_DIR),
            global_dir,
            project_dir: project_dir.into(),
        }
    }

    /// `~/.cp-ninja` for global state, `<workspace>/.cp-ninja` for the project.
    pub fn for_workspace(workspace: &Path) -> Result<Self> {
        let home = home::home_dir().ok_or(NinjaError::HomeNotFound)?;
        Ok(Self::with_global_root(&home.join(NINJA_DIR), workspace))
    }

    pub fn with_global_root(global_dir: &Path, workspace: &Path) -> Self {
        Self::from_roots(global_dir, workspace.join(NINJA_DIR))
    }

    /// Create every directory, idempotent.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            &self.global_dir,
            &self.project_dir,
            &self.profiles_dir,
            &self.agents_dir,
        ] {
            crate::io::ensure_dir(dir)?;
        }
        Ok(())
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{name}.json"))
    }

    pub fn active_profile_path(&self) -> PathBuf {
        self.project_dir.join(ACTIVE_PROFILE_FILE)
    }

    pub fn template_path(&self, language: &str) -> PathBuf {
        self.project_dir
            .join(TEMPLATES_DIR)
            .join(format!("{}.md", resource_stem(language)))
    }

    /// `@scope/pkg` lands at `configs/@scope-pkg.json`.
    pub fn framework_config_path(&self, framework: &str) -> PathBuf {
        self.project_dir
            .join(CONFIGS_DIR)
            .join(format!("{}.json", resource_stem(framework)))
    }

    pub fn personal_skills_dir(&self) -> PathBuf {
        self.global_dir.join(SKILLS_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.global_dir.join(CONFIG_FILE)
    }
}

/// Flatten a language or framework name into a single file stem: path
/// separators and leading dots become `-`, so the file always lands directly
/// in its scaffold directory.
pub fn resource_stem(name: &str) -> String {
    let body = name.trim_start_matches('.');
    let leading = name.len() - body.len();
    "-".repeat(leading) + &body.replace(['/', '\\'], "-")
}

/// True when a name would not survive as a file stem unchanged.
pub fn is_path_like(name: &str) -> bool {
    name.starts_with('.') || name.contains(['/', '\\'])
}

// ---------------------------------------------------------------------------
// Profile name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("profile name pattern is valid")
    })
}

/// Profile names become filename stems, so anything that could escape the
/// profiles directory is rejected.
pub fn validate_profile_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 128 || !name_re().is_match(name) {
        return Err(NinjaError::InvalidProfileName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
