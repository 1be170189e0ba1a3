use crate::config::{DetectionConfig, TeamMarker};
use crate::paths::PACKAGE_MANIFEST;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Detection tables
// ---------------------------------------------------------------------------

/// Dependency name → framework it signals.
pub const BUILTIN_FRAMEWORKS: &[(&str, &str)] = &[
    ("react", "react"),
    ("vue", "vue"),
    ("angular", "angular"),
    ("@angular/core", "angular"),
    ("express", "express"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("@nestjs/core", "nest"),
    ("jest", "jest"),
    ("mocha", "mocha"),
    ("cypress", "cypress"),
    ("playwright", "playwright"),
    ("@playwright/test", "playwright"),
    ("vitest", "vitest"),
];

pub const FRONTEND_FRAMEWORKS: &[&str] = &["react", "vue", "angular"];
pub const BACKEND_FRAMEWORKS: &[&str] = &["express", "fastify", "koa", "nest"];

/// Marker file → team indicator name. Several files may share an indicator.
pub const BUILTIN_TEAM_MARKERS: &[(&str, &str)] = &[
    (".editorconfig", "editorconfig"),
    (".eslintrc", "eslintrc"),
    (".eslintrc.json", "eslintrc"),
    (".eslintrc.js", "eslintrc"),
    (".eslintrc.yml", "eslintrc"),
    ("eslint.config.js", "eslintrc"),
    (".prettierrc", "prettierrc"),
    (".prettierrc.json", "prettierrc"),
];

pub const TYPED_LANGUAGE: &str = "typescript";
pub const BASELINE_LANGUAGE: &str = "javascript";
const TYPED_LANGUAGE_MARKER: &str = "tsconfig.json";
const TYPED_TOOLCHAIN_DEPENDENCY: &str = "typescript";
const UNTYPED_SOURCE_MARKER: &str = "jsconfig.json";

// ---------------------------------------------------------------------------
// PackageManifest
// ---------------------------------------------------------------------------

/// The dependency declarations of a workspace's `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dev_dependencies: BTreeMap<String, Value>,
}

/// `"dependencies": null` reads as no dependencies.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PackageManifest {
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    pub fn has_any_dependency(&self) -> bool {
        !self.dependencies.is_empty() || !self.dev_dependencies.is_empty()
    }
}

/// Where the inspector gets dependency declarations from. Implementations
/// never fail: an absent or unreadable manifest is an empty one.
pub trait ManifestSource {
    fn read_manifest(&self, workspace: &Path) -> PackageManifest;
}

/// Reads `<workspace>/package.json` from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJson;

impl ManifestSource for PackageJson {
    fn read_manifest(&self, workspace: &Path) -> PackageManifest {
        let path = workspace.join(PACKAGE_MANIFEST);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "manifest unreadable");
                }
                return PackageManifest::default();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "manifest unparsable");
            PackageManifest::default()
        })
    }
}

// ---------------------------------------------------------------------------
// FactSheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Frontend,
    Backend,
    #[default]
    Unknown,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Frontend => "frontend",
            ProjectType::Backend => "backend",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the inspector learned about a workspace.
///
/// `project_type` is advisory; whether a workspace is full-stack is decided by
/// the recommender from the framework set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheet {
    #[serde(default)]
    pub languages: BTreeSet<String>,
    #[serde(default)]
    pub frameworks: BTreeSet<String>,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub recent_activity: Vec<String>,
    #[serde(default)]
    pub team_indicators: Vec<String>,
}

impl FactSheet {
    pub fn has_any_framework(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|f| self.frameworks.contains(*f))
    }

    pub fn has_recent_activity(&self, candidates: &[&str]) -> bool {
        self.recent_activity
            .iter()
            .any(|a| candidates.contains(&a.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

pub fn detect_frameworks(manifest: &PackageManifest, extra: &[String]) -> BTreeSet<String> {
    let mut frameworks: BTreeSet<String> = BUILTIN_FRAMEWORKS
        .iter()
        .filter(|(dep, _)| manifest.declares(dep))
        .map(|(_, framework)| framework.to_string())
        .collect();
    frameworks.extend(
        extra
            .iter()
            .filter(|name| !name.trim().is_empty() && manifest.declares(name))
            .cloned(),
    );
    frameworks
}

/// Both languages may be reported at once.
pub fn detect_languages(
    manifest: &PackageManifest,
    typed_marker: bool,
    untyped_marker: bool,
) -> BTreeSet<String> {
    let mut languages = BTreeSet::new();
    if typed_marker || manifest.declares(TYPED_TOOLCHAIN_DEPENDENCY) {
        languages.insert(TYPED_LANGUAGE.to_string());
    }
    if untyped_marker || manifest.has_any_dependency() {
        languages.insert(BASELINE_LANGUAGE.to_string());
    }
    languages
}

/// Frontend wins when both sets match.
pub fn classify_project(frameworks: &BTreeSet<String>) -> ProjectType {
    let any_of = |set: &[&str]| set.iter().any(|f| frameworks.contains(*f));
    if any_of(FRONTEND_FRAMEWORKS) {
        ProjectType::Frontend
    } else if any_of(BACKEND_FRAMEWORKS) {
        ProjectType::Backend
    } else {
        ProjectType::Unknown
    }
}

fn marker_present(workspace: &Path, file: &str) -> bool {
    let path = workspace.join(file);
    match path.try_exists() {
        Ok(present) => present,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "marker check failed");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceInspector
// ---------------------------------------------------------------------------

/// Builds a `FactSheet` from a workspace. Read only.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceInspector<M = PackageJson> {
    manifest: M,
    extra_frameworks: Vec<String>,
    extra_team_markers: Vec<TeamMarker>,
}

impl WorkspaceInspector<PackageJson> {
    pub fn new() -> Self {
        Self::with_manifest_source(PackageJson)
    }
}

impl<M: ManifestSource> WorkspaceInspector<M> {
    pub fn with_manifest_source(manifest: M) -> Self {
        Self {
            manifest,
            extra_frameworks: Vec::new(),
            extra_team_markers: Vec::new(),
        }
    }

    pub fn with_detection(mut self, detection: &DetectionConfig) -> Self {
        self.extra_frameworks = detection.extra_frameworks.clone();
        self.extra_team_markers = detection.extra_team_markers.clone();
        self
    }

    /// Every probe degrades on its own; a broken manifest never hides marker
    /// files and vice versa.
    pub fn analyze(&self, workspace: &Path) -> FactSheet {
        let manifest = self.manifest.read_manifest(workspace);
        let frameworks = detect_frameworks(&manifest, &self.extra_frameworks);
        let languages = detect_languages(
            &manifest,
            marker_present(workspace, TYPED_LANGUAGE_MARKER),
            marker_present(workspace, UNTYPED_SOURCE_MARKER),
        );
        let project_type = classify_project(&frameworks);

        FactSheet {
            languages,
            frameworks,
            project_type,
            // No history mining yet.
            recent_activity: Vec::new(),
            team_indicators: self.team_indicators(workspace),
        }
    }

    pub fn team_indicators(&self, workspace: &Path) -> Vec<String> {
        let builtin = BUILTIN_TEAM_MARKERS.iter().map(|(f, i)| (*f, *i));
        let extra = self
            .extra_team_markers
            .iter()
            .map(|m| (m.file.as_str(), m.indicator.as_str()));

        let mut indicators: Vec<String> = Vec::new();
        for (file, indicator) in builtin.chain(extra) {
            if indicators.iter().any(|i| i == indicator) {
                continue;
            }
            if marker_present(workspace, file) {
                indicators.push(indicator.to_string());
            }
        }
        indicators
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixed(PackageManifest);

    impl ManifestSource for Fixed {
        fn read_manifest(&self, _workspace: &Path) -> PackageManifest {
            self.0.clone()
        }
    }

    fn manifest(value: Value) -> PackageManifest {
        serde_json::from_value(value).unwrap()
    }

    fn write(dir: &TempDir, file: &str, content: &str) {
        std::fs::write(dir.path().join(file), content).unwrap();
    }

    #[test]
    fn detects_react_typescript_project() {
        let dir = TempDir::new().unwrap();
        let inspector = WorkspaceInspector::with_manifest_source(Fixed(manifest(json!({
            "dependencies": { "react": "^18.0.0", "typescript": "^4.8.0" },
            "devDependencies": { "@testing-library/react": "^13.0.0" }
        }))));

        let facts = inspector.analyze(dir.path());
        assert!(facts.frameworks.contains("react"));
        assert!(facts.languages.contains("typescript"));
        assert!(facts.languages.contains("javascript"));
        assert_eq!(facts.project_type, ProjectType::Frontend);
    }

    #[test]
    fn detects_express_backend() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "package.json",
            r#"{"dependencies":{"express":"^4.18.0"},"devDependencies":{"@types/node":"^18.0.0"}}"#,
        );

        let facts = WorkspaceInspector::new().analyze(dir.path());
        assert_eq!(facts.frameworks, BTreeSet::from(["express".to_string()]));
        assert_eq!(facts.languages, BTreeSet::from(["javascript".to_string()]));
        assert_eq!(facts.project_type, ProjectType::Backend);
    }

    #[test]
    fn empty_workspace_is_unknown() {
        let dir = TempDir::new().unwrap();
        let facts = WorkspaceInspector::new().analyze(dir.path());
        assert!(facts.frameworks.is_empty());
        assert!(facts.languages.is_empty());
        assert!(facts.team_indicators.is_empty());
        assert!(facts.recent_activity.is_empty());
        assert_eq!(facts.project_type, ProjectType::Unknown);
    }

    #[test]
    fn broken_manifest_still_reports_markers() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{ this is not json");
        write(&dir, "tsconfig.json", "{}");
        write(&dir, ".editorconfig", "root = true");

        let facts = WorkspaceInspector::new().analyze(dir.path());
        assert!(facts.frameworks.is_empty());
        assert_eq!(facts.languages, BTreeSet::from(["typescript".to_string()]));
        assert_eq!(facts.team_indicators, vec!["editorconfig"]);
    }

    #[test]
    fn manifest_with_wrong_shape_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", r#"{"dependencies":["react"]}"#);
        assert_eq!(PackageJson.read_manifest(dir.path()), PackageManifest::default());
    }

    #[test]
    fn null_dependencies_keep_dev_dependencies() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "package.json",
            r#"{"dependencies":null,"devDependencies":{"jest":"29"}}"#,
        );
        let manifest = PackageJson.read_manifest(dir.path());
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.declares("jest"));

        let facts = WorkspaceInspector::new().analyze(dir.path());
        assert!(facts.frameworks.contains("jest"));
    }

    #[test]
    fn dev_dependencies_count_for_frameworks() {
        let m = manifest(json!({ "devDependencies": { "jest": "29", "@angular/core": "17" } }));
        let frameworks = detect_frameworks(&m, &[]);
        assert_eq!(
            frameworks,
            BTreeSet::from(["angular".to_string(), "jest".to_string()])
        );
    }

    #[test]
    fn extra_frameworks_from_config() {
        let m = manifest(json!({ "dependencies": { "svelte": "4" } }));
        assert!(detect_frameworks(&m, &[]).is_empty());
        let frameworks = detect_frameworks(&m, &["svelte".to_string()]);
        assert!(frameworks.contains("svelte"));
    }

    #[test]
    fn frontend_wins_over_backend() {
        let frameworks = BTreeSet::from(["express".to_string(), "vue".to_string()]);
        assert_eq!(classify_project(&frameworks), ProjectType::Frontend);
    }

    #[test]
    fn untyped_marker_alone_reports_baseline() {
        let langs = detect_languages(&PackageManifest::default(), false, true);
        assert_eq!(langs, BTreeSet::from(["javascript".to_string()]));
    }

    #[test]
    fn team_indicators_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".eslintrc", "{}");
        write(&dir, ".eslintrc.json", "{}");
        write(&dir, ".prettierrc", "{}");
        write(&dir, ".editorconfig", "");

        let indicators = WorkspaceInspector::new().team_indicators(dir.path());
        assert_eq!(indicators, vec!["editorconfig", "eslintrc", "prettierrc"]);
    }

    #[test]
    fn extra_team_markers_from_config() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".stylelintrc", "{}");
        let detection = DetectionConfig {
            extra_frameworks: Vec::new(),
            extra_team_markers: vec![TeamMarker {
                file: ".stylelintrc".to_string(),
                indicator: "stylelintrc".to_string(),
            }],
        };

        let facts = WorkspaceInspector::new()
            .with_detection(&detection)
            .analyze(dir.path());
        assert_eq!(facts.team_indicators, vec!["stylelintrc"]);
    }

    #[test]
    fn fact_sheet_json_shape() {
        let facts = FactSheet {
            frameworks: BTreeSet::from(["react".to_string()]),
            project_type: ProjectType::Frontend,
            ..FactSheet::default()
        };
        let value = serde_json::to_value(&facts).unwrap();
        assert_eq!(value["projectType"], "frontend");
        assert_eq!(value["teamIndicators"], json!([]));
        assert_eq!(value["frameworks"], json!(["react"]));
    }
}
