use crate::error::{NinjaError, ProfileFault, Result};
use crate::paths::{self, ResourceDirectories};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ProfileDefinition
// ---------------------------------------------------------------------------

/// Triggers an external UI uses to decide when to offer a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoActivate {
    pub file_patterns: Vec<String>,
    pub dependencies: Vec<String>,
    pub keywords: Vec<String>,
}

/// A validated profile. Only `parse` builds one from untrusted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDefinition {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub agent_templates: Vec<String>,
    pub coding_standards: Vec<String>,
    pub auto_activate: AutoActivate,
}

impl ProfileDefinition {
    /// Parse and validate profile JSON.
    ///
    /// `name`, `skills`, `agentTemplates` and `autoActivate` are checked strictly
    /// and the first violation is reported by field. `description`,
    /// `codingStandards` and the `autoActivate` sub-lists fall back to empty.
    /// Bytes that are not UTF-8 are reported as malformed.
    pub fn parse(data: impl AsRef<[u8]>) -> std::result::Result<Self, ProfileFault> {
        let value: Value = serde_json::from_slice(data.as_ref())
            .map_err(|e| ProfileFault::Malformed(e.to_string()))?;
        let Value::Object(obj) = value else {
            return Err(ProfileFault::Malformed(
                "profile must be a JSON object".to_string(),
            ));
        };

        let name = match obj.get("name") {
            None | Some(Value::Null) => return Err(ProfileFault::Missing("name")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(ProfileFault::Invalid {
                    field: "name",
                    reason: "must not be empty".to_string(),
                })
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ProfileFault::Invalid {
                    field: "name",
                    reason: "must be a string".to_string(),
                })
            }
        };
        let skills = required_strings(&obj, "skills")?;
        let agent_templates = required_strings(&obj, "agentTemplates")?;
        let auto_activate = match obj.get("autoActivate") {
            None | Some(Value::Null) => return Err(ProfileFault::Missing("autoActivate")),
            Some(Value::Object(rules)) => AutoActivate {
                file_patterns: lenient_strings(rules, "filePatterns"),
                dependencies: lenient_strings(rules, "dependencies"),
                keywords: lenient_strings(rules, "keywords"),
            },
            Some(_) => {
                return Err(ProfileFault::Invalid {
                    field: "autoActivate",
                    reason: "must be an object".to_string(),
                })
            }
        };

        Ok(Self {
            name,
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            skills,
            agent_templates,
            coding_standards: lenient_strings(&obj, "codingStandards"),
            auto_activate,
        })
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn required_strings(
    obj: &Map<String, Value>,
    field: &'static str,
) -> std::result::Result<Vec<String>, ProfileFault> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ProfileFault::Missing(field)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ProfileFault::Invalid {
                        field,
                        reason: "must contain only strings".to_string(),
                    })
            })
            .collect(),
        Some(_) => Err(ProfileFault::Invalid {
            field,
            reason: "must be an array".to_string(),
        }),
    }
}

fn lenient_strings(obj: &Map<String, Value>, field: &str) -> Vec<String> {
    match obj.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            tracing::debug!(field, "ignoring non-array profile field");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// Owns `<global>/profiles/*.json` and the project's `active-profile` pointer.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles_dir: PathBuf,
    active_pointer: PathBuf,
}

impl ProfileStore {
    pub fn new(dirs: &ResourceDirectories) -> Self {
        Self {
            profiles_dir: dirs.profiles_dir.clone(),
            active_pointer: dirs.active_profile_path(),
        }
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        paths::validate_profile_name(name).is_ok() && self.profile_path(name).exists()
    }

    /// Look up `<profiles>/<name>.json`. `Ok(None)` when the file is absent.
    pub fn resolve(&self, name: &str) -> Result<Option<ProfileDefinition>> {
        paths::validate_profile_name(name)?;
        let path = self.profile_path(name);
        let Some(data) = crate::io::read_optional_bytes(&path)? else {
            return Ok(None);
        };
        ProfileDefinition::parse(data)
            .map(Some)
            .map_err(|fault| NinjaError::ProfileLoad { path, fault })
    }

    /// Write the profile as pretty JSON, replacing any existing file.
    pub fn create(&self, profile: &ProfileDefinition) -> Result<PathBuf> {
        paths::validate_profile_name(&profile.name)?;
        let path = self.profile_path(&profile.name);
        crate::io::atomic_write(&path, profile.to_pretty_json()?.as_bytes())?;
        Ok(path)
    }

    /// Write each profile whose file does not exist yet. Existing files, whether
    /// earlier seeds or user edits, are left alone. Returns the names written.
    pub fn seed_defaults(&self, presets: &[ProfileDefinition]) -> Result<Vec<String>> {
        let mut seeded = Vec::new();
        for preset in presets {
            paths::validate_profile_name(&preset.name)?;
            let path = self.profile_path(&preset.name);
            if crate::io::write_if_missing(&path, preset.to_pretty_json()?.as_bytes())? {
                tracing::info!(profile = %preset.name, "seeded default profile");
                seeded.push(preset.name.clone());
            }
        }
        Ok(seeded)
    }

    /// Names of every `*.json` in the profiles directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.profiles_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.profiles_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// The active profile name, trimmed. `Ok(None)` before the first `set_active`.
    pub fn active_name(&self) -> Result<Option<String>> {
        Ok(crate::io::read_optional(&self.active_pointer)?.map(|s| s.trim().to_string()))
    }

    /// Overwrite the pointer with `name` exactly as given. The profile does not
    /// have to exist.
    pub fn set_active(&self, name: &str) -> Result<()> {
        crate::io::atomic_write(&self.active_pointer, name.as_bytes())
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

    fn store(dir: &TempDir) -> ProfileStore {
        let dirs = ResourceDirectories::with_global_root(&dir.path().join("global"), &dir.path().join("ws"));
        dirs.ensure().unwrap();
        ProfileStore::new(&dirs)
    }

    fn sample(name: &str) -> ProfileDefinition {
        ProfileDefinition {
            name: name.to_string(),
            description: "Frontend development preset".to_string(),
            skills: vec!["test-driven-development".to_string()],
            agent_templates: vec!["react-reviewer".to_string()],
            coding_standards: vec!["frontend-conventions.md".to_string()],
            auto_activate: AutoActivate {
                file_patterns: vec!["*.tsx".to_string()],
                dependencies: vec!["react".to_string()],
                keywords: vec!["component".to_string()],
            },
        }
    }

    fn write_raw(store: &ProfileStore, name: &str, value: &Value) {
        std::fs::write(
            store.profiles_dir().join(format!("{name}.json")),
            serde_json::to_string(value).unwrap(),
        )
        .unwrap();
    }

    fn complete() -> Value {
        json!({
            "name": "test",
            "skills": [],
            "agentTemplates": [],
            "autoActivate": {}
        })
    }

    #[test]
    fn create_then_resolve() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create(&sample("frontend-dev")).unwrap();

        let resolved = store.resolve("frontend-dev").unwrap().unwrap();
        assert_eq!(resolved, sample("frontend-dev"));
    }

    #[test]
    fn resolve_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).resolve("ghost").unwrap().is_none());
    }

    #[test]
    fn resolve_names_each_missing_field() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for field in ["name", "skills", "agentTemplates", "autoActivate"] {
            let mut value = complete();
            value.as_object_mut().unwrap().remove(field);
            write_raw(&store, "test", &value);

            let err = store.resolve("test").unwrap_err();
            assert_eq!(err.profile_field(), Some(field), "field {field}: {err}");
            assert!(err.to_string().contains(field));
            assert!(err.to_string().contains("test.json"));
        }
    }

    #[test]
    fn resolve_rejects_wrong_types() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for (field, bad) in [
            ("name", json!("")),
            ("name", json!(42)),
            ("skills", json!("not-array")),
            ("skills", json!([1, 2])),
            ("agentTemplates", json!({})),
            ("autoActivate", json!([])),
        ] {
            let mut value = complete();
            value[field] = bad;
            write_raw(&store, "test", &value);
            let err = store.resolve("test").unwrap_err();
            assert_eq!(err.profile_field(), Some(field));
        }
    }

    #[test]
    fn resolve_accepts_minimal_profile() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        write_raw(&store, "test", &complete());

        let profile = store.resolve("test").unwrap().unwrap();
        assert_eq!(profile.name, "test");
        assert!(profile.description.is_empty());
        assert!(profile.coding_standards.is_empty());
        assert_eq!(profile.auto_activate, AutoActivate::default());
    }

    #[test]
    fn resolve_malformed_json_is_load_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.profiles_dir().join("broken.json"), "{ not json").unwrap();

        let err = store.resolve("broken").unwrap_err();
        assert!(matches!(
            err,
            NinjaError::ProfileLoad {
                fault: ProfileFault::Malformed(_),
                ..
            }
        ));
        assert_eq!(err.profile_field(), None);
    }

    #[test]
    fn resolve_non_utf8_is_load_error_naming_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.profiles_dir().join("bin.json"), [0xff, 0xfe, b'{', b'}']).unwrap();

        let err = store.resolve("bin").unwrap_err();
        assert!(matches!(
            err,
            NinjaError::ProfileLoad {
                fault: ProfileFault::Malformed(_),
                ..
            }
        ));
        assert!(err.to_string().contains("bin.json"));
    }

    #[test]
    fn resolve_rejects_path_escape() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            store(&dir).resolve("../secrets"),
            Err(NinjaError::InvalidProfileName(_))
        ));
    }

    #[test]
    fn persisted_json_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store.create(&sample("frontend-dev")).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"agentTemplates\""));
        assert!(raw.contains("\"autoActivate\""));
        assert!(raw.contains("\"filePatterns\""));
        assert!(raw.contains('\n'));
    }

    #[test]
    fn create_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create(&sample("p")).unwrap();
        let mut changed = sample("p");
        changed.description = "changed".to_string();
        store.create(&changed).unwrap();
        assert_eq!(store.resolve("p").unwrap().unwrap().description, "changed");
    }

    #[test]
    fn seed_defaults_never_clobbers() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let presets = vec![sample("alpha"), sample("beta")];

        let first = store.seed_defaults(&presets).unwrap();
        assert_eq!(first, vec!["alpha", "beta"]);
        let snapshot: Vec<String> = ["alpha", "beta"]
            .iter()
            .map(|n| std::fs::read_to_string(store.profiles_dir().join(format!("{n}.json"))).unwrap())
            .collect();

        let second = store.seed_defaults(&presets).unwrap();
        assert!(second.is_empty());
        for (n, before) in ["alpha", "beta"].iter().zip(&snapshot) {
            let after = std::fs::read_to_string(store.profiles_dir().join(format!("{n}.json"))).unwrap();
            assert_eq!(&after, before);
        }
    }

    #[test]
    fn seed_defaults_keeps_user_customization() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut custom = sample("alpha");
        custom.description = "mine".to_string();
        store.create(&custom).unwrap();

        store.seed_defaults(&[sample("alpha")]).unwrap();
        assert_eq!(store.resolve("alpha").unwrap().unwrap().description, "mine");
    }

    #[test]
    fn list_returns_sorted_json_stems() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create(&sample("zeta")).unwrap();
        store.create(&sample("alpha")).unwrap();
        std::fs::write(store.profiles_dir().join("notes.txt"), "x").unwrap();
        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn active_pointer_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.active_name().unwrap(), None);

        store.set_active("x").unwrap();
        assert_eq!(store.active_name().unwrap().as_deref(), Some("x"));

        store.set_active("backend-api").unwrap();
        assert_eq!(store.active_name().unwrap().as_deref(), Some("backend-api"));
    }

    #[test]
    fn active_pointer_written_verbatim_read_trimmed() {
        let dir = TempDir::new().unwrap();
        let dirs = ResourceDirectories::with_global_root(&dir.path().join("global"), &dir.path().join("ws"));
        let store = ProfileStore::new(&dirs);

        store.set_active("  spaced\n").unwrap();
        let raw = std::fs::read_to_string(dirs.active_profile_path()).unwrap();
        assert_eq!(raw, "  spaced\n");
        assert_eq!(store.active_name().unwrap().as_deref(), Some("spaced"));
    }
}
