use crate::error::{NinjaError, Result};
use crate::inspector::FactSheet;
use crate::paths::ResourceDirectories;
use crate::presets;
use crate::profile::{ProfileDefinition, ProfileStore};
use crate::recommend::{PresetSuggestion, Recommender};
use crate::scaffold::{self, ScaffoldOutcome};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    /// Presets written on this call; empty when all were already on disk.
    pub seeded: Vec<String>,
}

/// Result of a bootstrap run.
///
/// `success` is false only when initialization failed. An empty suggestion
/// list and failed scaffold writes both leave it true.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    pub success: bool,
    pub applied_presets: Vec<String>,
    pub created_resources: Vec<String>,
    pub errors: Vec<String>,
    pub suggestions: Vec<PresetSuggestion>,
    pub scaffold: Vec<ScaffoldOutcome>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub profile: ProfileDefinition,
    pub created_resources: Vec<String>,
    pub scaffold: Vec<ScaffoldOutcome>,
}

fn created_resources(outcomes: &[ScaffoldOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(ScaffoldOutcome::created)
        .map(ToString::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives one workspace session: directory setup, default seeding,
/// recommendation and applying a profile.
pub struct Orchestrator {
    dirs: ResourceDirectories,
    store: ProfileStore,
    recommender: Recommender,
    presets: Vec<ProfileDefinition>,
    state: SessionState,
}

impl Orchestrator {
    pub fn new(dirs: ResourceDirectories) -> Self {
        Self {
            store: ProfileStore::new(&dirs),
            dirs,
            recommender: Recommender::default(),
            presets: presets::builtin_presets(),
            state: SessionState::Uninitialized,
        }
    }

    pub fn dirs(&self) -> &ResourceDirectories {
        &self.dirs
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Create the directory layout and seed any missing presets. Safe to call
    /// again; a failure leaves the session uninitialized.
    pub fn initialize(&mut self) -> Result<InitReport> {
        self.dirs.ensure()?;
        let seeded = self.store.seed_defaults(&self.presets)?;
        self.state = SessionState::Ready;
        Ok(InitReport { seeded })
    }

    fn ensure_ready(&mut self) -> Result<()> {
        if self.state == SessionState::Uninitialized {
            self.initialize()?;
        }
        Ok(())
    }

    /// Ranked suggestions for `facts`. No state change.
    pub fn suggest_presets(&self, facts: &FactSheet) -> Vec<PresetSuggestion> {
        self.recommender.suggest(facts)
    }

    /// Initialize if needed, apply the top suggestion as the active profile,
    /// then scaffold per-language and per-framework resources.
    pub fn bootstrap(&mut self, facts: &FactSheet) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        if let Err(e) = self.ensure_ready() {
            tracing::warn!(error = %e, "bootstrap initialization failed");
            report.errors.push(format!("bootstrap failed: {e}"));
            return report;
        }

        report.suggestions = self.suggest_presets(facts);
        if let Some(top) = report.suggestions.first() {
            match self.materialize_preset(&top.preset) {
                Ok(()) => {
                    report.applied_presets.push(top.preset.clone());
                    report.created_resources.push(format!("Profile: {}", top.preset));
                }
                Err(e) => {
                    tracing::warn!(preset = %top.preset, error = %e, "failed to apply preset");
                }
            }
        }

        report.scaffold = scaffold::scaffold_for(&self.dirs, facts);
        report
            .created_resources
            .extend(created_resources(&report.scaffold));
        report.success = true;
        report
    }

    /// Write the catalog copy of `preset` and point the project at it.
    fn materialize_preset(&self, preset: &str) -> Result<()> {
        let profile = self
            .presets
            .iter()
            .find(|p| p.name == preset)
            .ok_or_else(|| NinjaError::UnknownPreset(preset.to_string()))?;
        self.store.create(profile)?;
        self.store.set_active(&profile.name)?;
        tracing::info!(profile = %profile.name, "applied preset");
        Ok(())
    }

    /// Switch the project to `name` and scaffold resources for `facts`.
    ///
    /// A preset not yet on disk is written first. Anything else must already
    /// exist in the profile store.
    pub fn apply(&mut self, name: &str, facts: &FactSheet) -> Result<ApplyReport> {
        self.ensure_ready()?;

        if !self.store.exists(name) {
            if let Some(preset) = self.presets.iter().find(|p| p.name == name) {
                self.store.create(preset)?;
            }
        }
        let profile = self
            .store
            .resolve(name)?
            .ok_or_else(|| NinjaError::ProfileNotFound(name.to_string()))?;
        self.store.set_active(&profile.name)?;
        tracing::info!(profile = %profile.name, "applied profile");

        let scaffold = scaffold::scaffold_for(&self.dirs, facts);
        Ok(ApplyReport {
            created_resources: created_resources(&scaffold),
            profile,
            scaffold,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{builtin_presets, FRONTEND_DEVELOPMENT, FULLSTACK_DEVELOPMENT};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn orchestrator(dir: &TempDir) -> Orchestrator {
        Orchestrator::new(ResourceDirectories::with_global_root(
            &dir.path().join("global"),
            &dir.path().join("ws"),
        ))
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn initialize_creates_layout_and_seeds() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        assert_eq!(orch.state(), SessionState::Uninitialized);

        let report = orch.initialize().unwrap();
        assert_eq!(orch.state(), SessionState::Ready);
        assert_eq!(report.seeded.len(), builtin_presets().len());
        assert!(orch.dirs().agents_dir.is_dir());
        assert!(orch.dirs().project_dir.is_dir());
        assert_eq!(orch.store().list().unwrap().len(), builtin_presets().len());

        let again = orch.initialize().unwrap();
        assert!(again.seeded.is_empty());
    }

    #[test]
    fn initialize_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not dir").unwrap();
        let mut orch = Orchestrator::new(ResourceDirectories::with_global_root(
            &blocker.join("global"),
            dir.path(),
        ));

        assert!(matches!(orch.initialize(), Err(NinjaError::DirCreate { .. })));
        assert_eq!(orch.state(), SessionState::Uninitialized);
    }

    #[test]
    fn bootstrap_applies_top_suggestion() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        let facts = FactSheet {
            languages: set(&["typescript"]),
            frameworks: set(&["express", "react"]),
            ..FactSheet::default()
        };

        let report = orch.bootstrap(&facts);
        assert!(report.success);
        assert!(report.errors.is_empty());
        assert_eq!(report.applied_presets, vec![FULLSTACK_DEVELOPMENT]);
        assert_eq!(
            report.created_resources,
            vec![
                "Profile: fullstack-development",
                "Template: typescript",
                "Config: express",
                "Config: react",
            ]
        );
        assert_eq!(
            orch.store().active_name().unwrap().as_deref(),
            Some(FULLSTACK_DEVELOPMENT)
        );
        assert!(orch.dirs().template_path("typescript").exists());
        assert!(orch.dirs().framework_config_path("react").exists());
    }

    #[test]
    fn bootstrap_with_no_suggestions_succeeds_empty() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);

        let report = orch.bootstrap(&FactSheet::default());
        assert!(report.success);
        assert!(report.applied_presets.is_empty());
        assert!(report.created_resources.is_empty());
        assert!(report.errors.is_empty());
        assert_eq!(orch.store().active_name().unwrap(), None);
        assert_eq!(orch.state(), SessionState::Ready);
    }

    #[test]
    fn bootstrap_survives_one_failed_scaffold() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        orch.initialize().unwrap();
        std::fs::create_dir_all(orch.dirs().framework_config_path("vue")).unwrap();

        let facts = FactSheet {
            frameworks: set(&["koa", "vue"]),
            ..FactSheet::default()
        };
        let report = orch.bootstrap(&facts);

        assert!(report.success);
        assert!(report.errors.is_empty());
        assert!(report.created_resources.contains(&"Config: koa".to_string()));
        assert!(!report.created_resources.iter().any(|r| r.contains("vue")));
        assert_eq!(report.scaffold.iter().filter(|o| o.result.is_err()).count(), 1);
    }

    #[test]
    fn bootstrap_reports_initialize_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut orch = Orchestrator::new(ResourceDirectories::with_global_root(
            &blocker.join("global"),
            dir.path(),
        ));

        let report = orch.bootstrap(&FactSheet {
            frameworks: set(&["react"]),
            ..FactSheet::default()
        });
        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("bootstrap failed: failed to create directory"));
        assert!(report.applied_presets.is_empty());
        assert!(report.created_resources.is_empty());
    }

    #[test]
    fn bootstrap_overwrites_the_applied_preset_only() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        orch.initialize().unwrap();
        let mut custom = crate::presets::find_preset(FRONTEND_DEVELOPMENT).unwrap();
        custom.description = "customized".to_string();
        orch.store().create(&custom).unwrap();

        orch.bootstrap(&FactSheet {
            frameworks: set(&["react"]),
            ..FactSheet::default()
        });
        let resolved = orch.store().resolve(FRONTEND_DEVELOPMENT).unwrap().unwrap();
        assert_ne!(resolved.description, "customized");
    }

    #[test]
    fn suggest_presets_is_pure() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir);
        let facts = FactSheet {
            frameworks: set(&["react"]),
            ..FactSheet::default()
        };
        assert_eq!(orch.suggest_presets(&facts), orch.suggest_presets(&facts));
        assert!(!orch.dirs().global_dir.exists());
    }

    #[test]
    fn apply_user_profile() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        orch.initialize().unwrap();
        let mut mine = crate::presets::find_preset("backend-api").unwrap();
        mine.name = "my-api".to_string();
        orch.store().create(&mine).unwrap();

        let report = orch.apply("my-api", &FactSheet::default()).unwrap();
        assert_eq!(report.profile.name, "my-api");
        assert!(report.created_resources.is_empty());
        assert_eq!(orch.store().active_name().unwrap().as_deref(), Some("my-api"));
    }

    #[test]
    fn apply_restores_deleted_preset() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        orch.initialize().unwrap();
        std::fs::remove_file(orch.dirs().profile_path("test-automation")).unwrap();

        let report = orch
            .apply(
                "test-automation",
                &FactSheet {
                    languages: set(&["javascript"]),
                    ..FactSheet::default()
                },
            )
            .unwrap();
        assert_eq!(report.profile.name, "test-automation");
        assert_eq!(report.created_resources, vec!["Template: javascript"]);
    }

    #[test]
    fn apply_unknown_profile_fails_without_switching() {
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(&dir);
        orch.initialize().unwrap();
        orch.store().set_active("backend-api").unwrap();

        assert!(matches!(
            orch.apply("ghost", &FactSheet::default()),
            Err(NinjaError::ProfileNotFound(_))
        ));
        assert_eq!(orch.store().active_name().unwrap().as_deref(), Some("backend-api"));
    }
}
