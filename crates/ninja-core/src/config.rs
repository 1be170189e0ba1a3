use crate::error::Result;
use crate::inspector::{BUILTIN_FRAMEWORKS, BUILTIN_TEAM_MARKERS};
use crate::paths::{self, ResourceDirectories};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DetectionConfig
// ---------------------------------------------------------------------------

/// A marker file whose presence is reported as a team indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMarker {
    pub file: String,
    pub indicator: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Dependency names reported verbatim as frameworks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_frameworks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_team_markers: Vec<TeamMarker>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub detection: DetectionConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            detection: DetectionConfig::default(),
        }
    }
}

impl Config {
    /// Load `<global>/config.yaml`; a missing file yields defaults.
    pub fn load(dirs: &ResourceDirectories) -> Result<Self> {
        Self::load_from(&dirs.config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let Some(data) = crate::io::read_optional(path)? else {
            return Ok(Self::default());
        };
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for name in &self.detection.extra_frameworks {
            if name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "empty name in detection.extra_frameworks".to_string(),
                });
                continue;
            }
            let escapes = name.starts_with(['.', '/'])
                || name.contains('\\')
                || name.split('/').any(|part| part == "..");
            if escapes {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("framework '{name}' looks like a path, not a package name"),
                });
            } else if paths::is_path_like(name) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "framework '{name}' is stored as configs/{}.json",
                        paths::resource_stem(name)
                    ),
                });
            }
            if BUILTIN_FRAMEWORKS.iter().any(|(dep, _)| *dep == name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("framework '{name}' is already detected by default"),
                });
            }
            if !seen.insert(name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("framework '{name}' is listed more than once"),
                });
            }
        }

        for marker in &self.detection.extra_team_markers {
            if marker.file.trim().is_empty() || marker.indicator.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "team marker needs both 'file' and 'indicator'".to_string(),
                });
                continue;
            }
            if Path::new(&marker.file).is_absolute() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "team marker file '{}' must be relative to the workspace",
                        marker.file
                    ),
                });
            }
            if BUILTIN_TEAM_MARKERS.iter().any(|(file, _)| *file == marker.file) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("team marker '{}' is already checked by default", marker.file),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
