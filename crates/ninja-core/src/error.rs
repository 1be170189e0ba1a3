use std::path::PathBuf;
use thiserror::Error;

/// Why a profile file on disk could not be turned into a `ProfileDefinition`.
#[derive(Debug, Error)]
pub enum ProfileFault {
    #[error("missing required field '{0}'")]
    Missing(&'static str),

    #[error("field '{field}' {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("malformed JSON: {0}")]
    Malformed(String),
}

impl ProfileFault {
    /// The offending field, if the fault is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ProfileFault::Missing(field) | ProfileFault::Invalid { field, .. } => Some(*field),
            ProfileFault::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum NinjaError {
    #[error("failed to load profile from {}: {fault}", path.display())]
    ProfileLoad { path: PathBuf, fault: ProfileFault },

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid profile name '{0}': must be letters, digits, '-', '_' or '.', not starting with '.'")]
    InvalidProfileName(String),

    #[error("cannot scaffold a resource with an empty name")]
    EmptyResourceName,

    #[error("failed to create directory {}: {source}", path.display())]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("home directory not found: set HOME or pass an explicit global root")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NinjaError {
    /// The profile field named by a load failure, if any.
    pub fn profile_field(&self) -> Option<&'static str> {
        match self {
            NinjaError::ProfileLoad { fault, .. } => fault.field(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NinjaError>;
