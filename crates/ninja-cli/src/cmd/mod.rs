pub mod agent;
pub mod analyze;
pub mod bootstrap;
pub mod config;
pub mod init;
pub mod profile;
pub mod skill;
pub mod suggest;

use crate::root::Workspace;
use anyhow::Context;
use ninja_core::config::Config;
use ninja_core::inspector::{FactSheet, WorkspaceInspector};

/// Analyze the workspace with the detection extensions from `config.yaml`.
pub(crate) fn inspect(ws: &Workspace) -> anyhow::Result<FactSheet> {
    let config = Config::load(&ws.dirs).context("failed to load config")?;
    Ok(WorkspaceInspector::new()
        .with_detection(&config.detection)
        .analyze(&ws.root))
}
