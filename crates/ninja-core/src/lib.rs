pub mod agents;
pub mod config;
pub mod error;
pub mod inspector;
pub mod io;
pub mod orchestrator;
pub mod paths;
pub mod presets;
pub mod profile;
pub mod recommend;
pub mod scaffold;
pub mod skills;

pub use error::{NinjaError, ProfileFault, Result};
