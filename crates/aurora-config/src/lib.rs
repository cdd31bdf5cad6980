//! Configuration system for the Aurora sky.
//!
//! Settings persist to disk as RON files and can be overridden from the
//! command line via clap. Unknown fields are ignored and missing fields fall
//! back to defaults, so older config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BodyConfig, Config, DebugConfig, SkyConfig, StarConfig, WorldConfig, default_config_dir,
};
pub use error::ConfigError;
