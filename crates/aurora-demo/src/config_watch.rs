//! Polls `config.ron` for edits while the demo runs.

use std::path::PathBuf;

use aurora_config::{CliArgs, Config};
use tracing::{debug, info};

/// Tracks the on-disk config, kept apart from the CLI-overridden one so
/// command-line flags never read as file changes.
pub struct ConfigWatcher {
    dir: PathBuf,
    on_disk: Config,
}

impl ConfigWatcher {
    pub fn new(dir: PathBuf, on_disk: Config) -> Self {
        Self { dir, on_disk }
    }

    /// Re-read the file. Returns the effective config (CLI overrides
    /// reapplied) when the file changed since the last poll.
    pub fn poll(&mut self, cli: &CliArgs) -> Option<Config> {
        match self.on_disk.reload(&self.dir) {
            Ok(Some(changed)) => {
                self.on_disk = changed;
                let mut effective = self.on_disk.clone();
                effective.apply_cli_overrides(cli);
                info!(time_scale = effective.sky.time_scale, "config change picked up");
                Some(effective)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("config poll skipped: {e}");
                None
            }
        }
    }
}
