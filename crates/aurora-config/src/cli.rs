//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Config-overriding command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. Binaries embed this
/// with `#[command(flatten)]` next to their own flags.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Day/night cycle length in minutes.
    #[arg(long)]
    pub cycle_minutes: Option<f32>,

    /// Normalized start time (0 = midnight, 0.5 = noon).
    #[arg(long)]
    pub start_time: Option<f32>,

    /// Clock speed multiplier.
    #[arg(long)]
    pub time_scale: Option<f32>,

    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(minutes) = args.cycle_minutes {
            self.sky.cycle_minutes = minutes;
        }
        if let Some(start) = args.start_time {
            self.sky.start_time = start;
        }
        if let Some(scale) = args.time_scale {
            self.sky.time_scale = scale;
        }
        if let Some(rd) = args.render_distance {
            self.world.render_distance = rd;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            cycle_minutes: Some(2.0),
            render_distance: Some(4),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.sky.cycle_minutes, 2.0);
        assert_eq!(config.world.render_distance, 4);
        // Non-overridden fields retain defaults
        assert_eq!(config.sky.start_time, 0.25);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
