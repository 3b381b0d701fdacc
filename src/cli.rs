// Command line interface
//
// Flags layer on top of the config file: anything given here wins.

use std::path::PathBuf;

use clap::Parser;

use crate::app::config::MAX_PARTICLES;
use crate::particles::ParticleConfig;
use crate::theme::ThemePreference;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "folio",
    version,
    about = "Terminal portfolio with persistent light/dark theming and a cursor-following particle field"
)]
pub struct Cli {
    /// Theme preference to apply (and persist) on startup: light, dark or system
    #[arg(long, value_name = "PREFERENCE")]
    pub theme: Option<ThemePreference>,

    /// Number of particles in the field
    #[arg(long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Radius in cells within which particles are pulled toward the pointer
    #[arg(long, value_name = "CELLS", allow_negative_numbers = true)]
    pub max_distance: Option<f32>,

    /// Config file to load instead of the per-user one
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep the theme preference in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH", env = "FOLIO_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply particle flags over the file configuration
    pub fn apply_overrides(&self, config: &mut ParticleConfig) {
        if let Some(count) = self.particles {
            config.particle_count = count.min(MAX_PARTICLES);
        }
        if let Some(distance) = self.max_distance.filter(|d| d.is_finite()) {
            config.max_attraction_distance = distance.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "--theme",
            "Dark",
            "--particles",
            "12",
            "--max-distance",
            "9.5",
            "--ephemeral",
        ])
        .unwrap();

        assert_eq!(cli.theme, Some(ThemePreference::Dark));
        assert_eq!(cli.particles, Some(12));
        assert_eq!(cli.max_distance, Some(9.5));
        assert!(cli.ephemeral);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["folio", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_file_config() {
        let cli = Cli::try_parse_from(["folio", "--particles", "100000", "--max-distance", "-2"])
            .unwrap();
        assert_eq!(cli.max_distance, Some(-2.0));
        let mut config = ParticleConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.particle_count, MAX_PARTICLES);
        assert_eq!(config.max_attraction_distance, 0.0);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["folio"]).unwrap();
        let mut config = ParticleConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, ParticleConfig::default());
    }
}
