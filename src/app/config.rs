// Application configuration types
//
// This module contains:
// - Event loop timing constants
// - The JSON config file model (`config.json`)
// - Conversion from file settings to the particle field configuration

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;

use crate::particles::ParticleConfig;
use crate::theme::{parse_palette, store::config_dir, DARK_PALETTE, LIGHT_PALETTE};

// ============================================================================
// Constants
// ============================================================================

/// File name of the optional config file in the per-user config directory
pub const CONFIG_FILE: &str = "config.json";

/// Longest the event loop sleeps when no animation frame is scheduled
pub const MAX_EVENT_WAIT: Duration = Duration::from_millis(250);

/// How long a status notice stays visible
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Upper bound on particle count, to keep the canvas readable
pub const MAX_PARTICLES: usize = 500;

// ============================================================================
// Config file model
// ============================================================================

/// Banner text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub name: String,
    pub title: String,
    pub tagline: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            name: "folio".to_string(),
            title: "Full Stack Developer & UX Designer".to_string(),
            tagline: "Move the mouse. The particles are paying attention.".to_string(),
        }
    }
}

/// Particle field settings as written in the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub particle_count: usize,
    pub max_attraction_distance: f32,
    pub particle_size: f32,
    pub particle_opacity: f32,
    pub dark_palette: Vec<String>,
    pub light_palette: Vec<String>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        let defaults = ParticleConfig::default();
        Self {
            particle_count: defaults.particle_count,
            max_attraction_distance: defaults.max_attraction_distance,
            particle_size: defaults.particle_size,
            particle_opacity: defaults.particle_opacity,
            dark_palette: DARK_PALETTE.iter().map(|c| c.to_string()).collect(),
            light_palette: LIGHT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ParticleSettings {
    /// Validate and convert into the runtime configuration
    ///
    /// Out-of-range numbers are clamped; a palette with no valid colors
    /// falls back to the built-in one.
    pub fn to_particle_config(&self) -> ParticleConfig {
        let defaults = ParticleConfig::default();

        ParticleConfig {
            particle_count: self.particle_count.min(MAX_PARTICLES),
            max_attraction_distance: finite_or(
                self.max_attraction_distance,
                defaults.max_attraction_distance,
            )
            .max(0.0),
            particle_size: finite_or(self.particle_size, defaults.particle_size).max(1.0),
            particle_opacity: finite_or(self.particle_opacity, defaults.particle_opacity)
                .clamp(0.0, 1.0),
            dark_palette: palette_or(&self.dark_palette, &defaults.dark_palette, "dark"),
            light_palette: palette_or(&self.light_palette, &defaults.light_palette, "light"),
        }
    }
}

fn palette_or(raw: &[String], fallback: &[Color], name: &str) -> Vec<Color> {
    let parsed = parse_palette(raw);
    if parsed.is_empty() {
        tracing::warn!(palette = name, "No valid colors in palette, using defaults");
        fallback.to_vec()
    } else {
        parsed
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Everything read from `config.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profile: ProfileSettings,
    pub particles: ParticleSettings,
}

/// Load the config file
///
/// An explicit path must exist. Without one, `config.json` in the per-user
/// config directory is used if present, and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_dir() {
            Ok(dir) => {
                let path = dir.join(CONFIG_FILE);
                if !path.exists() {
                    return Ok(AppConfig::default());
                }
                path
            }
            Err(e) => {
                tracing::debug!(error = %e, "No config directory, using default config");
                return Ok(AppConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded config file");
    Ok(config)
}
