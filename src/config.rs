//! YAML configuration
//!
//! Everything has a default, so the gateway runs without a config file:
//! port names match the stock Platform M+ and the Midi page carries the
//! stock CC assignment table.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub midi: MidiConfig,

    /// One entry per strip fader on the Midi page
    #[serde(default = "default_cc_table")]
    pub midi_page: Vec<CcAssignment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MidiConfig {
    /// Substring matched against available input port names
    #[serde(default = "default_surface_port")]
    pub input_port: String,
    /// Substring matched against available output port names
    #[serde(default = "default_surface_port")]
    pub output_port: String,
    /// Secondary output carrying the Midi page's CC stream
    #[serde(default = "default_cc_port")]
    pub cc_output_port: String,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            input_port: default_surface_port(),
            output_port: default_surface_port(),
            cc_output_port: default_cc_port(),
        }
    }
}

/// A Midi page fader assignment: label shown on the display, CC it drives
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CcAssignment {
    pub title: String,
    pub cc: u8,
}

fn default_surface_port() -> String {
    "Platform M+".to_string()
}

fn default_cc_port() -> String {
    "Icon CC".to_string()
}

fn default_cc_table() -> Vec<CcAssignment> {
    [
        ("Mod wheel", 1),
        ("Expression", 11),
        ("Breath Ctrl", 2),
        ("CC16", 16),
        ("CC17", 17),
        ("CC18", 18),
        ("CC19", 19),
        ("CC20", 20),
    ]
    .into_iter()
    .map(|(title, cc)| CcAssignment {
        title: title.to_string(),
        cc,
    })
    .collect()
}

impl AppConfig {
    /// Load from a YAML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::with_defaults());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut cfg: AppConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if cfg.midi_page.is_empty() {
            cfg.midi_page = default_cc_table();
        }
        Ok(cfg)
    }

    pub fn with_defaults() -> Self {
        Self {
            midi: MidiConfig::default(),
            midi_page: default_cc_table(),
        }
    }
}
