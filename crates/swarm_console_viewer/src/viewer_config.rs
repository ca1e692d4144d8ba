use bevy::prelude::*;
use swarm_console::config::parse_bool;
use swarm_console::hex::DEFAULT_HEX_SIZE;
use swarm_console::{ConsoleConfig, ProjectionConfig};

pub(super) const ENV_HEX_SIZE: &str = "SWARM_VIEWER_HEX_SIZE";
pub(super) const ENV_SHOW_LABELS: &str = "SWARM_VIEWER_SHOW_LABELS";
pub(super) const ENV_HEADLESS: &str = "SWARM_VIEWER_HEADLESS";

#[derive(Resource, Clone, Debug, PartialEq)]
pub(super) struct SwarmViewerConfig {
    pub console: ConsoleConfig,
    pub hex_size: f32,
    pub show_labels: bool,
    pub headless: bool,
}

impl Default for SwarmViewerConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            hex_size: DEFAULT_HEX_SIZE,
            show_labels: true,
            headless: false,
        }
    }
}

impl SwarmViewerConfig {
    pub(super) fn projection(&self) -> ProjectionConfig {
        ProjectionConfig {
            hex_size: self.hex_size,
            ..ProjectionConfig::default()
        }
    }
}

pub(super) fn resolve_viewer_config() -> SwarmViewerConfig {
    let console = match ConsoleConfig::from_default_sources() {
        Ok(console) => console,
        Err(err) => {
            eprintln!("warning: invalid console config ({err}); using defaults");
            ConsoleConfig::default()
        }
    };
    load_viewer_config_from(console, |key| std::env::var(key).ok())
}

fn load_viewer_config_from<F>(console: ConsoleConfig, lookup: F) -> SwarmViewerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SwarmViewerConfig {
        console,
        ..SwarmViewerConfig::default()
    };
    if let Some(value) = lookup(ENV_HEX_SIZE).and_then(|raw| raw.trim().parse::<f32>().ok()) {
        if value.is_finite() && value > 0.0 {
            config.hex_size = value;
        }
    }
    if let Some(value) = lookup(ENV_SHOW_LABELS).and_then(|raw| parse_bool(&raw)) {
        config.show_labels = value;
    }
    // Presence alone turns headless on, unless explicitly falsy.
    if let Some(raw) = lookup(ENV_HEADLESS) {
        config.headless = parse_bool(&raw).unwrap_or(true);
    }
    config
}
