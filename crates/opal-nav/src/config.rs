//! Navigation configuration and capability flags.

use serde::Deserialize;

use opal_types::Result;

/// Navigation feature configuration (from the toolkit's nav.toml).
///
/// The `*_supported` flags are capability-probe results fed in by the
/// embedding environment; the `*_enabled` flags are policy choices.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Move the ambient base directory to follow the active page.
    pub dynamic_base_enabled: bool,
    /// Probe result: can the environment rewrite the ambient base?
    pub dynamic_base_supported: bool,
    /// Probe result: is the history push-state API available?
    pub push_state_supported: bool,
    /// React to native hash-change signals.
    pub hash_listening_enabled: bool,
    /// Title used for entries whose page supplies none.
    pub default_title: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            dynamic_base_enabled: true,
            dynamic_base_supported: true,
            push_state_supported: true,
            hash_listening_enabled: true,
            default_title: String::new(),
        }
    }
}

impl NavConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The capability subset the router consults.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            push_state_supported: self.push_state_supported,
            dynamic_base_enabled: self.dynamic_base_enabled,
            dynamic_base_supported: self.dynamic_base_supported,
            hash_listening_enabled: self.hash_listening_enabled,
        }
    }
}

/// Environment capability flags consulted per navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub push_state_supported: bool,
    pub dynamic_base_enabled: bool,
    pub dynamic_base_supported: bool,
    pub hash_listening_enabled: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        NavConfig::default().capabilities()
    }
}
