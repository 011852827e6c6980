//! Configuration for damper wrappers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{DamperError, Result};
use crate::schedule::Variant;

/// Options for a single wrapper.
///
/// Named, optional fields replace the positional construction arguments
/// (and their type-sniffing argument shifting) of older call-limiter APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamperOptions {
    /// Scheduling variant
    pub variant: Variant,

    /// Minimum spacing (throttle) or quiet period (debounce/wait-last)
    /// between effective executions, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Suppress the trailing execution after a burst ends
    #[serde(default)]
    pub no_trailing: bool,
}

impl DamperOptions {
    /// Options with the given variant and delay, trailing execution on.
    pub fn new(variant: Variant, delay_ms: u64) -> Self {
        Self {
            variant,
            delay_ms,
            no_trailing: false,
        }
    }

    /// Set whether the trailing execution is suppressed.
    pub fn with_no_trailing(mut self, no_trailing: bool) -> Self {
        self.no_trailing = no_trailing;
        self
    }

    /// The delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_delay_ms() -> u64 {
    250
}

/// Named wrapper profiles, typically loaded from a YAML file.
///
/// Lets an application declare its damping in configuration, e.g.
///
/// ```yaml
/// profiles:
///   search_box:
///     variant: debounce
///     delay_ms: 300
///   scroll_sync:
///     variant: throttle
///     delay_ms: 100
///     no_trailing: true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamperProfiles {
    /// Map of profile name to wrapper options
    #[serde(default)]
    pub profiles: HashMap<String, DamperOptions>,
}

impl DamperProfiles {
    /// Create an empty profile set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profiles from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading damper profiles");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load profiles from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| DamperError::Config(format!("Failed to parse damper profiles: {}", e)))
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&DamperOptions> {
        self.profiles.get(name)
    }
}
