//! Payment processor environments

use serde::{Deserialize, Serialize};

/// Environment the native SDK talks to
///
/// Parsed case-insensitively from the `environment` configuration key.
/// Anything unrecognised falls back to [`Environment::Test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    #[serde(rename = "test")]
    Test,
    #[serde(rename = "live-eu")]
    LiveEurope,
    #[serde(rename = "live-us")]
    LiveUnitedStates,
    #[serde(rename = "live-au")]
    LiveAustralia,
    #[serde(rename = "live-apse")]
    LiveApse,
    #[serde(rename = "live-in")]
    LiveIndia,
}

impl Environment {
    /// Map an environment name to a variant, defaulting to `Test`
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "live" | "live-eu" => Environment::LiveEurope,
            "live-us" => Environment::LiveUnitedStates,
            "live-au" => Environment::LiveAustralia,
            "live-apse" => Environment::LiveApse,
            "live-in" => Environment::LiveIndia,
            _ => Environment::Test,
        }
    }

    /// Canonical name of this environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::LiveEurope => "live-eu",
            Environment::LiveUnitedStates => "live-us",
            Environment::LiveAustralia => "live-au",
            Environment::LiveApse => "live-apse",
            Environment::LiveIndia => "live-in",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
