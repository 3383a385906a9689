//! Settings loading.
//!
//! Settings come from `HABITAT_*` environment variables (a `.env` file is
//! read first when present) or from a JSON document shaped like
//! [`Settings`]:
//!
//! ```text
//! HABITAT_ENABLE_STREAKS=true
//! HABITAT_ENABLE_DAILY_NOTES=1
//! HABITAT_BUILD_MODE=premium
//! ```

use habitat_features::flags;
use habitat_plugin::config::{BuildMode, Settings};
use thiserror::Error;

/// Prefix of every recognised environment variable.
pub const ENV_PREFIX: &str = "HABITAT_";

const BUILD_MODE_VAR: &str = "HABITAT_BUILD_MODE";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A flag variable did not hold a boolean.
    #[error("invalid value {value:?} for {var}")]
    InvalidFlag {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },
    /// The build mode variable was not `standard` or `premium`.
    #[error("unknown build mode {0:?}")]
    InvalidBuildMode(String),
    /// The JSON document was malformed.
    #[error("malformed settings document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returns the build mode implied by the compiled cargo features.
#[must_use]
pub fn compiled_build_mode() -> BuildMode {
    if cfg!(feature = "premium") {
        BuildMode::Premium
    } else {
        BuildMode::Standard
    }
}

/// Loads settings from the process environment, after reading `.env`.
pub fn from_env() -> Result<Settings, SettingsError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    from_vars(std::env::vars())
}

/// Builds settings from `(name, value)` pairs. Unrelated variables are ignored.
pub fn from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Settings, SettingsError> {
    let mut settings = Settings {
        build_mode: compiled_build_mode(),
        ..Settings::default()
    };

    for (var, value) in vars {
        if var == BUILD_MODE_VAR {
            settings.build_mode = parse_build_mode(&value)?;
            continue;
        }

        let Some(name) = var.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let name = name.to_ascii_lowercase();
        if !name.starts_with("enable_") {
            continue;
        }

        let enabled = parse_bool(&value).ok_or_else(|| SettingsError::InvalidFlag {
            var: var.clone(),
            value: value.clone(),
        })?;
        if !flags::ALL.contains(&name.as_str()) {
            tracing::warn!(flag = %name, "unknown feature flag");
        }
        settings.flags.insert(name, enabled);
    }

    Ok(settings)
}

/// Parses a JSON settings document.
pub fn from_json(json: &str) -> Result<Settings, SettingsError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_build_mode(value: &str) -> Result<BuildMode, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "standard" => Ok(BuildMode::Standard),
        "premium" => Ok(BuildMode::Premium),
        _ => Err(SettingsError::InvalidBuildMode(value.to_owned())),
    }
}
