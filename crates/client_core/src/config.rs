use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "profile.toml";

/// Translation keys of the two profile screen titles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabelKeys {
    pub edit_profile: String,
    pub my_identity: String,
}

impl Default for LabelKeys {
    fn default() -> Self {
        Self {
            edit_profile: "messenger.EDIT_PROFILE".into(),
            my_identity: "messenger.MY_THREEMA_ID".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub labels: LabelKeys,
    pub catalog_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            labels: LabelKeys::default(),
            catalog_path: None,
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings() -> ControllerSettings {
    let mut settings = load_settings_file(Path::new(DEFAULT_SETTINGS_FILE));
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

/// Reads `path`, falling back to defaults when it is missing or malformed.
pub fn load_settings_file(path: &Path) -> ControllerSettings {
    match read_settings_file(path) {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "ignoring malformed settings file");
            ControllerSettings::default()
        }
    }
}

/// Parses `path` without logging; `Ok(None)` when the file does not exist.
pub fn read_settings_file(path: &Path) -> anyhow::Result<Option<ControllerSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    let settings = toml::from_str::<ControllerSettings>(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    Ok(Some(settings))
}

pub fn apply_env_overrides(
    settings: &mut ControllerSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("APP__EDIT_PROFILE_KEY") {
        settings.labels.edit_profile = v;
    }
    if let Some(v) = lookup("APP__MY_IDENTITY_KEY") {
        settings.labels.my_identity = v;
    }

    if let Some(v) = lookup("APP__CATALOG_PATH") {
        settings.catalog_path = (!v.trim().is_empty()).then(|| PathBuf::from(v));
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
