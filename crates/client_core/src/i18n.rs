//! Label lookup used when a controller derives its subject.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context, Result};

pub trait Translator: Send + Sync {
    /// Resolves `key` synchronously. Unknown keys resolve to the key itself.
    fn instant(&self, key: &str) -> String;
}

/// Flat `key -> text` table, loadable from nested TOML tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn english() -> Self {
        let mut catalog = Self::default();
        catalog.insert("messenger.EDIT_PROFILE", "Edit profile");
        catalog.insert("messenger.MY_THREEMA_ID", "My Threema ID");
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a catalog such as
    ///
    /// ```toml
    /// [messenger]
    /// EDIT_PROFILE = "Edit profile"
    /// ```
    ///
    /// into dotted keys (`messenger.EDIT_PROFILE`).
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(raw).context("failed to parse translation catalog")?;
        let mut catalog = Self::default();
        flatten_into(&mut catalog.entries, "", &table)?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read translation catalog '{}'", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid translation catalog '{}'", path.display()))
    }
}

impl Translator for Catalog {
    fn instant(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn flatten_into(
    entries: &mut HashMap<String, String>,
    prefix: &str,
    table: &toml::Table,
) -> Result<()> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::String(text) => {
                entries.insert(key, text.clone());
            }
            toml::Value::Table(nested) => flatten_into(entries, &key, nested)?,
            other => {
                return Err(anyhow!(
                    "translation '{key}' must be a string, found {}",
                    other.type_str()
                ))
            }
        }
    }
    Ok(())
}
