// SPDX-License-Identifier: MPL-2.0-or-later
//! Command line configuration file

use anyhow::{Context, Result};
use linklist_core::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of the optional `--config` TOML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub resolver: ResolverConfig,
    pub href: HrefConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrefConfig {
    /// Pattern for document links; `{type}`, `{id}`, `{uid}` and `{slug}` are substituted
    pub document_pattern: String,
}

impl Default for HrefConfig {
    fn default() -> Self {
        Self {
            document_pattern: "/{type}/{uid}".to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("invalid configuration")
    }

    /// Load from `path`, or defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&input).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.resolver, ResolverConfig::default());
        assert_eq!(config.href.document_pattern, "/{type}/{uid}");
    }

    #[test]
    fn test_full_file() {
        let config = CliConfig::from_toml_str(
            r#"
            document_type = "menu"
            fragment_name = "items"

            [href]
            document_pattern = "/{slug}"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.document_type, "menu");
        assert_eq!(config.resolver.fragment_name, "items");
        assert_eq!(config.href.document_pattern, "/{slug}");
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"fragment_name = "nav""#).unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.resolver.fragment_name, "nav");
        assert_eq!(config.resolver.document_type, "link-list");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }
}
