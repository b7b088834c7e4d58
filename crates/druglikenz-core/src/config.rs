//! Screening configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DruglikenzError;

/// Default PubChem PUG REST endpoint.
pub const PUBCHEM_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Name of the project config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "druglikenz.toml";

/// Settings for a screening run.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`DRUGLIKENZ_*`)
/// 3. `--config FILE`, or `druglikenz.toml` in the working directory
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub resolver: ResolverSettings,
    pub remote: RemoteSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Size of the resolution worker pool.
    pub workers: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        ResolverSettings { workers: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Use PubChem to backfill descriptors the local calculator cannot produce.
    pub enabled: bool,
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Linear backoff step between retries.
    pub backoff_ms: u64,
    /// Fetch a display name (first PubChem synonym) for resolved compounds.
    pub lookup_names: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            enabled: true,
            base_url: PUBCHEM_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
            backoff_ms: 250,
            lookup_names: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Compounds per visualization page.
    pub page_size: usize,
    /// Overrides the delimiter implied by the input file extension.
    pub delimiter: Option<char>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            page_size: 30,
            delimiter: None,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workers: Option<usize>,
    pub offline: bool,
    pub lookup_names: bool,
}

const MAX_RETRIES: u32 = 5;

impl ScreenConfig {
    /// Load configuration with layered resolution.
    pub fn load(explicit: Option<&Path>, cli: &CliOverrides) -> Result<Self, DruglikenzError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE_NAME).is_file() => {
                Self::from_file(Path::new(CONFIG_FILE_NAME))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.apply_cli_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DruglikenzError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading config file");
        Self::from_toml(&content, path)
    }

    /// Parse a TOML document. Unknown keys are ignored.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, DruglikenzError> {
        toml::from_str(content).map_err(|e| DruglikenzError::ConfigParse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply `DRUGLIKENZ_*` variables. Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = parse_env(&lookup, "DRUGLIKENZ_WORKERS") {
            self.resolver.workers = v;
        }
        if let Some(offline) = parse_env_flag(&lookup, "DRUGLIKENZ_OFFLINE") {
            self.remote.enabled = !offline;
        }
        if let Some(v) = parse_env(&lookup, "DRUGLIKENZ_REMOTE_TIMEOUT_SECS") {
            self.remote.timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "DRUGLIKENZ_REMOTE_RETRIES") {
            self.remote.max_retries = v;
        }
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(workers) = cli.workers {
            self.resolver.workers = workers;
        }
        if cli.offline {
            self.remote.enabled = false;
        }
        if cli.lookup_names {
            self.remote.lookup_names = true;
        }
    }

    pub fn validate(&self) -> Result<(), DruglikenzError> {
        if self.resolver.workers == 0 {
            return Err(invalid("resolver.workers", "must be at least 1"));
        }
        if self.remote.timeout_secs == 0 {
            return Err(invalid("remote.timeout_secs", "must be greater than 0"));
        }
        if self.remote.max_retries > MAX_RETRIES {
            return Err(invalid(
                "remote.max_retries",
                &format!("must be at most {MAX_RETRIES}"),
            ));
        }
        if self.remote.enabled && self.remote.base_url.trim().is_empty() {
            return Err(invalid("remote.base_url", "must not be empty"));
        }
        if self.export.page_size == 0 {
            return Err(invalid("export.page_size", "must be at least 1"));
        }
        if let Some(d) = self.export.delimiter {
            delimiter_byte(d)?;
        }
        Ok(())
    }
}

/// The single byte a CSV reader or writer splits fields on.
///
/// Rejects anything outside ASCII, plus the quote and newline characters.
pub fn delimiter_byte(c: char) -> Result<u8, DruglikenzError> {
    match c {
        '"' | '\n' | '\r' => {}
        c if c.is_ascii() => return Ok(c as u8),
        _ => {}
    }
    Err(invalid(
        "export.delimiter",
        &format!("{c:?} is not a single ASCII character other than a quote or newline"),
    ))
}

fn invalid(field: &str, reason: &str) -> DruglikenzError {
    DruglikenzError::ConfigInvalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(variable = key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

fn parse_env_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(variable = key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ScreenConfig::default();
        assert_eq!(config.resolver.workers, 4);
        assert!(config.remote.enabled);
        assert_eq!(config.remote.max_retries, 2);
        assert_eq!(config.export.page_size, 30);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml = r#"
            [remote]
            timeout_secs = 3
            unknown_key = "ignored"

            [export]
            delimiter = ";"
        "#;
        let config = ScreenConfig::from_toml(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.remote.timeout_secs, 3);
        assert_eq!(config.remote.base_url, PUBCHEM_BASE_URL);
        assert_eq!(config.export.delimiter, Some(';'));
        assert_eq!(config.resolver.workers, 4);
    }

    #[test]
    fn test_malformed_toml_names_file() {
        let err = ScreenConfig::from_toml("[remote\n", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let mut config =
            ScreenConfig::from_toml("[resolver]\nworkers = 2\n", Path::new("x.toml")).unwrap();
        config.apply_env_overrides(env(&[
            ("DRUGLIKENZ_WORKERS", "6"),
            ("DRUGLIKENZ_OFFLINE", "1"),
            ("DRUGLIKENZ_REMOTE_RETRIES", "not-a-number"),
        ]));
        assert_eq!(config.resolver.workers, 6);
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.max_retries, 2);

        config.apply_cli_overrides(&CliOverrides {
            workers: Some(8),
            ..Default::default()
        });
        assert_eq!(config.resolver.workers, 8);
    }

    #[test]
    fn test_validation_names_field() {
        let mut config = ScreenConfig::default();
        config.resolver.workers = 0;
        match config.validate().unwrap_err() {
            DruglikenzError::ConfigInvalid { field, .. } => assert_eq!(field, "resolver.workers"),
            other => panic!("unexpected error: {other}"),
        }

        let mut config = ScreenConfig::default();
        config.remote.max_retries = 9;
        assert!(config.validate().is_err());

        let mut config = ScreenConfig::default();
        config.export.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut config = ScreenConfig::default();
        config.export.delimiter = Some('é');
        match config.validate().unwrap_err() {
            DruglikenzError::ConfigInvalid { field, .. } => assert_eq!(field, "export.delimiter"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(delimiter_byte('é').is_err());
        assert!(delimiter_byte('"').is_err());
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
    }
}
