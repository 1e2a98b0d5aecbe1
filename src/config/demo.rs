use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::solutions::{
    ENERGY_OPTIMIZATION, PREDICTIVE_MAINTENANCE, PRODUCTION_SCHEDULING, QUALITY_VISION,
};
use crate::domain::user::Role;

/// Maximum accepted config file size
const MAX_CONFIG_FILE_SIZE: u64 = 256 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Delays of the simulated "processing" steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub chat_response_ms: u64,
    pub refresh_ms: u64,
    pub export_ms: u64,
    pub dialogue_interval_ms: u64,
}

impl TimingConfig {
    pub const MIN_DELAY_MS: u64 = 100;
    pub const MAX_DELAY_MS: u64 = 10_000;

    pub fn sanitize_delay(value: u64) -> u64 {
        value.clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS)
    }

    fn sanitize(&mut self) {
        self.chat_response_ms = Self::sanitize_delay(self.chat_response_ms);
        self.refresh_ms = Self::sanitize_delay(self.refresh_ms);
        self.export_ms = Self::sanitize_delay(self.export_ms);
        self.dialogue_interval_ms = Self::sanitize_delay(self.dialogue_interval_ms);
    }

    pub fn chat_response(&self) -> Duration {
        Duration::from_millis(self.chat_response_ms)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn export(&self) -> Duration {
        Duration::from_millis(self.export_ms)
    }

    pub fn dialogue_interval(&self) -> Duration {
        Duration::from_millis(self.dialogue_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            chat_response_ms: 1500,
            refresh_ms: 1000,
            export_ms: 2000,
            dialogue_interval_ms: 2000,
        }
    }
}

/// Raster output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// TrueType/OpenType font used for text; placeholder bars without one
    pub font_path: Option<PathBuf>,
}

impl RenderConfig {
    pub const MIN_WIDTH: u32 = 320;
    pub const MAX_WIDTH: u32 = 3840;
    pub const MIN_HEIGHT: u32 = 240;
    pub const MAX_HEIGHT: u32 = 2160;

    fn sanitize(&mut self) {
        self.width = self.width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH);
        self.height = self.height.clamp(Self::MIN_HEIGHT, Self::MAX_HEIGHT);
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            font_path: None,
        }
    }
}

/// Demo account offered by the login screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub solutions: Vec<String>,
}

impl AccountConfig {
    fn new(username: &str, name: &str, role: Role, solutions: &[&str]) -> Self {
        Self {
            username: username.to_string(),
            name: name.to_string(),
            role,
            solutions: solutions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![
        AccountConfig::new(
            "admin",
            "Morgan Reyes",
            Role::Admin,
            &[
                PREDICTIVE_MAINTENANCE,
                QUALITY_VISION,
                ENERGY_OPTIMIZATION,
                PRODUCTION_SCHEDULING,
            ],
        ),
        AccountConfig::new(
            "manager",
            "Sam Okafor",
            Role::Manager,
            &[PREDICTIVE_MAINTENANCE, PRODUCTION_SCHEDULING],
        ),
        AccountConfig::new("engineer", "Jordan Lee", Role::Engineer, &[QUALITY_VISION]),
        AccountConfig::new("viewer", "Casey Novak", Role::Viewer, &[]),
    ]
}

/// Complete demo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            render: RenderConfig::default(),
            accounts: default_accounts(),
        }
    }
}

impl DemoConfig {
    /// Parses and sanitizes a TOML document
    ///
    /// # Arguments
    /// * `content` - TOML text
    /// * `origin` - Label used in error messages
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut config: DemoConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        config.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let read_err = |source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(read_err)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "{} is {} bytes, exceeding the {} byte limit",
                path.display(),
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path).map_err(read_err)?;
        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        info!(path = %path.display(), accounts = config.accounts.len(), "loaded demo config");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise returns built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no config file given, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn sanitize(&mut self) {
        self.timing.sanitize();
        self.render.sanitize();
        for account in &mut self.accounts {
            account.username = account.username.trim().to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::Invalid("at least one account is required".to_string()));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.username.is_empty() {
                return Err(ConfigError::Invalid("account username must not be empty".to_string()));
            }
            if !seen.insert(account.username.to_ascii_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate account username '{}'",
                    account.username
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DemoConfig::from_toml_str("", "inline").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.accounts.len(), 4);
    }

    #[test]
    fn partial_timing_keeps_other_defaults() {
        let config = DemoConfig::from_toml_str("[timing]\nchat_response_ms = 800\n", "inline").unwrap();
        assert_eq!(config.timing.chat_response_ms, 800);
        assert_eq!(config.timing.refresh_ms, 1000);
    }

    #[test]
    fn delays_and_dimensions_are_clamped() {
        let toml = r#"
            [timing]
            chat_response_ms = 5
            export_ms = 999999

            [render]
            width = 10
            height = 100000
        "#;
        let config = DemoConfig::from_toml_str(toml, "inline").unwrap();
        assert_eq!(config.timing.chat_response_ms, TimingConfig::MIN_DELAY_MS);
        assert_eq!(config.timing.export_ms, TimingConfig::MAX_DELAY_MS);
        assert_eq!(config.render.width, RenderConfig::MIN_WIDTH);
        assert_eq!(config.render.height, RenderConfig::MAX_HEIGHT);
    }

    #[test]
    fn accounts_are_parsed() {
        let toml = r#"
            [[accounts]]
            username = "ops"
            name = "Ops Lead"
            role = "operator"
            solutions = ["energy-optimization"]
        "#;
        let config = DemoConfig::from_toml_str(toml, "inline").unwrap();
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].role, Role::Operator);
        assert_eq!(config.accounts[0].solutions, vec!["energy-optimization"]);
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let toml = r#"
            [[accounts]]
            username = "ops"
            name = "One"
            role = "viewer"

            [[accounts]]
            username = "OPS"
            name = "Two"
            role = "viewer"
        "#;
        let err = DemoConfig::from_toml_str(toml, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        let toml = r#"
            [[accounts]]
            username = "x"
            name = "X"
            role = "superuser"
        "#;
        let err = DemoConfig::from_toml_str(toml, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timing]\nrefresh_ms = 250").unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.timing.refresh_ms, 250);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(DemoConfig::load_or_default(None).unwrap(), DemoConfig::default());
    }
}
