//! CodeMaker CLI configuration.
//!
//! Service settings come from an optional `codemaker.toml` in the current
//! directory; missing values use the reference defaults. The API key is read
//! from `CODEMAKER_API_KEY`, falling back to the dotenv-style file
//! `~/.codemaker/config` written by `codemaker configure`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::codemaker::client::DEFAULT_ENDPOINT;
use crate::error::CodemakerError;
use crate::lifecycle::{PollPolicy, PollSettings};

pub const API_KEY_VAR: &str = "CODEMAKER_API_KEY";
pub const ENDPOINT_VAR: &str = "CODEMAKER_ENDPOINT";
const SETTINGS_FILE: &str = "codemaker.toml";

/// Top-level settings loaded from `codemaker.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CodemakerConfig {
    /// Base URL of the service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Backoff and timeout for job polling.
    #[serde(default)]
    pub polling: PollSettings,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for CodemakerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            polling: PollSettings::default(),
        }
    }
}

impl CodemakerConfig {
    /// Loads `codemaker.toml` from the current directory, or defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(SETTINGS_FILE))?;

        // The environment takes precedence over the file for the endpoint.
        if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<CodemakerConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.polling.clone().into()
    }
}

/// `~/.codemaker/config`.
pub fn credentials_path() -> Result<PathBuf, CodemakerError> {
    dirs::home_dir()
        .map(|home| home.join(".codemaker").join("config"))
        .ok_or_else(|| {
            CodemakerError::Configuration("failed to load configuration: no user home dir found".into())
        })
}

/// Resolves the API key from the environment, then the credentials file.
pub fn resolve_api_key() -> Result<String, CodemakerError> {
    let from_env = std::env::var(API_KEY_VAR).ok();
    match from_env.filter(|k| !k.is_empty()) {
        Some(key) => Ok(key),
        None => resolve_api_key_from(None, &credentials_path()?),
    }
}

/// Key resolution with the environment value and file location injected.
pub fn resolve_api_key_from(env_value: Option<String>, file: &Path) -> Result<String, CodemakerError> {
    if let Some(key) = env_value.filter(|k| !k.is_empty()) {
        return Ok(key);
    }

    let entries = dotenvy::from_path_iter(file).map_err(|e| {
        CodemakerError::Configuration(format!(
            "failed to load configuration from {}: {e}",
            file.display()
        ))
    })?;

    for entry in entries {
        let (key, value) = entry.map_err(|e| {
            CodemakerError::Configuration(format!("malformed {}: {e}", file.display()))
        })?;
        if key == API_KEY_VAR && !value.is_empty() {
            return Ok(value);
        }
    }

    Err(CodemakerError::Configuration(format!("failed to resolve {API_KEY_VAR}")))
}

/// Stores `api_key` in the credentials file, creating its directory.
pub fn write_credentials(file: &Path, api_key: &str) -> Result<(), CodemakerError> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(CodemakerError::Configuration("the API key must not be empty".into()));
    }
    if api_key.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        return Err(CodemakerError::Configuration(
            "the API key must not contain quotes or whitespace".into(),
        ));
    }

    if let Some(dir) = file.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CodemakerError::io(dir, e))?;
    }
    std::fs::write(file, format!("{API_KEY_VAR}='{api_key}'\n"))
        .map_err(|e| CodemakerError::io(file, e))?;

    // Owner read/write only on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| CodemakerError::io(file, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_values() {
        let config = CodemakerConfig::default();
        assert_eq!(config.endpoint, "https://api.codemaker.ai");
        assert_eq!(config.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            endpoint = "http://localhost:8080"

            [polling]
            max_delay_ms = 5000
            timeout_secs = 30
        "#;
        let config: CodemakerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080");
        let policy = config.poll_policy();
        assert_eq!(policy.max_delay, Duration::from_secs(5));
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.non_exponent_retries, 8);
    }

    #[test]
    fn missing_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodemakerConfig::load_from(&dir.path().join("codemaker.toml")).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn invalid_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codemaker.toml");
        std::fs::write(&path, "polling = 3").unwrap();
        let err = CodemakerConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn environment_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config");
        write_credentials(&file, "from-file").unwrap();
        let key = resolve_api_key_from(Some("from-env".into()), &file).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn empty_environment_key_falls_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".codemaker").join("config");
        write_credentials(&file, "  sk-123  ").unwrap();
        let key = resolve_api_key_from(Some(String::new()), &file).unwrap();
        assert_eq!(key, "sk-123");
    }

    #[test]
    fn no_key_anywhere_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_api_key_from(None, &dir.path().join("config")).unwrap_err();
        assert!(matches!(err, CodemakerError::Configuration(_)));

        let file = dir.path().join("other");
        std::fs::write(&file, "SOMETHING_ELSE=1\n").unwrap();
        let err = resolve_api_key_from(None, &file).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: failed to resolve CODEMAKER_API_KEY");
    }

    #[cfg(unix)]
    #[test]
    fn credentials_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".codemaker").join("config");
        write_credentials(&file, "sk-secret").unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn credentials_live_under_home() {
        if let Some(home) = dirs::home_dir() {
            let path = credentials_path().unwrap();
            assert_eq!(path, home.join(".codemaker").join("config"));
        }
    }

    #[test]
    fn rejects_unusable_keys() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config");
        assert!(write_credentials(&file, "   ").is_err());
        assert!(write_credentials(&file, "a b").is_err());
        assert!(!file.exists());
    }
}
