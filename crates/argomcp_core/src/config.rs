//! Process configuration.
//!
//! Read once at startup from TOML, then overridden by `ARGOCD_MCP_*`
//! environment variables. The result is immutable for the life of the
//! process.

use crate::error::{ConfigError, ConfigResult};
use crate::limits::Limits;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ARGOCD_MCP_";

/// File name searched in the working directory
pub const LOCAL_FILE: &str = "argocd-mcp.toml";

/// Complete configuration
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform connection settings
    pub argocd: ArgoConfig,
    /// Tool server settings
    pub server: ServerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Response ceilings
    pub limits: Limits,
}

/// Platform connection settings.
///
/// Only carried through to the platform client; nothing in this crate
/// opens a connection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgoConfig {
    /// Server address (host:port)
    pub server: String,
    /// Username for session login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for session login
    #[serde(
        serialize_with = "expose_secret",
        deserialize_with = "secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
    /// Bearer token
    #[serde(
        serialize_with = "expose_secret",
        deserialize_with = "secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<SecretString>,
    /// Skip TLS verification
    pub insecure: bool,
    /// Use HTTP without TLS
    pub plaintext: bool,
    /// CA certificate file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,
    /// Use gRPC-Web
    pub grpc_web: bool,
}

impl Default for ArgoConfig {
    fn default() -> Self {
        Self {
            server: "localhost:8080".to_string(),
            username: None,
            password: None,
            token: None,
            insecure: false,
            plaintext: false,
            cert_file: None,
            grpc_web: false,
        }
    }
}

impl ArgoConfig {
    /// Whether either a token or a username/password pair is configured
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.username.is_some() && self.password.is_some())
    }
}

/// Tool server settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Refuse write tools
    pub safe_mode: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per event
    #[default]
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `argomcp_tool=debug`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the first existing file
    /// from [`Config::search_paths`] is used, falling back to defaults.
    /// Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns error if a file cannot be read or decoded, an override is
    /// malformed, or a ceiling is zero.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::search_paths().into_iter().find(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate config files, most specific first
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_FILE)];
        if let Some(path) = Self::default_path() {
            paths.push(path);
        }
        paths
    }

    /// `<config_dir>/argocd-mcp/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("argocd-mcp").join("config.toml"))
    }

    /// Read a TOML config file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or decoded
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Decode TOML text
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a valid config
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Encode as TOML, secrets included
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Encode as TOML with credentials masked by [`mask_secret`]
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails
    pub fn to_masked_toml_string(&self) -> ConfigResult<String> {
        let mut value = toml::Value::try_from(self)?;
        if let Some(argocd) = value.get_mut("argocd").and_then(toml::Value::as_table_mut) {
            for (key, secret) in [("password", &self.argocd.password), ("token", &self.argocd.token)]
            {
                if let Some(secret) = secret {
                    argocd.insert(key.to_string(), toml::Value::String(mask_secret(secret)));
                }
            }
        }
        Ok(toml::to_string_pretty(&value)?)
    }

    /// Write the config to `path`, creating parent directories.
    ///
    /// The file holds credentials, so on Unix it is made owner-only.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or any filesystem step fails
    pub fn write_to(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
        Ok(())
    }

    /// Apply `ARGOCD_MCP_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if a boolean or format override cannot be parsed
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(server) = var("SERVER") {
            self.argocd.server = server;
        }
        if let Some(username) = var("USERNAME") {
            self.argocd.username = Some(username);
        }
        if let Some(password) = var("PASSWORD") {
            self.argocd.password = Some(SecretString::from(password));
        }
        if let Some(token) = var("TOKEN") {
            self.argocd.token = Some(SecretString::from(token));
        }
        if let Some(raw) = var("INSECURE") {
            self.argocd.insecure = parse_bool("INSECURE", &raw)?;
        }
        if let Some(raw) = var("PLAINTEXT") {
            self.argocd.plaintext = parse_bool("PLAINTEXT", &raw)?;
        }
        if let Some(raw) = var("SAFE_MODE") {
            self.server.safe_mode = parse_bool("SAFE_MODE", &raw)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(raw) = var("LOG_FORMAT") {
            self.logging.format = match raw.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{ENV_PREFIX}LOG_FORMAT"),
                        value: raw,
                    });
                }
            };
        }
        Ok(())
    }

    /// Validate the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if any ceiling is zero
    pub fn validate(&self) -> ConfigResult<()> {
        self.limits.validate()
    }
}

/// Show the first and last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &SecretString) -> String {
    let chars: Vec<char> = secret.expose_secret().chars().collect();
    if chars.len() < 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

fn parse_bool(name: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: format!("{ENV_PREFIX}{name}"),
            value: raw.to_string(),
        }),
    }
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

fn expose_secret<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
