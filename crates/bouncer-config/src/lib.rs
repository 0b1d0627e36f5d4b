//! Shared configuration for the bouncer CLI.
//!
//! TOML deployment profiles, credential resolution (env + plaintext +
//! build-time defaults), and translation to `bouncer_core::GatewayConfig`.
//! The CLI adds `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bouncer_core::{GatewayConfig, LogOrder, TlsVerification, Vocabulary};

/// Environment variable consulted for the login password.
pub const PASSWORD_ENV: &str = "BOUNCER_PASSWORD";

/// Environment variable consulted for the login email.
pub const EMAIL_ENV: &str = "BOUNCER_EMAIL";

// ── Build-time defaults ─────────────────────────────────────────────

/// Values baked into the binary at compile time. They fill whatever a
/// profile leaves out, so a single-deployment build needs no config file.
pub mod build {
    pub const API_URL: Option<&str> = option_env!("BOUNCER_API_URL");
    pub const DEVICE_ID: Option<&str> = option_env!("BOUNCER_DEVICE_ID");
    pub const EMAIL: Option<&str> = option_env!("BOUNCER_EMAIL");
    pub const PASSWORD: Option<&str> = option_env!("BOUNCER_PASSWORD");
}

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing {field} for profile '{profile}'")]
    Missing { field: String, profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named deployment profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Select a profile by name, falling back to `default_profile`.
    ///
    /// A missing profile is only an error when it was named explicitly;
    /// otherwise an empty profile is returned so build-time defaults and
    /// CLI flags can fill it in.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let explicit = name.is_some();
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned();

        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if explicit => Err(ConfigError::UnknownProfile { name }),
            None => Ok((name, Profile::default())),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default)]
    pub vocabulary: Vocabulary,

    #[serde(default)]
    pub log_order: LogOrder,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            vocabulary: Vocabulary::default(),
            log_order: LogOrder::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    bouncer_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_refresh_interval() -> u64 {
    bouncer_core::DEFAULT_REFRESH_INTERVAL.as_secs()
}

/// A named deployment: one backend, one device, one login.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://api.example.com/v1").
    pub api_url: Option<String>,

    /// Identifier of the controlled device.
    pub device_id: Option<String>,

    /// Login email.
    pub email: Option<String>,

    /// Login password (plaintext -- prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Status vocabulary override.
    pub vocabulary: Option<Vocabulary>,

    /// Activity log order override.
    pub log_order: Option<LogOrder>,

    /// Session refresh period override, in seconds. 0 disables it.
    pub refresh_interval_secs: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// Copy safe to print: the plaintext password is masked.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bouncer", "bouncer").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bouncer");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file yields
/// the defaults.
///
/// Nested keys come from `BOUNCER_`-prefixed variables split on `__`, e.g.
/// `BOUNCER_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BOUNCER_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the login email: profile, then `BOUNCER_EMAIL`, then build-time.
pub fn resolve_email(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    resolve_email_with(profile, profile_name, |key| std::env::var(key).ok())
}

/// Resolve the login password from the credential chain:
/// `password_env` → `BOUNCER_PASSWORD` → plaintext → build-time.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |key| std::env::var(key).ok())
}

fn resolve_email_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    profile
        .email
        .clone()
        .or_else(|| env(EMAIL_ENV))
        .or_else(|| build::EMAIL.map(String::from))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Some(val) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    // 4. Baked into the binary
    build::PASSWORD
        .map(|pw| SecretString::from(pw.to_owned()))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Build a `GatewayConfig` from a profile and the global defaults -- no
/// CLI flag overrides.
pub fn profile_to_gateway_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<GatewayConfig, ConfigError> {
    let raw_url = profile
        .api_url
        .as_deref()
        .or(build::API_URL)
        .ok_or_else(|| ConfigError::Missing {
            field: "api_url".into(),
            profile: profile_name.into(),
        })?;
    let api_url = parse_api_url(raw_url)?;

    let device_id = profile
        .device_id
        .as_deref()
        .or(build::DEVICE_ID)
        .ok_or_else(|| ConfigError::Missing {
            field: "device_id".into(),
            profile: profile_name.into(),
        })?;

    let email = resolve_email(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let mut config = GatewayConfig::new(api_url, device_id, email, password);
    config.tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval = Duration::from_secs(
        profile
            .refresh_interval_secs
            .unwrap_or(defaults.refresh_interval_secs),
    );
    config.vocabulary = profile.vocabulary.unwrap_or(defaults.vocabulary);
    config.log_order = profile.log_order.unwrap_or(defaults.log_order);
    Ok(config)
}

/// Parse a backend base URL. Only http(s) is accepted.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
