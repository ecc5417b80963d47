//! Configuration for the `stamgr` CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `stamgr_api::SessionConfig`. The API crate itself never
//! reads files or the environment; everything passes through here.

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

use stamgr_api::{ApiVersion, SessionConfig, TlsMode};

const KEYRING_SERVICE: &str = "stamgr";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    /// Named controller profiles.
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

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds; unset means no timeout.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host name or IP.
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Site identifier (the `{site}` in `/api/s/{site}/`).
    #[serde(default = "default_site")]
    pub site: String,

    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or `STAMGR_PASSWORD`).
    pub password: Option<String>,

    /// Verify the controller's TLS certificate. Defaults to true.
    pub verify: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Controller API generation ("v2" or "v3").
    pub api_version: Option<ApiVersion>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_port() -> u16 {
    SessionConfig::DEFAULT_PORT
}
fn default_site() -> String {
    SessionConfig::DEFAULT_SITE.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "stamgr", "stamgr").map_or_else(
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
    p.push("stamgr");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` layered over defaults, then `STAMGR_` env vars
/// (`__` separates nesting, e.g. `STAMGR_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STAMGR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Resolve the login password: `STAMGR_PASSWORD` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var("STAMGR_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the login username: profile → `STAMGR_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("STAMGR_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// TLS mode for a profile: `verify = false` wins, then `ca_cert`, then the
/// system store.
pub fn profile_tls(profile: &Profile) -> TlsMode {
    if !profile.verify.unwrap_or(true) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

/// Build a `SessionConfig` from a profile, resolving credentials.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<SessionConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    let mut session = SessionConfig::new(profile.host.clone(), username, password)
        .with_port(profile.port)
        .with_site(profile.site.clone())
        .with_tls(profile_tls(profile))
        .with_api_version(profile.api_version.unwrap_or_default());

    if let Some(secs) = profile.timeout {
        session = session.with_timeout(Duration::from_secs(secs));
    }

    Ok(session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
host = "192.168.1.99"
username = "admin"
password = "p4ssw0rd"
verify = false
api_version = "v2"
timeout = 15

[profiles.office]
host = "unifi.example.com"
port = 443
site = "branch01"
ca_cert = "/etc/ssl/unifi-ca.pem"
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loads_profiles_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("home"));
        assert_eq!(cfg.defaults.output, "json");

        let home = &cfg.profiles["home"];
        assert_eq!(home.port, 8443);
        assert_eq!(home.site, "default");
        assert_eq!(home.api_version, Some(ApiVersion::V2));

        let office = &cfg.profiles["office"];
        assert_eq!(office.port, 443);
        assert_eq!(office.site, "branch01");
        assert!(office.username.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_translates_to_session_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        let session = profile_to_session_config(&cfg.profiles["home"], "home").unwrap();

        assert_eq!(session.host(), "192.168.1.99");
        assert_eq!(session.username(), "admin");
        assert_eq!(session.tls(), &TlsMode::DangerAcceptInvalid);
        assert_eq!(session.api_version(), ApiVersion::V2);
        assert_eq!(session.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(
            session.site_api_url().unwrap().as_str(),
            "https://192.168.1.99:8443/api/s/default/"
        );
    }

    #[test]
    fn tls_prefers_verify_flag_then_ca_cert() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(
            profile_tls(&cfg.profiles["office"]),
            TlsMode::CustomCa(PathBuf::from("/etc/ssl/unifi-ca.pem"))
        );

        let mut office = cfg.profiles["office"].clone();
        office.ca_cert = None;
        assert_eq!(profile_tls(&office), TlsMode::System);
    }

    #[test]
    fn empty_host_is_rejected() {
        let profile = Profile {
            host: "  ".into(),
            port: 8443,
            site: "default".into(),
            username: Some("admin".into()),
            password: Some("x".into()),
            verify: None,
            ca_cert: None,
            api_version: None,
            timeout: None,
        };
        let err = profile_to_session_config(&profile, "blank").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }), "got: {err:?}");
    }

    #[test]
    fn save_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let source = load_config_from(&write_sample(&dir)).unwrap();

        let out = dir.path().join("nested").join("saved.toml");
        save_config_to(&out, &source).unwrap();
        let reloaded = load_config_from(&out).unwrap();

        assert_eq!(reloaded.profiles.len(), 2);
        assert_eq!(reloaded.profiles["office"].site, "branch01");
    }
}
