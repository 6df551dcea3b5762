//! Configuration for the imou CLI.
//!
//! TOML profiles, app-secret resolution (env + keyring + plaintext),
//! data-center parsing, and translation to `TransportConfig`. The CLI
//! assembles `imou_api::Credentials` from these after applying its
//! command-line overrides.

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
use tracing::debug;

use imou_api::{DataCenter, TlsMode, TransportConfig};

/// Keyring service name; entries are keyed `<profile>/app-secret`.
const KEYRING_SERVICE: &str = "imou";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no app secret configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

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

    /// Named account profiles.
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
    /// Name of the profile to use when none is given explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::UnknownProfile {
            profile: name.into(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
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
    30
}

/// A named developer account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Application id from the Imou developer console.
    #[serde(default)]
    pub app_id: String,

    /// App secret (plaintext -- prefer keyring or env var).
    pub app_secret: Option<String>,

    /// Environment variable name containing the app secret.
    pub app_secret_env: Option<String>,

    /// Region shorthand (`sg`, `or`, `fk`, `cn`) or a full base URL.
    #[serde(default = "default_data_center")]
    pub data_center: String,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_data_center() -> String {
    DataCenter::default().short_name().to_owned()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: None,
            app_secret_env: None,
            data_center: default_data_center(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// `<config dir>/config.toml` for this platform.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "imou", "imou").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where `devices scan` keeps the last known device records.
pub fn device_cache_path() -> PathBuf {
    ProjectDirs::from("com", "imou", "imou").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("devices.json");
            p
        },
        |dirs| dirs.cache_dir().join("devices.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("imou");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. `IMOU_`-prefixed variables override file
/// values, with `__` separating nesting levels (`IMOU_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IMOU_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Like [`load_config`], falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_config(cfg)?)?;
    Ok(())
}

/// The TOML text `save_config` would write.
pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the app secret from the credential chain.
pub fn resolve_app_secret(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_app_secret_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// Same as [`resolve_app_secret`] with an injectable environment lookup.
pub fn resolve_app_secret_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's app_secret_env → env var lookup
    if let Some(ref env_name) = profile.app_secret_env {
        if let Some(val) = env(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref secret) = profile.app_secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's app secret in the system keyring.
pub fn store_app_secret(profile_name: &str, secret: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(secret)?;
    Ok(())
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/app-secret"))
}

/// Parse a profile's `data_center` field.
pub fn parse_data_center(raw: &str) -> Result<DataCenter, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "data_center".into(),
        reason: format!("expected sg, or, fk, cn, or a URL, got '{raw}'"),
    })
}

/// Build the HTTP transport settings for a profile.
pub fn profile_to_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"
timeout = 10

[profiles.home]
app_id = "lc_1234"
app_secret = "plain-secret"
data_center = "fk"

[profiles.office]
app_id = "lc_5678"
app_secret_env = "OFFICE_IMOU_SECRET"
insecure = true
timeout = 5
"#;

    fn sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_from_toml() {
        let config = sample();

        assert_eq!(config.default_profile_name(), "home");
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.color, "auto");
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profiles["office"].data_center, "sg");
        assert!(matches!(
            config.profile("garage"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_profile_name(), "default");
        assert_eq!(config.defaults.timeout, 30);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                app_id: "lc_9".into(),
                data_center: "cn".into(),
                ..Profile::default()
            },
        );

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["default"].app_id, "lc_9");
        assert_eq!(loaded.profiles["default"].data_center, "cn");
    }

    #[test]
    fn env_secret_wins_over_plaintext() {
        let profile = Profile {
            app_secret: Some("plain".into()),
            app_secret_env: Some("MY_SECRET".into()),
            ..Profile::default()
        };

        let secret = resolve_app_secret_with(&profile, "imou-test-env", |name| {
            (name == "MY_SECRET").then(|| "from-env".to_owned())
        })
        .unwrap();

        assert_eq!(secret.expose_secret(), "from-env");
    }

    #[test]
    fn unset_env_falls_back_to_plaintext() {
        let profile = Profile {
            app_secret: Some("plain".into()),
            app_secret_env: Some("MY_SECRET".into()),
            ..Profile::default()
        };

        let secret =
            resolve_app_secret_with(&profile, "imou-test-unset-env-profile", |_| None).unwrap();

        assert_eq!(secret.expose_secret(), "plain");
    }

    #[test]
    fn no_secret_anywhere_is_an_error() {
        let err = resolve_app_secret_with(&Profile::default(), "imou-test-no-secret", |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "imou-test-no-secret"));
    }

    #[test]
    fn bad_data_center_is_a_validation_error() {
        let err = parse_data_center("mars").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "data_center"));
        assert_eq!(parse_data_center("fk").unwrap(), DataCenter::Frankfurt);
    }

    #[test]
    fn transport_honours_profile_overrides() {
        let config = sample();

        let office = profile_to_transport(&config.profiles["office"], &config.defaults);
        assert_eq!(office.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(office.timeout, Duration::from_secs(5));

        let home = profile_to_transport(&config.profiles["home"], &config.defaults);
        assert_eq!(home.tls, TlsMode::System);
        assert_eq!(home.timeout, Duration::from_secs(10));
    }
}
