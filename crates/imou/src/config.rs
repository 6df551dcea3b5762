//! CLI configuration -- thin wrapper around `imou_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--app-id,
//! --app-secret, --data-center, ...) on top of the active profile.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use imou_api::{Credentials, ImouClient, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use imou_config::{
    Config, Profile, config_path, device_cache_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build an `ImouClient` from the config file, profile, and CLI overrides.
///
/// Flags take priority over profile values. Without a profile, `--app-id`
/// and `--app-secret` alone are enough.
pub fn build_client(global: &GlobalOpts) -> Result<ImouClient, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.app_id.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    // 1. App id (flag > env > profile)
    let app_id = global.app_id.clone().unwrap_or_else(|| profile.app_id.clone());

    // 2. App secret (flag > env > profile chain)
    let app_secret = match global.app_secret {
        Some(ref secret) => SecretString::from(secret.clone()),
        None => imou_config::resolve_app_secret(&profile, &profile_name)?,
    };

    // 3. Data center (flag > env > profile > default)
    let data_center = match global.data_center.as_deref() {
        Some(raw) => imou_config::parse_data_center(raw)?,
        None if profile.data_center.is_empty() => imou_api::DataCenter::default(),
        None => imou_config::parse_data_center(&profile.data_center)?,
    };

    // 4. Transport
    let mut transport = imou_config::profile_to_transport(&profile, &cfg.defaults);
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(profile = %profile_name, %data_center, "building client");
    let credentials = Credentials::new(app_id, app_secret, data_center);
    Ok(ImouClient::new(Arc::new(credentials), &transport)?)
}
