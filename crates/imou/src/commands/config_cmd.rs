//! `imou config ...`: inspect and edit the profile file.

use std::io::BufRead;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output::Printer;

const SETTABLE_KEYS: &str = "app_id, app_secret_env, data_center, timeout, insecure, ca_cert";

/// Copy of the config with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.app_secret.is_some() {
            profile.app_secret = Some("****".into());
        }
    }
    cfg
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("cannot parse '{value}'"),
    })
}

fn apply(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "app_id" => profile.app_id = value,
        "app_secret_env" => profile.app_secret_env = Some(value),
        "data_center" => {
            imou_config::parse_data_center(&value)?;
            profile.data_center = value;
        }
        "timeout" => profile.timeout = Some(parse_value(key, &value)?),
        "insecure" => profile.insecure = Some(parse_value(key, &value)?),
        "ca_cert" => profile.ca_cert = Some(value.into()),
        other => {
            return Err(CliError::Validation {
                field: "key".into(),
                reason: format!("unknown key '{other}' (expected one of {SETTABLE_KEYS})"),
            });
        }
    }
    Ok(())
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    CliError::ProfileNotFound {
        name,
        available: if names.is_empty() { "(none)".into() } else { names.join(", ") },
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts, out: &Printer) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let text = imou_config::render_config(&cfg)?;
            out.item(&cfg, |_| text.trim_end().to_owned(), |c| {
                c.default_profile_name().to_owned()
            })
        }

        ConfigCommand::Path => out.line(config::config_path().display()),

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(name.clone()).or_default();
            apply(profile, &key, value)?;

            config::save_config(&cfg)?;
            out.note(format_args!("Updated {key} on profile '{name}'"));
            Ok(())
        }

        ConfigCommand::SetSecret => {
            let cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let secret = line.trim();
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            imou_config::store_app_secret(&name, secret)?;
            out.note(format_args!("App secret for '{name}' stored in system keyring"));
            Ok(())
        }
    }
}
