//! Config subcommand handlers. None of these open a controller session.

use stamgr_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of the config with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut masked = cfg.clone();
    for profile in masked.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    masked
}

/// Map a dialoguer / rpassword failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", stamgr_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&stamgr_config::load_config()?);
            let format = config::output_format(global, &cfg);
            let out = match format {
                // TOML is the native shape of this document
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                        field: "config".into(),
                        reason: e.to_string(),
                    })?
                }
                ref structured => output::render_structured(structured, &cfg).unwrap_or_default(),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = stamgr_config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            let secret = rpassword::prompt_password(format!("Password for '{profile_name}': "))
                .map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            stamgr_config::store_password(&profile_name, &secret)?;
            output::print_success(
                &format!("Password for profile '{profile_name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use stamgr_config::Profile;

    use super::*;

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                host: "192.168.1.99".into(),
                port: 8443,
                site: "default".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                verify: None,
                ca_cert: None,
                api_version: None,
                timeout: None,
            },
        );

        let masked = redacted(&cfg);
        assert_eq!(masked.profiles["home"].password.as_deref(), Some(REDACTED));
        assert_eq!(masked.profiles["home"].username.as_deref(), Some("admin"));
        assert_eq!(cfg.profiles["home"].password.as_deref(), Some("hunter2"));
    }
}
