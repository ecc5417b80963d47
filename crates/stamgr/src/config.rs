//! Profile resolution: layers CLI flags over the selected TOML profile and
//! hands the result to `stamgr_config` for credential lookup.

use clap::ValueEnum;
use stamgr_api::{ApiVersion, SessionConfig};
use stamgr_config::{Config, Profile};

use crate::cli::{ApiVersionArg, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: `--output` flag, then `defaults.output`, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.clone().unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

impl From<ApiVersionArg> for ApiVersion {
    fn from(arg: ApiVersionArg) -> Self {
        match arg {
            ApiVersionArg::V2 => Self::V2,
            ApiVersionArg::V3 => Self::V3,
        }
    }
}

/// Build the effective profile: the named profile if it exists, otherwise
/// one synthesized from `--host`. Flags override profile values.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    let mut profile = match config.profiles.get(profile_name) {
        Some(profile) => profile.clone(),
        None => {
            let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: stamgr_config::config_path().display().to_string(),
            })?;
            Profile {
                host,
                port: SessionConfig::DEFAULT_PORT,
                site: SessionConfig::DEFAULT_SITE.into(),
                username: None,
                password: None,
                verify: None,
                ca_cert: None,
                api_version: None,
                timeout: None,
            }
        }
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(ref site) = global.site {
        profile.site.clone_from(site);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.verify = Some(false);
    }
    if let Some(version) = global.api_version {
        profile.api_version = Some(version.into());
    }
    // Timeout: flag > profile > defaults
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(config.defaults.timeout);

    Ok(profile)
}

/// Translate config + flags into a `SessionConfig` ready for login.
pub fn resolve_session(global: &GlobalOpts, config: &Config) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = effective_profile(global, config, &profile_name)?;

    let mut session = stamgr_config::profile_to_session_config(&profile, &profile_name)?;

    if let Some(ref raw) = global.base_url {
        let url: url::Url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        session = session.with_base_url(url);
    }

    tracing::debug!(
        profile = %profile_name,
        host = %session.host(),
        site = %session.site(),
        api_version = %session.api_version(),
        timeout_secs = ?session.timeout().map(|t| t.as_secs()),
        "resolved session config"
    );

    Ok(session)
}
