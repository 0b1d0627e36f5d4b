//! `GlobalOpts`-aware wrappers over `bouncer_config`.
//!
//! Flags win over the profile, the profile wins over `[defaults]`, and
//! build-time values fill whatever is still missing.

use bouncer_config::{Config, ConfigError, Profile};
use bouncer_core::{GatewayConfig, Vocabulary};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The loaded config plus the selected profile with flag overrides applied.
pub struct Resolved {
    pub config: Config,
    pub profile_name: String,
    pub profile: Profile,
}

/// Load config and select the active profile.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let config = bouncer_config::load_config()?;
    let (profile_name, mut profile) =
        config
            .profile(global.profile.as_deref())
            .map_err(|e| match e {
                ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                    name,
                    available: available_profiles(&config),
                },
                other => other.into(),
            })?;
    apply_overrides(&mut profile, global);

    Ok(Resolved {
        config,
        profile_name,
        profile,
    })
}

/// Build the gateway configuration for commands that talk to the backend.
pub fn gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    let resolved = resolve(global)?;
    let config = bouncer_config::profile_to_gateway_config(
        &resolved.profile,
        &resolved.profile_name,
        &resolved.config.defaults,
    )?;
    tracing::debug!(
        profile = %resolved.profile_name,
        api_url = %config.api_url,
        device_id = %config.device_id,
        vocabulary = %config.vocabulary,
        "resolved gateway config"
    );
    Ok(config)
}

/// The vocabulary in effect, without requiring credentials.
pub fn vocabulary(global: &GlobalOpts) -> Result<Vocabulary, CliError> {
    if let Some(v) = global.vocabulary {
        return Ok(v);
    }
    let resolved = resolve(global)?;
    Ok(resolved
        .profile
        .vocabulary
        .unwrap_or(resolved.config.defaults.vocabulary))
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        profile.api_url = Some(url.clone());
    }
    if let Some(ref id) = global.device_id {
        profile.device_id = Some(id.clone());
    }
    if let Some(v) = global.vocabulary {
        profile.vocabulary = Some(v);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(t) = global.timeout {
        profile.timeout = Some(t);
    }
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
