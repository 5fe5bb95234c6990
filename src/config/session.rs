use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

use super::file::ConfigFile;

const DEFAULT_REGISTRATION_SCOPES: &str = "sso:account:access";

/// A configured `[sso-session …]` section: the single-sign-on endpoint the
/// operator authenticates against.
#[derive(Debug, Clone)]
pub struct SsoSession {
    pub name: String,
    pub start_url: String,
    pub region: String,
    pub scopes: String,
}

impl SsoSession {
    fn from_values(name: &str, values: &BTreeMap<String, String>) -> AppResult<Self> {
        let start_url = require(name, values, "sso_start_url")?;
        let region = require(name, values, "sso_region")?;
        let scopes = values
            .get("sso_registration_scopes")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REGISTRATION_SCOPES.to_string());

        Ok(Self {
            name: name.to_string(),
            start_url,
            region,
            scopes,
        })
    }

    /// Registration scopes as the list form the OIDC API wants; the config
    /// key holds them comma- or space-separated.
    pub fn scope_list(&self) -> Vec<&str> {
        self.scopes
            .split([',', ' '])
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .collect()
    }
}

/// Names of every configured sso-session, alphabetical, for prompting and
/// completion.
pub fn session_names(config: &ConfigFile) -> Vec<String> {
    config.sso_sessions().into_keys().collect()
}

pub fn lookup(config: &ConfigFile, name: &str) -> AppResult<SsoSession> {
    let sessions = config.sso_sessions();
    let values = sessions.get(name).ok_or_else(|| {
        AppError::Config(format!("sso-session `{name}` is not configured"))
    })?;
    SsoSession::from_values(name, values)
}

fn require(
    session: &str,
    values: &BTreeMap<String, String>,
    key: &str,
) -> AppResult<String> {
    values.get(key).cloned().ok_or_else(|| {
        AppError::Config(format!("sso-session `{session}` is missing `{key}`"))
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SAMPLE: &str = "\
[sso-session prod]
sso_start_url = https://example.awsapps.com/start
sso_region = us-east-1

[sso-session dev]
sso_start_url = https://example.awsapps.com/start
sso_region = us-east-2
sso_registration_scopes = sso:account:access, sso:admin
";

    fn config() -> ConfigFile {
        ConfigFile::parse(PathBuf::from("config"), SAMPLE)
    }

    #[test]
    fn lists_session_names_alphabetically() {
        assert_eq!(session_names(&config()), ["dev", "prod"]);
    }

    #[test]
    fn looks_up_session_with_default_scopes() {
        let session = lookup(&config(), "prod").unwrap();
        assert_eq!(session.region, "us-east-1");
        assert_eq!(session.scope_list(), ["sso:account:access"]);
    }

    #[test]
    fn splits_configured_scopes() {
        let session = lookup(&config(), "dev").unwrap();
        assert_eq!(session.scope_list(), ["sso:account:access", "sso:admin"]);
    }

    #[test]
    fn missing_session_is_a_config_error() {
        assert!(lookup(&config(), "staging").is_err());
    }

    #[test]
    fn missing_start_url_is_a_config_error() {
        let config = ConfigFile::parse(
            PathBuf::from("config"),
            "[sso-session broken]\nsso_region = us-east-1\n",
        );
        assert!(lookup(&config, "broken").is_err());
    }
}
