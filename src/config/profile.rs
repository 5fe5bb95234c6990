use std::collections::HashMap;

use super::file::ConfigFile;

/// Identity of an assumable role: session, account, role. Pure lookup key
/// with structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SsoRole {
    pub sso_session: String,
    pub account_id: String,
    pub role_name: String,
}

/// The keys written for a newly generated profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub sso_session: String,
    pub sso_account_id: String,
    pub sso_role_name: String,
    pub region: String,
}

impl ProfileRecord {
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sso_session", self.sso_session.clone()),
            ("sso_account_id", self.sso_account_id.clone()),
            ("sso_role_name", self.sso_role_name.clone()),
            ("region", self.region.clone()),
        ]
    }
}

/// Index existing profiles by role identity so re-runs can skip pairs that
/// are already mapped, under whatever name the operator gave them. Only
/// profiles exposing all three identity keys participate.
pub fn existing_sso_profiles(config: &ConfigFile) -> HashMap<SsoRole, String> {
    config
        .profiles()
        .into_iter()
        .filter_map(|(profile_name, values)| {
            let role = SsoRole {
                sso_session: values.get("sso_session")?.clone(),
                account_id: values.get("sso_account_id")?.clone(),
                role_name: values.get("sso_role_name")?.clone(),
            };
            Some((role, profile_name))
        })
        .collect()
}

/// Canonical profile name for a session/account/role pair. Spaces and
/// literal periods become hyphens so the name is safe as a section name and
/// a CLI argument.
pub fn generated_profile_name(session: &str, account_name: &str, role_name: &str) -> String {
    format!("{session}_{account_name}_{role_name}")
        .chars()
        .map(|c| if c == ' ' || c == '.' { '-' } else { c })
        .collect()
}
