use std::collections::HashMap;

use serde::Serialize;

use crate::api::SsoClient;
use crate::auth::AuthService;
use crate::cli::SsoProfilesArgs;
use crate::config::{
    self, ConfigFile, ProfileRecord, SsoRole, SsoSession, existing_sso_profiles,
    generated_profile_name,
};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::prompt::{Prompter, ValueInListValidator};
use crate::regions;

#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub sso_session: String,
    pub region: String,
    pub created: Vec<String>,
    pub skipped: Vec<SkippedProfile>,
}

#[derive(Debug, Serialize)]
pub struct SkippedProfile {
    pub generated_name: String,
    pub existing_name: String,
}

/// What to do with one discovered account/role pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    Skip { existing_name: String },
    Create { record: ProfileRecord },
}

pub async fn run(ctx: &AppContext, args: SsoProfilesArgs) -> AppResult<()> {
    let mut config_file = ConfigFile::load(ctx.paths.config_file())?;
    if ctx.verbose > 0 {
        eprintln!("using config file {}", config_file.path().display());
    }

    let session_name = resolve_session(args.sso_session.as_deref(), &config_file)?;
    let session = config::session::lookup(&config_file, &session_name)?;
    let cli_region = resolve_region(ctx.region.as_deref(), &session)?;

    let existing = existing_sso_profiles(&config_file);
    if ctx.verbose > 0 {
        eprintln!(
            "sso-session `{}` ({}), {} existing sso profile(s)",
            session.name,
            session.region,
            existing.len()
        );
    }

    let client = SsoClient::for_region(&session.region);
    let token = AuthService::login(&client, &session, &ctx.token_cache, args.no_browser).await?;

    let mut outcome = SyncOutcome {
        sso_session: session_name.clone(),
        region: cli_region.clone(),
        created: Vec::new(),
        skipped: Vec::new(),
    };

    for account in client.list_accounts(&token.access_token).await? {
        for role in client
            .list_account_roles(&token.access_token, &account.account_id)
            .await?
        {
            let sso_role = SsoRole {
                sso_session: session_name.clone(),
                account_id: role.account_id.clone(),
                role_name: role.role_name.clone(),
            };
            let generated_name =
                generated_profile_name(&session_name, &account.account_name, &role.role_name);

            match decide(&existing, &sso_role, &cli_region) {
                SyncDecision::Skip { existing_name } => {
                    ctx.output.notice(&format!(
                        "{generated_name} - skipping - already present/renamed ({existing_name})"
                    ))?;
                    outcome.skipped.push(SkippedProfile {
                        generated_name,
                        existing_name,
                    });
                }
                SyncDecision::Create { record } => {
                    ctx.output.notice(&format!("Creating {generated_name}"))?;
                    config_file
                        .upsert_section(&ConfigFile::profile_section(&generated_name), &record.entries());
                    config_file.save()?;
                    outcome.created.push(generated_name);
                }
            }
        }
    }

    let summary = format!(
        "{} profile(s) created, {} skipped",
        outcome.created.len(),
        outcome.skipped.len()
    );
    ctx.output.emit(&summary, &outcome)
}

/// Confirmed sso-session name: the pre-supplied one when it is configured,
/// an interactively validated choice otherwise.
pub fn resolve_session(requested: Option<&str>, config: &ConfigFile) -> AppResult<String> {
    let sessions = config::session::session_names(config);

    if let Some(requested) = requested
        && sessions.iter().any(|name| name == requested)
    {
        return Ok(requested.to_string());
    }

    if sessions.is_empty() {
        return Err(AppError::Config(
            "no sso-session sections found in the config file; configure one first".to_string(),
        ));
    }

    let validator = ValueInListValidator::new(sessions.clone(), None, "Not a valid SSO Session");
    Prompter::get_value("SSO session name", None, &sessions, &validator)
}

/// Confirmed default client region for generated profiles: the explicit
/// region when valid, otherwise a prompt pre-filled with the session's own
/// region.
pub fn resolve_region(requested: Option<&str>, session: &SsoSession) -> AppResult<String> {
    if let Some(requested) = requested
        && regions::is_sts_region(requested)
    {
        return Ok(requested.to_string());
    }

    let candidates = regions::sts_regions();
    let validator = ValueInListValidator::new(
        candidates.clone(),
        Some(session.region.clone()),
        "Not a valid Region",
    );
    Prompter::get_value(
        "Default client Region",
        Some(&session.region),
        &candidates,
        &validator,
    )
}

/// The create-or-skip decision for one role identity. Matching is by the
/// three-field identity, never by profile name, so manually renamed
/// profiles still count as present.
pub fn decide(
    existing: &HashMap<SsoRole, String>,
    sso_role: &SsoRole,
    cli_region: &str,
) -> SyncDecision {
    match existing.get(sso_role) {
        Some(existing_name) => SyncDecision::Skip {
            existing_name: existing_name.clone(),
        },
        None => SyncDecision::Create {
            record: ProfileRecord {
                sso_session: sso_role.sso_session.clone(),
                sso_account_id: sso_role.account_id.clone(),
                sso_role_name: sso_role.role_name.clone(),
                region: cli_region.to_string(),
            },
        },
    }
}
