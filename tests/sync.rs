use std::path::PathBuf;

use ssoprof::commands::sso_profiles::{SyncDecision, decide, resolve_region};
use ssoprof::config::{
    ConfigFile, SsoRole, SsoSession, existing_sso_profiles, generated_profile_name,
};

const CONFIG: &str = "\
[sso-session dev]
sso_start_url = https://example.awsapps.com/start
sso_region = us-east-2

[sso-session prod]
sso_start_url = https://example.awsapps.com/start
sso_region = us-east-1

[profile dev_1234567890_Admin]
sso_session = dev
sso_account_id = 1234567890
sso_role_name = Admin
region = us-east-2
";

fn config() -> ConfigFile {
    ConfigFile::parse(PathBuf::from("config"), CONFIG)
}

fn role(session: &str, account_id: &str, role_name: &str) -> SsoRole {
    SsoRole {
        sso_session: session.to_string(),
        account_id: account_id.to_string(),
        role_name: role_name.to_string(),
    }
}

#[test]
fn mapped_role_is_skipped_under_its_existing_name() {
    let existing = existing_sso_profiles(&config());

    let decision = decide(&existing, &role("dev", "1234567890", "Admin"), "us-east-2");
    assert_eq!(
        decision,
        SyncDecision::Skip {
            existing_name: "dev_1234567890_Admin".to_string()
        }
    );
}

#[test]
fn unmapped_role_is_created_with_generated_name_and_resolved_region() {
    let existing = existing_sso_profiles(&config());

    let viewer = role("dev", "1234567890", "Viewer");
    let decision = decide(&existing, &viewer, "us-east-2");
    match decision {
        SyncDecision::Create { record } => {
            assert_eq!(record.sso_session, "dev");
            assert_eq!(record.sso_account_id, "1234567890");
            assert_eq!(record.sso_role_name, "Viewer");
            assert_eq!(record.region, "us-east-2");
        }
        other => panic!("expected create decision, got {other:?}"),
    }

    assert_eq!(
        generated_profile_name("dev", "1234567890", "Viewer"),
        "dev_1234567890_Viewer"
    );
}

#[test]
fn renamed_profile_still_counts_as_mapped() {
    let renamed = CONFIG.replace("[profile dev_1234567890_Admin]", "[profile my-admin]");
    let config = ConfigFile::parse(PathBuf::from("config"), &renamed);
    let existing = existing_sso_profiles(&config);

    let decision = decide(&existing, &role("dev", "1234567890", "Admin"), "us-east-2");
    assert_eq!(
        decision,
        SyncDecision::Skip {
            existing_name: "my-admin".to_string()
        }
    );
}

#[test]
fn rerun_after_create_only_skips() {
    let mut config = config();
    let existing = existing_sso_profiles(&config);

    let viewer = role("dev", "1234567890", "Viewer");
    let name = generated_profile_name("dev", "1234567890", "Viewer");
    match decide(&existing, &viewer, "us-east-2") {
        SyncDecision::Create { record } => {
            config.upsert_section(&ConfigFile::profile_section(&name), &record.entries());
        }
        other => panic!("expected create decision, got {other:?}"),
    }

    // same remote state on the next run
    let existing = existing_sso_profiles(&config);
    assert_eq!(
        decide(&existing, &viewer, "us-east-2"),
        SyncDecision::Skip {
            existing_name: name
        }
    );
}

#[test]
fn account_name_spaces_and_periods_become_hyphens() {
    assert_eq!(
        generated_profile_name("dev", "My Team.", "Read Only"),
        "dev_My-Team-_Read-Only"
    );
}

#[test]
fn explicit_valid_region_is_used_without_prompting() {
    let session = SsoSession {
        name: "dev".to_string(),
        start_url: "https://example.awsapps.com/start".to_string(),
        region: "us-east-2".to_string(),
        scopes: "sso:account:access".to_string(),
    };

    // returns before any prompt is constructed; would fail in a test
    // environment otherwise
    let region = resolve_region(Some("us-east-1"), &session).expect("explicit region");
    assert_eq!(region, "us-east-1");
}
