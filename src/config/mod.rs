pub mod file;
pub mod paths;
pub mod profile;
pub mod session;

pub use file::ConfigFile;
pub use paths::AppPaths;
pub use profile::{ProfileRecord, SsoRole, existing_sso_profiles, generated_profile_name};
pub use session::SsoSession;
