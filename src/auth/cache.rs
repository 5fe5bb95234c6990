use std::fs;

use crate::config::AppPaths;
use crate::error::AppResult;

use super::DeviceToken;

pub trait TokenCache {
    fn load(&self, session: &str) -> AppResult<Option<DeviceToken>>;
    fn save(&self, session: &str, token: &DeviceToken) -> AppResult<()>;
    fn clear(&self, session: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTokenCache {
    paths: AppPaths,
}

impl FileTokenCache {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }
}

impl TokenCache for FileTokenCache {
    fn load(&self, session: &str) -> AppResult<Option<DeviceToken>> {
        let path = self.paths.token_cache_file(session);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let token = serde_json::from_str(&raw)?;
        Ok(Some(token))
    }

    fn save(&self, session: &str, token: &DeviceToken) -> AppResult<()> {
        let path = self.paths.token_cache_file(session);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(token)?;
        fs::write(&path, payload)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    fn clear(&self, session: &str) -> AppResult<()> {
        let path = self.paths.token_cache_file(session);
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}
