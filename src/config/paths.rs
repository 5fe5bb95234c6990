use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_file: PathBuf,
    sso_cache_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("unable to resolve home directory".to_string()))?;

        let config_file = env::var_os(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".aws").join("config"));
        let sso_cache_dir = home.join(".aws").join("sso").join("cache");

        fs::create_dir_all(&sso_cache_dir)?;

        Ok(Self {
            config_file,
            sso_cache_dir,
        })
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn token_cache_file(&self, session: &str) -> PathBuf {
        self.sso_cache_dir
            .join(format!("{}.json", cache_file_stem(session)))
    }
}

fn cache_file_stem(session: &str) -> String {
    session
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_stem_keeps_safe_characters() {
        assert_eq!(cache_file_stem("dev"), "dev");
        assert_eq!(cache_file_stem("my_team-1"), "my_team-1");
    }

    #[test]
    fn cache_stem_replaces_path_characters() {
        assert_eq!(cache_file_stem("dev/../prod"), "dev----prod");
        assert_eq!(cache_file_stem("a b.c"), "a-b-c");
    }
}
