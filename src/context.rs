use crate::auth::FileTokenCache;
use crate::config::AppPaths;
use crate::error::AppResult;
use crate::output::Output;

#[derive(Debug)]
pub struct AppContext {
    pub region: Option<String>,
    pub verbose: u8,
    pub paths: AppPaths,
    pub token_cache: FileTokenCache,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(region: Option<String>, json: bool, verbose: u8) -> AppResult<Self> {
        let paths = AppPaths::discover()?;
        let token_cache = FileTokenCache::new(paths.clone());
        let output = Output::new(json);

        Ok(Self {
            region,
            verbose,
            paths,
            token_cache,
            output,
        })
    }
}
