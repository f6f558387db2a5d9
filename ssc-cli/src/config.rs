use std::{
    env::{self, VarError},
    path::PathBuf,
};

use platform_dirs::AppDirs;

const APP_NAME: &str = "StreamCleaner";
const STORE_DIRNAME: &str = "store";
const STORE_ENV_VAR: &str = "SSC_STORE_DIR";

fn app_dirs() -> Option<AppDirs> {
    const USE_XDG_ON_MACOS: bool = false;

    AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
}

/// Directory of the file store: `SSC_STORE_DIR` if set, otherwise a folder in
/// the platform config directory.
pub fn store_dir() -> Option<PathBuf> {
    match env::var(STORE_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => return Some(PathBuf::from(dir)),
        Ok(_) | Err(VarError::NotPresent) => {}
        Err(VarError::NotUnicode(_)) => {
            log::error!("{} is not a valid unicode", STORE_ENV_VAR);
        }
    }
    app_dirs().map(|dirs| dirs.config_dir.join(STORE_DIRNAME))
}
