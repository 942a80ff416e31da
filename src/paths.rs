use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const CONSUMED_DIR_NAME: &str = "consumed";

pub fn config_file_path() -> Result<PathBuf> {
    config_file_path_from_env(env::var_os("PSEUDOMYTH_CONFIG"))
}

pub(crate) fn config_file_path_from_env(env_value: Option<OsString>) -> Result<PathBuf> {
    match env_value {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => {
            let home = dirs::home_dir().context("unable to resolve home directory")?;
            Ok(home.join(".pseudomyth"))
        }
    }
}
