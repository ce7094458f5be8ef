//! Settings resolved from flags, then environment, then defaults.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const BASE_URL_ENV: &str = "TICKERDASH_BASE_URL";
pub const DATA_DIR_ENV: &str = "TICKERDASH_DATA_DIR";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DATA_DIR: &str = "data";

pub fn base_url(flag: Option<&str>) -> Result<String, CliError> {
    resolve_base_url(flag, env::var(BASE_URL_ENV).ok())
}

pub fn data_dir(flag: Option<&Path>) -> PathBuf {
    resolve_data_dir(flag, env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn resolve_base_url(flag: Option<&str>, from_env: Option<String>) -> Result<String, CliError> {
    let candidate = flag
        .map(str::to_owned)
        .or(from_env)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

    if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
        return Err(CliError::Config(format!(
            "base url must start with http:// or https://, got '{candidate}'"
        )));
    }
    Ok(candidate)
}

fn resolve_data_dir(flag: Option<&Path>, from_env: Option<PathBuf>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or(from_env.filter(|path| !path.as_os_str().is_empty()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
