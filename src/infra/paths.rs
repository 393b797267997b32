// src/infra/paths.rs — Config file discovery
//
// All paths respect the CHATQA_HOME environment variable for isolation.
// A `chatqa.toml` in the working directory takes precedence over the
// user-level config so a dataset directory can carry its own settings.

use std::path::PathBuf;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "chatqa.toml";

/// Returns the CHATQA_HOME override, if set.
fn chatqa_home() -> Option<PathBuf> {
    std::env::var_os("CHATQA_HOME").map(PathBuf::from)
}

/// Configuration directory: $CHATQA_HOME/ or ~/.chatqa/
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = chatqa_home() {
        return Some(home);
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".chatqa"))
}

/// User-level config file path.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// The config file to load, if any exists.
pub fn config_file_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    user_config_path().filter(|p| p.exists())
}

/// Replace characters that are awkward in file names (`qwen3:8b` -> `qwen3_8b`).
pub fn safe_model_name(model: &str) -> String {
    model
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
