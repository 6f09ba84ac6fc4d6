use std::path::PathBuf;

/// Overrides the config directory (used by tests and packaged installs).
pub const CONFIG_DIR_ENV: &str = "SERVIMATCH_CONFIG_DIR";

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Config directory: `$SERVIMATCH_CONFIG_DIR`, else `~/.config/servimatch` on every OS
pub fn get_config_dir() -> PathBuf {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => get_home_dir().join(".config").join("servimatch"),
    }
}

pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Stored bearer tokens, next to the config
pub fn get_session_path() -> PathBuf {
    get_config_dir().join("session.toml")
}

/// Log directory (`<cache>/servimatch`)
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("servimatch")
}

/// Expand a path string, handling `~`. Relative paths are left relative to the working directory.
pub fn expand_path(path_str: &str) -> PathBuf {
    let path_str = path_str.trim();
    if path_str == "~" {
        get_home_dir()
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        get_home_dir().join(rest)
    } else {
        PathBuf::from(path_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path() {
        let home = get_home_dir();
        assert_eq!(expand_path("~"), home);
        assert_eq!(expand_path("~/fotos/yo.jpg"), home.join("fotos/yo.jpg"));
        assert_eq!(expand_path(" /tmp/a.png "), PathBuf::from("/tmp/a.png"));
        assert_eq!(expand_path("a.png"), PathBuf::from("a.png"));
    }

    #[test]
    fn test_session_lives_next_to_config() {
        assert_eq!(get_session_path().parent(), get_config_path().parent());
    }
}
