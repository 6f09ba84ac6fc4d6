//! Shared CLI context and output helpers.
//!
//! [`CliContext`] resolves the config file, API overrides and session the same
//! way for every command and for the interactive wizard.

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::Session;
use crate::utils::{get_config_path, get_session_path};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct CliContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub session_path: PathBuf,
    /// `None` when no token was passed and nothing is stored
    pub session: Option<Session>,
}

impl CliContext {
    /// Load config and session.
    ///
    /// `--config` moves the session file next to the given config. A
    /// non-blank `--token` wins over the stored session.
    pub fn load(
        config_path: Option<&Path>,
        api_url: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        let (config_path, session_path) = match config_path {
            Some(path) => (path.to_path_buf(), path.with_file_name("session.toml")),
            None => (get_config_path(), get_session_path()),
        };

        let mut config =
            Config::load_or_create(&config_path).context("Failed to load configuration")?;
        config.apply_overrides(api_url);

        let session = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Some(Session::new(token)),
            None => Session::load(&session_path).context("Failed to load session")?,
        };

        Ok(Self {
            config,
            config_path,
            session_path,
            session,
        })
    }

    /// API client for the current session, or an error telling how to log in.
    pub fn api_client(&self) -> Result<ApiClient> {
        let Some(session) = self.session.clone() else {
            anyhow::bail!(
                "No hay sesión activa. Usa --token o `servimatch login <TOKEN>` primero."
            );
        };
        ApiClient::new(&self.config, session)
    }
}

/// Print a success message with a checkmark prefix.
pub fn print_success(msg: &str) {
    println!("\u{2713} {}", msg);
}

/// Print an error message with an X prefix to stderr.
pub fn print_error(msg: &str) {
    eprintln!("\u{2717} {}", msg);
}

/// Print an info message with an info sign prefix.
pub fn print_info(msg: &str) {
    println!("\u{2139}\u{FE0F} {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_token_flag_wins_over_stored_session() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        Session::new("stored-token")
            .save(&dir.path().join("session.toml"))
            .unwrap();

        let ctx = CliContext::load(Some(&config_path), None, Some("flag-token")).unwrap();
        assert_eq!(ctx.session.unwrap().access, "flag-token");

        let ctx = CliContext::load(Some(&config_path), None, Some("  ")).unwrap();
        assert_eq!(ctx.session.unwrap().access, "stored-token");
    }

    #[test]
    fn test_missing_session_is_reported_on_use() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let ctx = CliContext::load(Some(&config_path), Some("http://localhost:9000/"), None).unwrap();

        assert!(ctx.session.is_none());
        assert!(config_path.exists());
        assert_eq!(ctx.config.api_base_url, "http://localhost:9000");
        let err = ctx.api_client().unwrap_err();
        assert!(err.to_string().contains("login"));
    }
}
