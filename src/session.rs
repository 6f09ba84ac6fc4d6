//! Authenticated session handed to the API client.
//!
//! The session is an explicit value: it is loaded once at startup (from
//! `session.toml` or `--token`) and passed to [`crate::api::ApiClient`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Access token sent as `Authorization: Bearer <access>`
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl Session {
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
        }
    }

    /// Read a stored session. Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {:?}", path))?;
        let session: Session =
            toml::from_str(&content).with_context(|| "Failed to parse session file")?;
        if session.access.trim().is_empty() {
            anyhow::bail!("Session file {:?} has an empty access token", path);
        }
        Ok(Some(session))
    }

    /// Store the session with owner-only permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize session")?;
        crate::utils::write_private_file(path, &content)
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }

    /// Token masked for logs: first and last four characters.
    pub fn token_preview(&self) -> String {
        let chars: Vec<char> = self.access.chars().collect();
        if chars.len() > 8 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &self.token_preview())
            .field("refresh", &self.refresh.as_ref().map(|_| "***"))
            .finish()
    }
}
