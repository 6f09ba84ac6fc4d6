pub mod path;
pub mod text_input;

pub use path::{
    expand_path, get_config_dir, get_config_path, get_home_dir, get_log_dir, get_session_path,
};
pub use text_input::{InputOutcome, TextInput};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Deserialize a string that the backend may send as `null`.
pub fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Write a file readable only by the owner (0600 on unix), creating parent directories.
pub fn write_private_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    std::fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .with_context(|| format!("Failed to get file metadata: {:?}", path))?
            .permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to set file permissions: {:?}", path))?;
    }

    Ok(())
}
