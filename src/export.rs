use crate::types::Credentials;
use crate::{AutosshError, Result};
use log::info;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Format of one exported line: `user@ip password`.
pub fn format_line(credentials: &Credentials) -> String {
    format!("{} {}\n", credentials.identity(), credentials.password)
}

/// Append found credentials to `path`, creating the file if needed.
pub async fn append_credentials(path: &Path, credentials: &[Credentials]) -> Result<()> {
    if credentials.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| AutosshError::Export(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut buffer = String::new();
    for entry in credentials {
        buffer.push_str(&format_line(entry));
    }

    file.write_all(buffer.as_bytes())
        .await
        .map_err(|e| AutosshError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
    file.flush().await?;

    info!("Exported {} credentials to {}", credentials.len(), path.display());
    Ok(())
}

/// Create an empty export file if it does not exist yet.
pub async fn ensure_file(path: &Path) -> Result<bool> {
    if tokio::fs::try_exists(path).await? {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::File::create(path).await?;
    Ok(true)
}
