use crate::host::HostAddress;
use crate::{AutosshError, Result};
use log::{info, warn};
use std::path::Path;
use tokio::fs;

/// Parse a host list, one `user@host` per line.
///
/// Blank lines and `#` comments are ignored. Malformed entries are logged
/// and skipped; the order of the remaining entries is preserved.
pub fn parse_hostlist(content: &str, user_is_host: bool) -> Vec<HostAddress> {
    let mut hosts = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match HostAddress::parse(line, user_is_host) {
            Ok(host) => hosts.push(host),
            Err(e) => warn!("Skipping host list line {}: {}", number + 1, e),
        }
    }

    hosts
}

pub async fn load_hostlist(path: &Path, user_is_host: bool) -> Result<Vec<HostAddress>> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        AutosshError::Hostlist(format!("Failed to read host list {}: {}", path.display(), e))
    })?;

    let hosts = parse_hostlist(&content, user_is_host);
    info!("Loaded {} hosts from {}", hosts.len(), path.display());
    Ok(hosts)
}
