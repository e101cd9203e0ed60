use crate::{AutosshError, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Ordered, read-only list of candidate passwords.
///
/// Cloning shares the underlying storage, so one dictionary can be handed
/// to any number of host loops.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    passwords: Arc<[String]>,
}

impl Dictionary {
    /// Load a dictionary file, one candidate per line, in file order.
    ///
    /// Empty lines are skipped. Lines are otherwise kept verbatim, so
    /// leading or trailing spaces are part of the candidate.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            AutosshError::Wordlist(format!("Failed to read dictionary {}: {}", path.display(), e))
        })?;

        let dictionary = Self::parse(&content);
        info!("Loaded {} passwords from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.passwords.iter()
    }
}

impl From<Vec<String>> for Dictionary {
    fn from(passwords: Vec<String>) -> Self {
        Self {
            passwords: passwords.into(),
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
