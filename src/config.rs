use crate::engine::{AttackSettings, DEFAULT_SSH_PORT};
use crate::{AutosshError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "cfg/config.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Prompt for one host at a time.
    Manual,
    /// Attack every host in a host list file.
    Hostlist,
}

impl FromStr for Mode {
    type Err = AutosshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Mode::Manual),
            "hostlist" => Ok(Mode::Hostlist),
            _ => Err(AutosshError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => write!(f, "manual"),
            Mode::Hostlist => write!(f, "hostlist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: String,
    pub port: u16,
    pub timeout_ms: u64, // 0 = default
    pub resolve_timeout_ms: u64, // 0 = default
    pub delay_between_attempts_ms: u64,
    /// Treat a bare `pcname` as `pcname@pcname.local`.
    pub user_is_host: bool,
    pub dict_path: PathBuf,
    pub hostlist_path: PathBuf,
    /// Where found credentials are appended; empty disables export.
    pub pwd_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: "manual".to_string(),
            port: DEFAULT_SSH_PORT,
            timeout_ms: 0,
            resolve_timeout_ms: 0,
            delay_between_attempts_ms: 0,
            user_is_host: false,
            dict_path: PathBuf::from("cfg/dict.txt"),
            hostlist_path: PathBuf::from("cfg/hostlist.txt"),
            pwd_file_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load a config file; the format follows from the extension.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load `explicit` when given, otherwise `fallback` when it exists.
    ///
    /// Defaults are only used when no file was named and `fallback` is
    /// absent; a named file that is missing or malformed is an error. The
    /// returned path is the file that was actually read.
    pub fn load_or_default(explicit: Option<&Path>, fallback: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => path,
            None if fallback.exists() => fallback,
            None => return Ok((Self::default(), None)),
        };

        let config = Self::load_from_file(&path.to_string_lossy())?;
        Ok((config, Some(path.to_path_buf())))
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    pub fn mode(&self) -> Result<Mode> {
        self.mode.parse()
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    pub fn attempt_delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_attempts_ms)
    }

    pub fn export_path(&self) -> Option<&Path> {
        if self.pwd_file_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.pwd_file_path)
        }
    }

    /// The immutable view handed to the attack engine.
    pub fn attack_settings(&self) -> AttackSettings {
        AttackSettings::new(self.port, self.attempt_timeout()).with_delay(self.attempt_delay())
    }
}
