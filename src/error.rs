use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutosshError>;

#[derive(Error, Debug)]
pub enum AutosshError {
    #[error("Invalid host format: '{input}' (expected 'user@host')")]
    InvalidHostFormat { input: String },

    #[error("Could not resolve host '{host}'")]
    Resolution { host: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("'{0}' is not a valid mode (expected 'manual' or 'hostlist')")]
    InvalidMode(String),

    #[error("Wordlist error: {0}")]
    Wordlist(String),

    #[error("Host list error: {0}")]
    Hostlist(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<toml::ser::Error> for AutosshError {
    fn from(err: toml::ser::Error) -> Self {
        AutosshError::Config(config::ConfigError::Message(format!(
            "Failed to serialize config: {}",
            err
        )))
    }
}
