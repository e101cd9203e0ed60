use crate::dictionary::Dictionary;
use crate::engine::{AttackEngine, AttackResult};
use crate::host::{HostAddress, HostResolver, ResolvedHost};
use crate::types::Credentials;
use crate::Result;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

/// Receives progress updates from [`BatchRunner::run`].
pub trait Progress {
    /// Called before host `index` (0-based) of `total` is attacked.
    fn host_started(&self, index: usize, total: usize, host: &HostAddress);
}

/// What happened to one host of a batch.
#[derive(Debug)]
pub struct HostReport {
    pub host: HostAddress,
    pub outcome: Result<(ResolvedHost, AttackResult)>,
}

impl HostReport {
    pub fn result(&self) -> Option<&AttackResult> {
        self.outcome.as_ref().ok().map(|(_, result)| result)
    }

    pub fn credentials(&self, port: u16) -> Option<Credentials> {
        match &self.outcome {
            Ok((resolved, AttackResult::Found(password))) => {
                Some(Credentials::new(resolved, port, password.clone()))
            }
            _ => None,
        }
    }
}

/// Per-host results in the order the hosts were supplied.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<HostReport>,
    pub port: u16,
    /// Set when the run stopped before every host was processed.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn found(&self) -> Vec<Credentials> {
        self.entries
            .iter()
            .filter_map(|entry| entry.credentials(self.port))
            .collect()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|entry| entry.outcome.is_err()).count()
    }
}

/// Drives resolution and the attack loop over a list of hosts, one host
/// at a time.
pub struct BatchRunner {
    resolver: Box<dyn HostResolver>,
    engine: AttackEngine,
}

impl BatchRunner {
    pub fn new(resolver: Box<dyn HostResolver>, engine: AttackEngine) -> Self {
        Self { resolver, engine }
    }

    pub fn engine(&self) -> &AttackEngine {
        &self.engine
    }

    /// Resolve `host` once and run the dictionary against it.
    pub async fn run_host(
        &self,
        host: HostAddress,
        dictionary: &Dictionary,
        cancel: &CancellationToken,
    ) -> Result<(ResolvedHost, AttackResult)> {
        let resolved = self.resolver.resolve(host).await?;
        let result = self.engine.attack(&resolved, dictionary, cancel).await;
        Ok((resolved, result))
    }

    pub async fn run(
        &self,
        hosts: Vec<HostAddress>,
        dictionary: &Dictionary,
        cancel: &CancellationToken,
        progress: Option<&dyn Progress>,
    ) -> BatchReport {
        let total = hosts.len();
        let mut report = BatchReport {
            entries: Vec::with_capacity(total),
            port: self.engine.settings().port,
            cancelled: false,
        };

        for (index, host) in hosts.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Batch cancelled with {} of {} hosts processed", index, total);
                report.cancelled = true;
                break;
            }

            if let Some(progress) = progress {
                progress.host_started(index, total, &host);
            }

            let outcome = self.run_host(host.clone(), dictionary, cancel).await;
            if let Err(e) = &outcome {
                warn!("Skipping {}: {}", host, e);
            }
            report.entries.push(HostReport { host, outcome });
        }

        report
    }
}
