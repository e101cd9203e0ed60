#![allow(dead_code)]

use async_trait::async_trait;
use autossh::classifier::{AttemptClassifier, AttemptOutcome, RawAttempt};
use autossh::host::{HostAddress, HostResolver, ResolvedHost};
use autossh::transport::Authenticator;
use autossh::{AutosshError, Result};
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every attempt and answers according to a per-IP behaviour.
#[derive(Clone, Default)]
pub struct FakeAuthenticator {
    hosts: HashMap<IpAddr, FakeHost>,
    pub attempts: Arc<Mutex<Vec<(SocketAddr, String, String)>>>,
    pub timeouts: Arc<Mutex<Vec<Duration>>>,
}

#[derive(Clone)]
pub enum FakeHost {
    Refuse,
    Password(String),
}

impl FakeAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, ip: &str, behaviour: FakeHost) -> Self {
        self.hosts.insert(ip.parse().unwrap(), behaviour);
        self
    }

    pub fn passwords_tried(&self) -> Vec<String> {
        self.attempts.lock().unwrap().iter().map(|(_, _, p)| p.clone()).collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn attempt_login(&self, target: SocketAddr, username: &str, password: &str, timeout: Duration) -> RawAttempt {
        self.attempts
            .lock()
            .unwrap()
            .push((target, username.to_string(), password.to_string()));
        self.timeouts.lock().unwrap().push(timeout);

        match self.hosts.get(&target.ip()) {
            Some(FakeHost::Refuse) => {
                RawAttempt::ConnectFailed(io::ErrorKind::ConnectionRefused, "Connection refused".to_string())
            }
            Some(FakeHost::Password(expected)) if expected == password => RawAttempt::Authenticated,
            Some(FakeHost::Password(_)) => RawAttempt::Denied,
            None => RawAttempt::Denied,
        }
    }

    fn service_name(&self) -> &'static str {
        "fake"
    }
}

/// Returns scripted outcomes by call index, then `AuthRejected`.
#[derive(Clone, Default)]
pub struct ScriptedClassifier {
    script: Vec<AttemptOutcome>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedClassifier {
    pub fn new(script: Vec<AttemptOutcome>) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rejecting() -> Self {
        Self::new(Vec::new())
    }

    /// Succeed on the `k`-th call (1-indexed).
    pub fn success_on(k: usize) -> Self {
        let mut script = vec![AttemptOutcome::AuthRejected; k - 1];
        script.push(AttemptOutcome::Success);
        Self::new(script)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AttemptClassifier for ScriptedClassifier {
    fn classify(&self, _raw: RawAttempt) -> AttemptOutcome {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .get(index)
            .cloned()
            .unwrap_or(AttemptOutcome::AuthRejected)
    }
}

/// Maps host names to fixed IPs and counts lookups.
#[derive(Clone, Default)]
pub struct CountingResolver {
    table: HashMap<String, IpAddr>,
    pub calls: Arc<AtomicUsize>,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, ip: &str) -> Self {
        self.table.insert(name.to_string(), ip.parse().unwrap());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostResolver for CountingResolver {
    async fn resolve(&self, host: HostAddress) -> Result<ResolvedHost> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.table.get(host.raw_host()) {
            Some(ip) => Ok(host.with_ip(*ip)),
            None => Err(AutosshError::Resolution {
                host: host.raw_host().to_string(),
            }),
        }
    }
}

pub fn resolved(input: &str, ip: &str) -> ResolvedHost {
    HostAddress::parse(input, false).unwrap().with_ip(ip.parse().unwrap())
}

pub fn passwords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
