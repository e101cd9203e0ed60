//! AutoSSH - SSH Password Auditing Tool
//!
//! Runs a password dictionary against the SSH service of one host or of a
//! list of hosts and reports the first password that works for each.
//!
//! # Warning
//! This tool is meant for authorized security assessments only. Users are
//! responsible for having permission to test the systems they target.

pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod host;
pub mod hostlist;
pub mod interactive;
pub mod transport;

pub use error::{AutosshError, Result};

/// Common types shared by the front ends.
pub mod types {
    use crate::host::ResolvedHost;
    use serde::{Deserialize, Serialize};
    use std::net::IpAddr;

    /// A username and password that were accepted by a host.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
        /// Host as typed or listed, before resolution.
        pub host: String,
        pub ip: IpAddr,
        pub port: u16,
    }

    impl Credentials {
        pub fn new(resolved: &ResolvedHost, port: u16, password: String) -> Self {
            Self {
                username: resolved.username().to_string(),
                password,
                host: resolved.raw_host().to_string(),
                ip: resolved.ip(),
                port,
            }
        }

        pub fn identity(&self) -> String {
            format!("{}@{}", self.username, self.ip)
        }
    }
}
