use crate::batch::BatchRunner;
use crate::dictionary::Dictionary;
use crate::display::DisplayManager;
use crate::engine::AttackResult;
use crate::export;
use crate::host::HostAddress;
use crate::types::Credentials;
use crate::Result;
use log::{debug, warn};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const EXIT_COMMAND: &str = "exit";

/// Read `reader` line by line on a dedicated thread.
///
/// A read blocked on a terminal cannot be interrupted, so it must not live on
/// the runtime's blocking pool: the runtime would wait for it on shutdown.
/// The thread ends at end of input, on a read error, or once the receiver
/// is dropped and the next line arrives.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Manual mode: read one host per line and attack it until `exit`.
pub struct InteractiveSession<'a> {
    runner: &'a BatchRunner,
    dictionary: &'a Dictionary,
    display: &'a DisplayManager,
    user_is_host: bool,
    export_path: Option<PathBuf>,
}

impl<'a> InteractiveSession<'a> {
    pub fn new(runner: &'a BatchRunner, dictionary: &'a Dictionary, display: &'a DisplayManager) -> Self {
        Self {
            runner,
            dictionary,
            display,
            user_is_host: false,
            export_path: None,
        }
    }

    pub fn user_is_host(mut self, enabled: bool) -> Self {
        self.user_is_host = enabled;
        self
    }

    pub fn export_to(mut self, path: Option<PathBuf>) -> Self {
        self.export_path = path;
        self
    }

    pub fn print_hint(&self) {
        if self.user_is_host {
            self.display.print_info(
                "'user_is_host' is enabled: an input of 'pcname' is read as 'pcname@pcname.local'",
            );
        } else {
            self.display
                .print_info("Example input: 'john@johns-pc.local', 'peter@192.168.1.2'");
        }
    }

    /// Attack a single `user@host` input. Errors about the input itself are
    /// returned; the attack outcome is printed.
    pub async fn attack_input(&self, input: &str, cancel: &CancellationToken) -> Result<Option<Credentials>> {
        let host = HostAddress::parse(input, self.user_is_host)?;
        self.display
            .print_info(&format!("Attempting to connect to '{}'...", host));
        let (resolved, result) = self.runner.run_host(host, self.dictionary, cancel).await?;

        self.display.print_attack_result(&resolved.identity(), &result);

        let found = match result {
            AttackResult::Found(password) => {
                Credentials::new(&resolved, self.runner.engine().settings().port, password)
            }
            _ => return Ok(None),
        };

        if let Some(path) = &self.export_path {
            if let Err(e) = export::append_credentials(path, std::slice::from_ref(&found)).await {
                self.display.print_error(&e.to_string());
            }
        }
        Ok(Some(found))
    }

    /// Run the prompt loop over `lines` until `exit`, end of input, or
    /// cancellation. Returns every credential found during the session.
    pub async fn run(&self, mut lines: mpsc::Receiver<String>, cancel: &CancellationToken) -> Result<Vec<Credentials>> {
        let mut found = Vec::new();

        loop {
            print!("Enter host (type '{}' to exit): ", EXIT_COMMAND);
            let _ = std::io::stdout().flush();

            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.recv() => line,
            };

            let Some(line) = line else {
                debug!("Input closed, leaving manual mode");
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == EXIT_COMMAND {
                break;
            }

            match self.attack_input(line, cancel).await {
                Ok(Some(credentials)) => found.push(credentials),
                Ok(None) => {}
                Err(e) => {
                    warn!("{}", e);
                    self.display.print_error(&e.to_string());
                }
            }

            if cancel.is_cancelled() {
                break;
            }
        }

        Ok(found)
    }
}
