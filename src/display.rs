use crate::batch::{BatchReport, Progress};
use crate::engine::AttackResult;
use crate::host::HostAddress;
use crate::types::Credentials;
use colored::*;
use std::io::Write;

/// Colored terminal output for the interactive and batch front ends.
pub struct DisplayManager {
    use_colors: bool,
    quiet_mode: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self::with_quiet(false)
    }

    pub fn with_quiet(quiet: bool) -> Self {
        let use_colors = std::env::var("NO_COLOR").is_err()
            && std::env::var("TERM").map_or(true, |term| term != "dumb");

        Self {
            use_colors,
            quiet_mode: quiet,
        }
    }

    pub fn print_section_header(&self, title: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("{}", title.bright_cyan().bold());
            println!("{}", "─".repeat(title.chars().count()).bright_cyan());
        } else {
            println!("{}", title);
            println!("{}", "=".repeat(title.len()));
        }
    }

    pub fn print_success(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "✓".bright_green().bold(), message.green());
        } else {
            println!("[✓] {}", message);
        }
    }

    pub fn print_warning(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "!".bright_yellow().bold(), message.yellow());
        } else {
            println!("[!] {}", message);
        }
    }

    /// Errors are printed even in quiet mode.
    pub fn print_error(&self, message: &str) {
        if self.use_colors {
            eprintln!("  {} {}", "✗".bright_red().bold(), message.red().bold());
        } else {
            eprintln!("[✗] {}", message);
        }
    }

    pub fn print_info(&self, message: &str) {
        if self.quiet_mode { return; }

        if self.use_colors {
            println!("  {} {}", "i".bright_blue().bold(), message.blue());
        } else {
            println!("[i] {}", message);
        }
    }

    /// Found passwords are the tool's actual output, so quiet mode still shows them.
    pub fn print_found(&self, identity: &str, password: &str) {
        if self.use_colors {
            println!(
                "  {} Password of {} found: {}",
                "✓".bright_green().bold(),
                identity.bright_white().bold(),
                password.bright_green().bold()
            );
        } else {
            println!("[✓] Password of '{}' found: '{}'", identity, password);
        }
    }

    pub fn print_attack_result(&self, identity: &str, result: &AttackResult) {
        match result {
            AttackResult::Found(password) => self.print_found(identity, password),
            AttackResult::NotFound => {
                self.print_warning(&format!("No password in the dictionary works for {}", identity))
            }
            AttackResult::Aborted(reason) => {
                self.print_error(&format!("Attack on {} aborted: {}", identity, reason))
            }
        }
    }

    /// One line per host, prefixed with its position in the host list.
    pub fn print_progress(&self, current: usize, total: usize, message: &str) {
        if self.quiet_mode || total == 0 { return; }

        let counter = progress_counter(current, total);
        if self.use_colors {
            println!("  {} {}", counter.yellow().bold(), message.white());
        } else {
            println!("  {} {}", counter, message);
        }
        let _ = std::io::stdout().flush();
    }

    /// Summary printed at the end of a host list run.
    pub fn print_batch_summary(&self, report: &BatchReport) {
        let found = report.found();

        self.print_section_header("RESULTS");
        if found.is_empty() {
            self.print_warning("No combinations were found");
        } else {
            self.print_credentials(&found);
        }

        if !self.quiet_mode {
            println!(
                "  {} hosts attacked, {} passwords found, {} hosts skipped",
                report.entries.len(),
                found.len(),
                report.failed()
            );
        }
        if report.cancelled {
            self.print_warning("Run was cancelled before every host was processed");
        }
    }

    pub fn print_credentials(&self, credentials: &[Credentials]) {
        if credentials.is_empty() { return; }

        let width = credentials
            .iter()
            .map(|c| c.identity().chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        if self.use_colors {
            println!("  {:<width$}  {}", "Host".bright_white().bold(), "Password".bright_white().bold(), width = width);
            for entry in credentials {
                println!("  {:<width$}  {}", entry.identity().cyan(), entry.password.bright_green(), width = width);
            }
        } else {
            println!("  {:<width$}  Password", "Host", width = width);
            for entry in credentials {
                println!("  {:<width$}  {}", entry.identity(), entry.password, width = width);
            }
        }
    }

    pub fn print_banner(&self, title: &str, subtitle: Option<&str>) {
        if self.quiet_mode { return; }

        println!();
        match (self.use_colors, subtitle) {
            (true, Some(sub)) => println!("  {} {}", title.bright_cyan().bold(), format!("({})", sub).bright_black()),
            (true, None) => println!("  {}", title.bright_cyan().bold()),
            (false, Some(sub)) => println!("  {} ({})", title, sub),
            (false, None) => println!("  {}", title),
        }
        println!();
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for DisplayManager {
    fn host_started(&self, index: usize, total: usize, host: &HostAddress) {
        self.print_progress(index + 1, total, &format!("Attempting to connect to '{}'", host));
    }
}

/// `[ 3/12]`: the counter is padded to the width of `total` so lines align.
pub fn progress_counter(current: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{:>width$}/{}]", current, total, width = width)
}
