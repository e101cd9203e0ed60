use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autossh")]
#[command(about = "SSH dictionary attack tool for auditing password strength")]
#[command(long_about = r#"
AutoSSH tries every password of a dictionary against the SSH service of one
host (manual mode) or of every host in a host list (hostlist mode), stopping
at the first password that works.

WARNING: Only use this tool against systems you own or have explicit
permission to test.

Usage Examples:
  autossh                                     # Use cfg/config.yml
  autossh --host alice@192.168.1.20           # Attack a single host and exit
  autossh --mode hostlist --hostlist hosts.txt
  autossh -c audit.yml -d rockyou.txt -o found.txt
"#)]
#[command(version)]
pub struct Cli {
    /// Configuration file path [default: cfg/config.yml, if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Single target (user@host); skips the interactive prompt
    #[arg(long = "host", value_name = "TARGET")]
    pub target: Option<String>,

    /// Mode: manual or hostlist
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// SSH port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Password dictionary file
    #[arg(short, long, value_name = "FILE")]
    pub dict: Option<PathBuf>,

    /// Host list file (hostlist mode)
    #[arg(long, value_name = "FILE")]
    pub hostlist: Option<PathBuf>,

    /// File found credentials are appended to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Infer user@user.local from a bare machine name
    #[arg(long)]
    pub user_is_host: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Apply command line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut crate::config::Config) {
        if let Some(mode) = &self.mode {
            config.mode = mode.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = timeout;
        }
        if let Some(dict) = &self.dict {
            config.dict_path = dict.clone();
        }
        if let Some(hostlist) = &self.hostlist {
            config.hostlist_path = hostlist.clone();
        }
        if let Some(output) = &self.output {
            config.pwd_file_path = output.clone();
        }
        if self.user_is_host {
            config.user_is_host = true;
        }
    }
}
