use autossh::{
    batch::BatchRunner,
    classifier::SshClassifier,
    cli::Cli,
    config::{Config, Mode, DEFAULT_CONFIG_PATH},
    dictionary::Dictionary,
    display::DisplayManager,
    engine::AttackEngine,
    export,
    host::DnsResolver,
    hostlist,
    interactive::{self, InteractiveSession},
    transport::SshAuthenticator,
    Result,
};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::path::Path;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level()))
        .format_timestamp_secs()
        .init();

    let display = DisplayManager::with_quiet(cli.quiet);

    display.print_banner(
        concat!("AutoSSH v", env!("CARGO_PKG_VERSION")),
        Some("Authorized Testing Only"),
    );

    let mut config = match Config::load_or_default(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH)) {
        Ok((config, Some(path))) => {
            display.print_success(&format!("Loaded configuration from {}", path.display()));
            config
        }
        Ok((config, None)) => {
            display.print_warning(&format!("{} not found, using defaults", DEFAULT_CONFIG_PATH));
            config
        }
        Err(e) => {
            display.print_error(&format!("Failed to load configuration: {}", e));
            process::exit(1);
        }
    };
    cli.apply(&mut config);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current attempt");
            ctrl_c.cancel();
        }
    });

    if let Err(e) = run(&cli, &config, &display, &cancel).await {
        display.print_error(&e.to_string());
        process::exit(1);
    }
}

async fn run(cli: &Cli, config: &Config, display: &DisplayManager, cancel: &CancellationToken) -> Result<()> {
    let mode = config.mode()?;

    display.print_info(&format!("Loading {}...", config.dict_path.display()));
    let dictionary = Dictionary::load(&config.dict_path).await?;

    if let Some(path) = config.export_path() {
        if export::ensure_file(path).await? {
            display.print_info(&format!("File not found at {}. Created it.", path.display()));
        }
    }

    let engine = AttackEngine::new(
        config.attack_settings(),
        Box::new(SshAuthenticator),
        Box::new(SshClassifier),
    );
    debug!("Attack settings: {:?}", engine.settings());
    let runner = BatchRunner::new(Box::new(DnsResolver::new(config.resolve_timeout())), engine);

    let session = InteractiveSession::new(&runner, &dictionary, display)
        .user_is_host(config.user_is_host)
        .export_to(config.export_path().map(|p| p.to_path_buf()));

    if let Some(target) = &cli.target {
        session.attack_input(target, cancel).await?;
        return Ok(());
    }

    match mode {
        Mode::Manual => {
            session.print_hint();
            let lines = interactive::spawn_line_reader(std::io::stdin());
            session.run(lines, cancel).await?;
        }
        Mode::Hostlist => {
            display.print_info(&format!("Loading {}...", config.hostlist_path.display()));
            let hosts = hostlist::load_hostlist(&config.hostlist_path, config.user_is_host).await?;

            display.print_section_header("DICTIONARY ATTACK");
            let report = runner.run(hosts, &dictionary, cancel, Some(display)).await;

            for entry in &report.entries {
                match &entry.outcome {
                    Ok((resolved, result)) => display.print_attack_result(&resolved.identity(), result),
                    Err(e) => display.print_error(&format!("{}: {}", entry.host, e)),
                }
            }
            display.print_batch_summary(&report);

            if let Some(path) = config.export_path() {
                export::append_credentials(path, &report.found()).await?;
            }
        }
    }

    Ok(())
}
