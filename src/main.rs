//! Network Inspector - terminal entry point
//!
//! Interactive by default; `--once` performs a single measurement and prints
//! the result without taking over the terminal.

use clap::Parser;
use network_inspector::{
    app::{run_tui, App},
    cli::Cli,
    client::ClientFactory,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, ErrorReporter, Result},
    inspector::Inspector,
    logging::{LogSink, LoggerFactory},
    models::Config,
    navigation::{Navigator, SystemUrlOpener},
    probe::{LatencyProbe, RequestDispatcher},
    state::LatencyState,
    ui::Theme,
    build_info, PKG_NAME, VERSION,
};
use std::process;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!(
            "{} v{} ({} {}, commit {}, built {})",
            PKG_NAME,
            VERSION,
            build_info::BUILD_PROFILE,
            build_info::TARGET_TRIPLE,
            build_info::GIT_COMMIT,
            build_info::BUILD_TIME
        );
    }

    let config = load_config(cli.clone())?;

    let warnings = validate_config(&config)?;
    for warning in &warnings {
        eprintln!("{}", warning.format(config.enable_color));
    }

    if config.debug {
        eprintln!("Configuration:\n{}\n", display_config_summary(&config));
    }

    let runtime = Runtime::new().map_err(|e| AppError::internal(format!("Failed to start async runtime: {}", e)))?;

    let sink = log_sink(&config, cli.once)?;
    let loggers = LoggerFactory::new(config.clone(), sink);

    let inspector = Inspector::from_config(&config, &loggers);
    let store = inspector.store().cloned();
    let client = ClientFactory::new(&config).create_network_client(inspector)?;
    let probe = LatencyProbe::new(Arc::new(client), config.target_url.clone());

    let logger = loggers.create_logger("APP");
    runtime.block_on(
        logger
            .info(&format!("{} v{} starting", PKG_NAME, VERSION))
            .field("target_url", &config.target_url)
            .field("inspector", config.inspector_enabled)
            .field("headless", cli.once)
            .log(),
    );

    if cli.once {
        return run_once(&runtime, &probe, &loggers);
    }

    let dispatcher = RequestDispatcher::new(probe, LatencyState::new(), runtime.handle().clone(), &loggers);
    let navigator = Navigator::new(Arc::new(SystemUrlOpener), config.channel_url.clone());
    let app = App::new(dispatcher, navigator, store, Theme::new(config.enable_color), logger);

    run_tui(app, config.tick())
}

/// stderr in headless mode so stdout carries only the result, a file behind the TUI
fn log_sink(config: &Config, headless: bool) -> Result<LogSink> {
    match (&config.log_file, headless) {
        (Some(path), _) => LogSink::file(path),
        (None, true) => Ok(LogSink::Stderr),
        (None, false) => LogSink::file(&config.tui_log_file()),
    }
}

fn run_once(runtime: &Runtime, probe: &LatencyProbe, loggers: &LoggerFactory) -> Result<()> {
    match runtime.block_on(probe.measure()) {
        Ok(latency) => {
            println!("{}", latency.message());
            Ok(())
        }
        Err(e) => {
            runtime.block_on(loggers.create_error_logger().log_error(&e, Some("latency measurement"), None));
            Err(e)
        }
    }
}
