//! aebridged - receive Apple Events and print them as JSON lines.
//!
//! Installs the `[[handlers]]` from the configuration, prints every
//! received event to stdout and answers it with an empty reply.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use aebridge_config::{BridgeConfig, ShowFormat};
use aebridge_host::config_bridge;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Apple Event receiver
#[derive(Parser)]
#[command(name = "aebridged")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file layered over ~/.aebridge/config.toml
    #[arg(short, long, global = true, env = "AEBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive the configured events until interrupted
    Run,

    /// Print the resolved configuration
    Config {
        /// Print JSON instead of annotated TOML
        #[arg(long)]
        json: bool,

        /// Only this section
        #[arg(long)]
        section: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let resolved = BridgeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let mut log_config = config_bridge::to_log_config(&resolved.config)?;
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = aebridge_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Run => run(&resolved.config),
        Commands::Config { json, section } => {
            let format = if json { ShowFormat::Json } else { ShowFormat::Toml };
            let out = resolved
                .show(format, section.as_deref())
                .map_err(|_| anyhow::anyhow!("unknown config section"))?;
            println!("{out}");
            Ok(())
        },
    }
}

#[cfg(target_os = "macos")]
async fn print_record(
    record: aebridge_core::EventRecord,
) -> Result<Option<serde_json::Value>, aebridge_host::HandlerError> {
    let line = serde_json::to_string(&record).map_err(anyhow::Error::from)?;
    println!("{line}");
    Ok(None)
}

#[cfg(target_os = "macos")]
fn run(cfg: &BridgeConfig) -> Result<()> {
    use aebridge_events::channel;
    use aebridge_events::platform::macos;
    use aebridge_host::Router;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let bridge = macos::init_with_runtime(
        config_bridge::to_bridge_options(cfg)?,
        runtime.handle().clone(),
    );
    let (dispatcher, queue) = channel(config_bridge::queue_capacity(cfg));
    bridge.set_dispatcher(dispatcher);

    let mut router = Router::new();
    for (suite, event) in config_bridge::to_handler_codes(cfg)? {
        router.route(suite, event, print_record);
    }
    if router.is_empty() {
        anyhow::bail!("no [[handlers]] configured");
    }
    router.install_all(bridge)?;

    let server = runtime.spawn(router.serve(queue));
    runtime.spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping");
        }
        macos::stop_event_loop();
    });

    macos::run_event_loop();
    server.abort();
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(_cfg: &BridgeConfig) -> Result<()> {
    anyhow::bail!("Apple Events are only available on macOS")
}
