use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use phasebridge::{wait_for_shutdown_signal, BridgeConfig};

#[derive(Parser, Debug)]
#[command(name = "phasebridge")]
#[command(about = "Phase-ordered lifecycle host for self-driving managed processes")]
#[command(version)]
#[command(long_about = "Declares worker processes from a TOML file, wraps every marked \
process in a lifecycle adapter, starts the adapters in ascending phase order and stops \
them in descending order on SIGINT or SIGTERM.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "phasebridge.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting anything")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print an example configuration in TOML format and exit")]
    print_config: bool,

    /// Run the registration pass and print the declarations
    #[arg(long, help = "Run the adapter registration pass and print the declarations as JSON")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting phasebridge v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match BridgeConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let builder = config.container_builder()?;

    if args.dry_run {
        let prepared = builder.prepare().map_err(|e| {
            error!("Registration pass failed: {}", e);
            e
        })?;
        info!(
            "Dry run: {} lifecycle adapters registered",
            prepared.adapter_names().len()
        );
        println!("{}", serde_json::to_string_pretty(&prepared.summaries())?);
        return Ok(());
    }

    // Starting blocks on process startup, keep it off the async workers.
    let container = tokio::task::spawn_blocking(move || builder.refresh())
        .await?
        .map_err(|e| {
            error!("Failed to start components: {}", e);
            e
        })?;

    info!(
        "Running {} lifecycle components",
        container.lifecycle_names().len()
    );

    let signal = wait_for_shutdown_signal().await?;
    info!("Received {}, shutting down", signal);

    let exit_code = tokio::task::spawn_blocking(move || container.close()).await?;

    info!("phasebridge exited with code: {}", exit_code);
    std::process::exit(exit_code);
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("phasebridge={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_names(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_names(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print an example configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# phasebridge configuration file");
    println!("#");
    println!("# [host]");
    println!("#   phase_stop_timeout_ms    how long each stop phase waits for its members");
    println!("#   stop_on_startup_failure  stop started components when a start fails");
    println!("#");
    println!("# [[components]]  one worker process per entry, registered in file order");
    println!("#   name               unique component name");
    println!("#   scope              \"singleton\" (default) or \"prototype\"");
    println!("#   lifecycle          marker requesting a lifecycle adapter:");
    println!("#                      bean_name, auto_startup, async_start, phase, stop_on_destroy");
    println!("#   factory_lifecycle  marker that replaces `lifecycle` entirely when set");
    println!("#   worker             startup_ms, shutdown_ms, fail_on_stop");
    println!("#");
    println!("# Environment overrides use the PHASEBRIDGE_ prefix, for example");
    println!("# PHASEBRIDGE_HOST__PHASE_STOP_TIMEOUT_MS=5000");
    println!();
    println!("{}", BridgeConfig::example().to_toml()?);
    Ok(())
}
