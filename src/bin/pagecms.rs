//! pagecms server binary
//!
//! Command-line entrypoint for the multi-tenant page content API.
//!
//! # Examples
//!
//! ```bash
//! # Start the server
//! pagecms serve --bind 0.0.0.0 --port 4000
//!
//! # Show version
//! pagecms version
//! ```

use clap::{Args, Parser, Subcommand};
use pagecms::server::{start_server, ServerConfig};
use pagecms::store::PageStore;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// pagecms - Multi-tenant page content API
#[derive(Parser, Debug)]
#[command(name = "pagecms")]
#[command(version = pagecms::VERSION)]
#[command(about = "Multi-tenant page content API", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Log directory path
    #[arg(long, global = true, default_value = "logs", env = "PAGECMS_LOG_DIR")]
    log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the pagecms server
    Serve(ServeArgs),

    /// Show server version
    Version,
}

/// Server configuration arguments
#[derive(Args, Debug)]
struct ServeArgs {
    /// HTTP bind address
    #[arg(short, long, default_value = "0.0.0.0", env = "PAGECMS_BIND")]
    bind: String,

    /// HTTP port
    #[arg(short, long, default_value = "4000", env = "PAGECMS_PORT")]
    port: u16,

    /// Enable CORS
    #[arg(long, default_value = "true")]
    cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    match cli.command {
        Commands::Serve(args) => serve_command(args).await,
        Commands::Version => {
            println!("pagecms {}", pagecms::VERSION);
            Ok(())
        }
    }
}

/// Setup logging with rolling files and console output
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    std::fs::create_dir_all(&cli.log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &cli.log_dir, "pagecms.log");

    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(!cli.no_color),
        )
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    Ok(())
}

/// Serve command - start the pagecms server
async fn serve_command(args: ServeArgs) -> anyhow::Result<()> {
    info!(version = %pagecms::VERSION, "pagecms starting");

    let store = PageStore::in_memory();

    let config = ServerConfig {
        http_addr: args.bind,
        http_port: args.port,
        enable_cors: args.cors,
    };

    start_server(config, store).await
}
