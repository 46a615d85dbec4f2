//! Apktool MCP Server

use clap::Parser;
use tracing::{info, error, debug, warn};
use tracing_subscriber::{EnvFilter, fmt};
use rmcp::{ServiceExt, transport::stdio};

use apktool_mcp::{command, config::Args, ApktoolToolHandler, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("Starting Apktool MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_args(&args);

    // Non-fatal: each tool call still reports its own error, this is just
    // an early heads-up in the server log.
    if !command::tool_available(&config.apktool_path).await {
        warn!(
            "apktool not found at '{}'. Install it before using decode/build tools: \
             https://apktool.org/docs/install",
            config.apktool_path
        );
    }

    let service = ApktoolToolHandler::new(config)?
        .serve(stdio()).await.inspect_err(|e| {
            error!("Serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}


fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false);

    if let Some(log_file) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        subscriber.with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    debug!("Logging initialized with level: {}", args.log_level);
    Ok(())
}
