mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rc_core::config::Config;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelcast=trace,rc_core=trace,rc_server=trace,tower_http=debug".to_string()
        } else {
            "reelcast=info,rc_core=info,rc_server=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start {
            host,
            port,
            media_dir,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(cli.config.as_deref(), host, port, media_dir))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn start_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    media_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags take precedence over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = media_dir {
        config.server.media_dir = dir;
    }

    tracing::info!("Starting reelcast server");
    rc_server::start(config).await?;
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Media dir: {}", config.server.media_dir.display());
    println!(
        "  Chunk size: {} bytes ({} kbps x {}s)",
        config.streaming.max_chunk_bytes(),
        config.streaming.bitrate_kbps,
        config.streaming.chunk_duration_secs
    );
    println!("  Cache TTL: {}s", config.cache.ttl_secs);

    for warning in config.validate() {
        println!("  Warning: {warning}");
    }

    Ok(())
}
