use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kvgrid_bridge::ValueBridge;
use kvgrid_capability::{detect, object, ModuleRegistry, StubAdapter, VectorCapability};
use kvgrid_store::Grid;
use kvgrid_tools::{
    register_all_tools, AccessPolicy, ConfigError, McpServer, ServerConfig, ToolContext,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const VECTOR_DISABLED: &str = "Vector collections are disabled on this server: \
     `vector.enabled` is false in the configuration or --no-vector was given.";

/// kvgrid - grid structures exposed as tools over stdio
#[derive(Parser, Debug)]
#[command(name = "kvgrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "KVGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Do not load the vector module
    #[arg(long)]
    no_vector: bool,
}

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error on stdio: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "kvgrid stopped");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ServerError> {
    let config = ServerConfig::load_or_default(args.config.as_deref())?;
    info!(
        instance = %config.instance_name,
        read_only = config.read_only,
        config = ?args.config,
        "starting kvgrid {}",
        env!("CARGO_PKG_VERSION")
    );

    let grid = Arc::new(
        Grid::new(config.instance_name.clone())
            .with_ring_buffer_capacity(config.ring_buffer_capacity),
    );
    let bridge = ValueBridge::json();
    let vectors = vector_capability(args, &config, &grid, &bridge);

    let context = ToolContext::new(grid, bridge, AccessPolicy::from_config(&config), vectors);
    let server = McpServer::new(config.instance_name.clone(), register_all_tools(), context);

    let stdin = io::stdin();
    server.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}

fn vector_capability(
    args: &Args,
    config: &ServerConfig,
    grid: &Arc<Grid>,
    bridge: &ValueBridge,
) -> Arc<dyn VectorCapability> {
    if args.no_vector || !config.vector.enabled {
        info!("vector support disabled by configuration");
        return Arc::new(StubAdapter::with_message(VECTOR_DISABLED));
    }

    let modules = ModuleRegistry::new();
    #[cfg(feature = "vector")]
    modules.install(&kvgrid_vector::VectorModule::new());

    detect(&modules, object(Arc::clone(grid)), bridge.clone())
}
