use clap::Parser;
use kamailio_binrpc::client::Client;
use kamailio_binrpc::config::BinRpcConfig;
use kamailio_binrpc::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Send a binrpc request to Kamailio's ctl listener
#[derive(Parser, Debug)]
#[command(name = "binrpc-invoke", version)]
struct Cli {
    /// RPC method to invoke, e.g. dispatcher.reload
    #[arg(required_unless_present = "print_config")]
    method: Option<String>,

    /// Kamailio host (overrides config and BINRPC_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Kamailio binrpc port (overrides config and BINRPC_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", BinRpcConfig::example_config());
        return ExitCode::SUCCESS;
    }

    let Some(method) = cli.method else {
        return ExitCode::FAILURE;
    };

    let loaded = match &cli.config {
        Some(path) => BinRpcConfig::from_file(path),
        None => BinRpcConfig::from_env(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(host) = cli.host {
        config.client.host = host;
    }
    if let Some(port) = cli.port {
        config.client.port = port;
    }

    init_logging(&config.logging);

    if let Err(e) = config.validate_strict() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let client = Client::from_config(&config);
    let status = match client.invoke(&method).await {
        Ok(cookie) => {
            info!(method = %method, cookie = %format!("{cookie:08x}"), "Request sent");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(method = %method, error = %e, "Request failed");
            ExitCode::FAILURE
        }
    };
    client.metrics().log_metrics();
    status
}
