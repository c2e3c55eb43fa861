//! Contract test CLI
//!
//! Usage:
//!   rimworld-gm-contract [--base-url URL]
//!   rimworld-gm-contract --mock [--mock-fault ROUTE]...

use anyhow::Result;
use clap::Parser;
use rimworld_gm_bridge::{DEFAULT_BASE_URL, HttpRemoteClient, RemoteConfig};
use rimworld_gm_contract::{ContractReport, ContractRunner, MockConfig, MockRemoteServer, MockRoute};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "rimworld-gm-contract",
    version,
    about = "Probe the RimWorld GM HTTP API contract"
)]
struct Cli {
    /// Base URL of the target API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Run against an embedded mock server instead of the target
    #[arg(long)]
    mock: bool,

    /// Force a mock route onto its error branch (health, state, event, message); implies --mock
    #[arg(long = "mock-fault", value_name = "ROUTE")]
    mock_faults: Vec<MockRoute>,
}

async fn run_contract(base_url: &str) -> Result<ContractReport> {
    let client = HttpRemoteClient::new(RemoteConfig::probe(base_url))?;
    Ok(ContractRunner::new(client).run().await)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let report = if cli.mock || !cli.mock_faults.is_empty() {
        let config = cli
            .mock_faults
            .iter()
            .fold(MockConfig::default(), |config, route| config.with_fault(*route));
        let mut mock = MockRemoteServer::start(config).await?;
        println!("Running against mock server at {}", mock.base_url());

        let report = run_contract(&mock.base_url()).await;
        mock.stop().await;
        report?
    } else {
        println!("Running against target {}", cli.base_url);
        run_contract(&cli.base_url).await?
    };

    print!("{}", report.render());
    Ok(ExitCode::from(report.exit_code()))
}
