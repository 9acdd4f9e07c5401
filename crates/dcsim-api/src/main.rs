use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use dcsim_api::http::{run, HttpServerConfig};

#[derive(Parser)]
#[command(name = "dcsim-api", version, about = "HTTP JSON service for DC netlist solving")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HttpServerConfig {
        bind_addr: cli.addr,
    };
    if let Err(err) = run(config).await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
