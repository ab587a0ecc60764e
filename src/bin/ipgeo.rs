use std::process::ExitCode;

use clap::Parser;
use ipgeo::{IpInfoFetcher, IpgeoConfig};
use tracing::{debug, Level};

mod commands;

use commands::lookup::LookupArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default $HOME/.ipgeo.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(flatten)]
    lookup: LookupArgs,
}

fn main() -> ExitCode {
    // Environment overrides (IPGEO_*) may come from a local .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // stdout is reserved for the lookup result
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match IpgeoConfig::new(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    debug!("Loaded configuration:\n{}", config.summary());

    commands::lookup::run(cli.lookup, &config, &IpInfoFetcher::new())
}
