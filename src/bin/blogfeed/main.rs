use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use blogfeed::feed_file::write_feed_file;
use blogfeed::logger::configure_logger;
use blogfeed::server::server_run;

use crate::config::{generate_cfg, open_config};

mod config;
mod config_data;

const CFG_FILE_NAME: &str = "blogfeed.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serves /feed.xml over HTTP (default)
    Serve,
    /// Writes the feed document to a file
    Build {
        /// Output file
        #[arg(short, long, default_value = "feed.xml")]
        out: PathBuf,
    },
    /// Writes a sample configuration file
    SampleConfig {
        /// Output file. Defaults to the user config directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Serve);

    let out_file = match command {
        Command::SampleConfig { out } => {
            let path = generate_cfg(out)?;
            println!("Sample config written to {}", path.display());
            return Ok(());
        }
        Command::Build { out } => Some(out),
        Command::Serve => None,
    };

    let config_path = args.config_path.map(PathBuf::from);
    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run blogfeed --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match out_file {
        Some(out) => {
            info!("Building feed for {}", config.site.url);
            write_feed_file(&config, &out).await?;
        }
        None => {
            info!("Starting blogfeed =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
            info!("Listening on {}:{}", config.server.address, config.server.port);
            server_run(config).await?;
        }
    }

    Ok(())
}
