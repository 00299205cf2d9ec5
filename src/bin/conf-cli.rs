use clap::{Parser, Subcommand};
use std::path::PathBuf;

use service_conf::config::loader;
use service_conf::config::ServiceConfig;

#[derive(Parser)]
#[command(name = "conf-cli")]
#[command(about = "Offline helpers for service configuration files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a config file and print it as JSON
    Check {
        /// Path to the TOML file
        path: PathBuf,
    },
    /// Print the default configuration as TOML
    Defaults,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path } => {
            let config: ServiceConfig = match loader::read_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Defaults => {
            print!("{}", toml::to_string_pretty(&ServiceConfig::default())?);
        }
    }

    Ok(())
}
