//! sqlpp command line.

use clap::Parser;
use tracing::info;

use sqlpp::cli::{self, Cli, Commands};
use sqlpp::{config, logger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    logger::init();

    match args.command {
        Commands::Configcheck => {
            cli::config_check(&args.config)?;
            info!("✅ \"{}\" is valid", args.config.display());
        }

        Commands::Transform {
            query,
            args: json,
            dialect,
        } => {
            let config = config::load(&args.config)?;
            let dialect = dialect.unwrap_or(config.dialect);
            cli::print_transform(dialect, &query, &json)?;
        }
    }

    Ok(())
}
