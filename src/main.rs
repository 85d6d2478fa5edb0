//! unified-agents binary entry point

use std::process::ExitCode;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;
use unified_agents::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Install error handler
    color_eyre::install()?;

    // Credentials may come from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Version) => {
            println!("unified-agents version {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::CheckConfig) => {
            let config = cli.load_config()?;
            commands::check_config(&config)?;
        }
        Some(Commands::Create { file }) => {
            let config = cli.load_config()?;
            if !commands::create(&config, file).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Serve { .. }) | None => {
            let config = cli.load_config()?;
            commands::serve(&config).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        "unified_agents=debug,tower_http=debug"
    } else {
        "unified_agents=info,tower_http=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
