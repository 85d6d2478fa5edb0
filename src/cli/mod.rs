//! CLI argument parsing and command routing

pub mod commands;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};

use crate::{config::Config, error::Result};

/// unified-agents: one API for creating Vapi and Retell voice agents
#[derive(Debug, Parser)]
#[command(name = "unified-agents")]
#[command(about = "Unified HTTP API for creating voice agents on Vapi and Retell", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ~/.config/unified-agents/config.json when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,

        /// Timeout for each vendor call, in seconds
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,
    },

    /// Create one agent from a JSON file without starting the server
    Create {
        /// Request body file (`-` reads standard input)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the resolved configuration and check credentials
    CheckConfig,

    /// Show version information
    Version,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Load configuration and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file or environment is invalid
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(Commands::Serve { bind, timeout_secs }) = &self.command {
            if let Some(bind) = bind {
                config.bind = *bind;
            }
            if let Some(secs) = timeout_secs {
                config.request_timeout = Duration::from_secs(*secs);
            }
        }

        Ok(config)
    }
}
