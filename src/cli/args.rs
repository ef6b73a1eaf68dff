//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

/// memodb - a schema-validated in-memory table store behind a CRUD HTTP API
#[derive(Parser, Debug)]
#[command(name = "memodb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Host to bind, overrides the HOST environment variable
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides the PORT environment variable
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
