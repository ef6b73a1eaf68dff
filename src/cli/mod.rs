//! CLI dispatch
//!
//! `run()` owns all startup work: configuration, store construction, table
//! registration, and the tokio runtime. `main.rs` only delegates here.

mod args;

pub use args::{Cli, Command};

use std::sync::Arc;

use crate::http_server::{create_users_table, HttpServer, HttpServerConfig};
use crate::store::MemoryStore;

/// Parses arguments and runs the selected command
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { host, port } => serve(host, port),
    }
}

/// Builds the store and serves until interrupted
fn serve(host: Option<String>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = HttpServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let store = Arc::new(MemoryStore::new());
        create_users_table(&store).await?;

        let server = HttpServer::with_config(config, store)?;
        server.start().await?;
        Ok(())
    })
}
