//! SQLite MCP server
//!
//! ```bash
//! sqlite-mcp --database ./app.db
//! sqlite-mcp -d ./app.db --debug
//! ```
//!
//! Requests are read from stdin and responses written to stdout, so all
//! logging goes to stderr.

use std::process::ExitCode;

use clap::Parser;
use smcp::{pool::sqlite, Gateway, ToolHandler};

mod config;
mod rpc;
mod tools;

use config::{Args, Config};
use rpc::RpcServer;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!(
        "Starting SQLite MCP Server: {}",
        config.database_path.display()
    );

    let pool = match sqlite::Builder::file(&config.database_path)
        .max_size(config.max_connections)
        .min_idle(config.min_idle)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to initialize database: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Connected to SQLite database: {}",
        config.database_path.display()
    );

    let server = RpcServer::new(ToolHandler::new(Gateway::from_driver(pool)));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    log::info!("SQLite MCP Server started successfully");
    tokio::select! {
        res = rpc::serve(&server, stdin, stdout) => {
            if let Err(e) = res {
                log::error!("Server error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received shutdown signal, gracefully shutting down...");
        }
    }

    log::info!("SQLite MCP Server stopped");
    ExitCode::SUCCESS
}
