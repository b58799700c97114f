use std::path::{Path, PathBuf};

use clap::Parser;
use smcp::error::Result;
use smcp::pool::sqlite::{DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE};

/// SQLite MCP server: schema introspection, queries and statements over stdio
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlite-mcp", version)]
pub struct Args {
    /// Path to SQLite database file
    #[arg(short = 'd', long, env = "SMCP_DATABASE")]
    pub database: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Maximum number of open connections
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, default_value_t = DEFAULT_MIN_IDLE)]
    pub min_idle: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub debug: bool,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let config = Self {
            database_path: args.database,
            debug: args.debug,
            max_connections: args.max_connections,
            min_idle: args.min_idle,
        };
        config.validate()?;

        Ok(config)
    }

    /// A missing database file is fine as long as its directory exists.
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(smcp::error::configuration!("database path is required"));
        }

        if !self.database_path.exists() {
            let dir = match self.database_path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            if !dir.is_dir() {
                return Err(smcp::error::configuration!(
                    "database directory does not exist"
                ));
            }
        }

        if self.max_connections == 0 || self.min_idle > self.max_connections {
            return Err(smcp::error::configuration!(
                "invalid pool size: max_connections {}, min_idle {}",
                self.max_connections,
                self.min_idle
            ));
        }

        Ok(())
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
