//! Configuration handling for the db-rowmap CLI.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use crate::format::OutputFormat;
use crate::models::{ConnectionConfig, ConnectionConfigError};
use clap::{Parser, Subcommand};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration for the db-rowmap CLI.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "db-rowmap",
    about = "Run SQL against MySQL, PostgreSQL or SQLite and print the mapped rows",
    version
)]
pub struct Config {
    /// Connection URL: mysql://, mariadb://, postgres://, postgresql://, sqlite: or mssql://
    #[arg(short = 'd', long, value_name = "URL", env = "DB_ROWMAP_DATABASE")]
    pub database: String,

    /// User name; overrides any user in the URL
    #[arg(short, long, env = "DB_ROWMAP_USER")]
    pub user: Option<String>,

    /// Password; overrides any password in the URL
    #[arg(short, long, env = "DB_ROWMAP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Extra driver property, passed as a URL query parameter.
    /// Can be specified multiple times.
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Output format for query results
    #[arg(
        short,
        long,
        value_enum,
        default_value = "json",
        env = "DB_ROWMAP_FORMAT"
    )]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "DB_ROWMAP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "DB_ROWMAP_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run a query and print its rows
    Query {
        /// SQL text, sent to the server as-is
        sql: String,
    },
    /// Run update statements and print the affected row counts
    Update {
        /// Run every statement in one transaction; roll back on the first failure
        #[arg(long)]
        transaction: bool,
        /// SQL statements, executed in order
        #[arg(required = true)]
        statements: Vec<String>,
    },
}

impl Config {
    /// Build the connection configuration from the URL, credentials and properties.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConnectionConfigError> {
        let mut config = ConnectionConfig::new(self.database.as_str())?;
        config.user = self.user.clone();
        config.password = self.password.clone();
        for (key, value) in &self.properties {
            config = config.with_property(key.as_str(), value.as_str());
        }
        Ok(config)
    }
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
