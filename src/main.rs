//! db-rowmap - Main entry point.
//!
//! Connects to one database, runs a query or a batch of update statements and
//! prints the result to stdout. Logs go to stderr.

use clap::Parser;
use db_rowmap::config::{Command, Config};
use db_rowmap::db::{DbConnection, Session};
use db_rowmap::error::DbResult;
use db_rowmap::format::{format_result, format_update};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(session: &mut Session<DbConnection>, command: &Command, config: &Config) -> DbResult<String> {
    match command {
        Command::Query { sql } => {
            let started = Instant::now();
            let result = session.query(sql).await?;
            info!(row_count = result.row_count(), "Query finished");
            Ok(format_result(&result, config.format, started.elapsed()))
        }
        Command::Update {
            transaction,
            statements,
        } => {
            if *transaction {
                session.set_auto_commit(false).await?;
            }

            let mut output = String::new();
            for sql in statements {
                let started = Instant::now();
                match session.execute_update(sql).await {
                    Ok(rows_affected) => {
                        output.push_str(&format_update(rows_affected, started.elapsed()))
                    }
                    Err(e) => {
                        if *transaction {
                            if let Err(rollback_err) = session.rollback().await {
                                warn!(error = %rollback_err, "Rollback failed");
                            }
                        }
                        return Err(e);
                    }
                }
            }

            if *transaction {
                session.commit().await?;
            }
            Ok(output)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    let connection_config = config.connection_config()?;
    info!(
        db_type = %connection_config.db_type,
        "Starting db-rowmap v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut session = match Session::open(&connection_config).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Connection failed");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Hint: {}", suggestion);
            }
            return Err(e.into());
        }
    };

    let result = run(&mut session, &config.command, &config).await;
    session.close().await;

    match result {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Hint: {}", suggestion);
            }
            Err(e.into())
        }
    }
}
