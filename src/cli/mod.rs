use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod calendar;
pub mod serve;
pub mod status;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Print the appointment calendar for a month
    Calendar {
        /// Month to show as YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,

        /// Day to highlight as YYYY-MM-DD
        #[arg(long)]
        selected: Option<String>,
    },
    /// Show database connection and security status
    Status {},
    /// Check the database connection, exits non-zero on failure
    TestConnection {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Calendar { month, selected }) => {
            calendar::run(month, selected, config).await?;
        }
        Some(Command::Status {}) => {
            status::run(config).await?;
        }
        Some(Command::TestConnection {}) => {
            status::test_connection(config).await?;
        }
        None => {}
    }

    Ok(())
}
