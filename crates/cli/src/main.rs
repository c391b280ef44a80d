//! nozomi CLI - tools for exercising the webhook by hand.
//!
//! # Usage
//!
//! ```bash
//! # Print the Slack headers for a body, signed with SLACK_SIGNING_SECRET
//! nozomi sign --body 'team_id=T1&text=echo+hi'
//!
//! # Sign with a fixed timestamp
//! nozomi sign --body 'team_id=T1&text=echo+hi' --timestamp 1700000000
//!
//! # Show how the webhook decodes a form body
//! nozomi decode 'team_id=T1&text=createTestIssue+title+body'
//! ```
//!
//! # Commands
//!
//! - `sign` - Compute `X-Slack-Request-Timestamp` and `X-Slack-Signature`
//! - `decode` - Print decoded form fields, sorted by key

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nozomi")]
#[command(author, version, about = "nozomi webhook tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a request body the way Slack does
    Sign {
        /// Raw form body to sign
        #[arg(short, long)]
        body: String,

        /// Unix timestamp to sign with (defaults to now)
        #[arg(short, long)]
        timestamp: Option<i64>,
    },
    /// Decode a form body into its fields
    Decode {
        /// Raw form body
        body: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Sign { body, timestamp } => {
            let secret = commands::sign::secret_from_env()?;
            let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
            commands::sign::signed_headers(&secret, &body, timestamp)?
        }
        Commands::Decode { body } => commands::decode::describe(&body),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
