//! error-resetter CLI - kicks bare metal nodes out of a known error state.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inventory::InventoryClient;
use notify::{Notifier, NotifyEvent};
use resetter::{classify, report, workflow, RetryPolicy, TOOL_NAME};

/// Reset bare metal nodes stuck in a common, known error state.
#[derive(Parser)]
#[command(name = "error-resetter")]
#[command(about = "Reset bare metal nodes stuck in a common, known error state")]
struct Cli {
    /// Inventory service base URL (or set `OS_BAREMETAL_URL` env var).
    #[arg(long, env = "OS_BAREMETAL_URL")]
    inventory_url: String,

    /// Auth token for the inventory service (or set `OS_AUTH_TOKEN` env var).
    #[arg(long, env = "OS_AUTH_TOKEN", hide_env_values = true)]
    auth_token: String,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the nodes we could treat, without touching anything.
    Info,

    /// Reset the eligible nodes and report the outcome.
    Reset {
        /// Go through the motions without any remote writes.
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let notifier = Notifier::from_env();

    let client = InventoryClient::new(&cli.inventory_url, &cli.auth_token)
        .context("Failed to create inventory client")?;

    let result = run(&cli, &client, &notifier).await;

    // A fatal error aborts the batch; report it to the sink before exiting.
    if let Err(e) = &result {
        notifier
            .notify_and_wait(NotifyEvent::RunFailure {
                tool: TOOL_NAME.to_string(),
                error: format!("{e:#}"),
                timestamp: chrono::Utc::now(),
            })
            .await;
    }

    result
}

async fn run(cli: &Cli, client: &InventoryClient, notifier: &Notifier) -> Result<()> {
    let nodes = client
        .list_nodes(true)
        .await
        .context("Failed to list nodes")?;
    let eligible = classify::eligible_nodes(&nodes);

    match cli.command {
        Commands::Info => {
            println!("{}", report::info_text(&nodes, &eligible));
        }

        Commands::Reset { dry_run } => {
            if eligible.is_empty() {
                if cli.verbose {
                    println!("Nothing to do.");
                }
                return Ok(());
            }

            println!("To correct: {eligible:?}");

            let summary =
                workflow::reset_nodes(client, &eligible, dry_run, RetryPolicy::default())
                    .await
                    .context("Reset pass failed")?;

            let message = summary.to_message();
            println!("{message}");

            if !dry_run {
                notifier
                    .notify_and_wait(NotifyEvent::RunReport {
                        tool: TOOL_NAME.to_string(),
                        message,
                        severity: summary.severity(),
                        timestamp: chrono::Utc::now(),
                    })
                    .await;
            }
        }
    }

    Ok(())
}
