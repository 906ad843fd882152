//! scaleq — queue-driven autoscale settings for VM scale sets.
//!
//! # Usage
//!
//! ```text
//! scaleq init --subscription <id> --resource-group fuzz-rg --region eastus
//! scaleq ensure --scaleset <uuid> --min 0 --max 10 --queue-uri <queue resource uri>
//! scaleq list
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "scaleq",
    about = "Queue-driven autoscale settings for VM scale sets",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the autoscale profile that would be attached to a scale set
    Profile {
        /// Minimum instance count
        #[arg(long)]
        min: u32,
        /// Maximum (and default) instance count
        #[arg(long)]
        max: u32,
        /// Resource URI of the pool's work queue
        #[arg(long)]
        queue_uri: String,
    },
    /// List autoscale settings in the configured resource group
    List {
        #[arg(short, long, default_value = "scaleq.toml")]
        config: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Attach a queue-driven autoscale setting to a scale set unless it
    /// already has one
    Ensure {
        #[arg(short, long, default_value = "scaleq.toml")]
        config: PathBuf,
        /// Scale set id (UUID)
        #[arg(long)]
        scaleset: String,
        #[arg(long)]
        min: u32,
        #[arg(long)]
        max: u32,
        #[arg(long)]
        queue_uri: String,
        /// List the live group read-only and print the setting that would be
        /// created, without creating it
        #[arg(long)]
        dry_run: bool,
    },
    /// Write a scaffold scaleq.toml
    Init {
        #[arg(long)]
        subscription: String,
        #[arg(long)]
        resource_group: String,
        #[arg(long)]
        region: String,
        #[arg(short, long, default_value = "scaleq.toml")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,scaleq=debug"))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Profile { min, max, queue_uri } => {
            commands::profile::profile(min, max, &queue_uri)
        }
        Commands::List { config, format } => commands::list::list(&config, &format).await,
        Commands::Ensure {
            config,
            scaleset,
            min,
            max,
            queue_uri,
            dry_run,
        } => {
            commands::ensure::ensure(commands::ensure::EnsureArgs {
                config_path: &config,
                scaleset: &scaleset,
                min,
                max,
                queue_uri: &queue_uri,
                dry_run,
            })
            .await
        }
        Commands::Init {
            subscription,
            resource_group,
            region,
            out,
        } => commands::init::init(&subscription, &resource_group, &region, &out),
    }
}
