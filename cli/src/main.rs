//! LanCrypt CLI - ephemeral encrypted file transfer on the local network.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lancrypt")]
#[command(about = "Secure, peer-to-peer file sharing on a local network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a file to a peer on the local network
    Send {
        /// Path of the file to send
        path: PathBuf,

        /// Optional passphrase for extra security
        #[arg(short, long, default_value = "")]
        passphrase: String,
    },
    /// Receive a file from a peer on the local network
    Recv {
        /// The transfer code from the sender
        #[arg(short, long)]
        code: String,

        /// Optional passphrase for extra security
        #[arg(short, long, default_value = "")]
        passphrase: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("lancrypt_core=warn".parse()?)
                .add_directive("mdns_sd=error".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send { path, passphrase } => commands::send(path, passphrase).await?,
        Commands::Recv { code, passphrase } => commands::recv(code, passphrase).await?,
    }

    Ok(())
}
