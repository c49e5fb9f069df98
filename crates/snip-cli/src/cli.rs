use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "snipd",
    about = "Ephemeral, versioned paste store daemon",
    version,
)]
pub struct Args {
    /// HTTP listen address
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Public base URL for rendered links (e.g. https://paste.example.com)
    #[arg(long)]
    pub public_base: Option<String>,

    /// Expiry sweeper interval, duration syntax (e.g. 30s, 5m)
    #[arg(long, default_value = "30s")]
    pub sweep_interval: String,

    /// Reject pastes whose content trips the secret scanner
    #[arg(long)]
    pub block_secrets: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}
