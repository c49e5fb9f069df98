use anyhow::Context;
use clap::Parser;

use snip_server::{ServerConfig, SnipServer};
use snip_store::{PasteStore, StoreConfig};
use snip_types::Ttl;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let sweep_interval = Ttl::parse(&args.sweep_interval)
        .context("invalid --sweep-interval")?
        .as_duration();

    let store =
        PasteStore::with_config(StoreConfig::default().with_sweep_interval(sweep_interval));
    let config = ServerConfig {
        bind_addr: args.listen,
        public_base: args.public_base,
        block_secrets: args.block_secrets,
    };

    let server = SnipServer::new(config, store.clone());
    let result = server.serve().await;

    // Stop the sweeper before exiting.
    store.shutdown();
    result.map_err(Into::into)
}
