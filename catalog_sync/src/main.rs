//! Catalog Sync - wiki mod names reconciled with market items
//!
//! Runs one sync cycle, prints order statistics for an item, or shows a slot.

use catalog_sync::config::{Cli, Command, SyncConfig};
use catalog_sync::stats::format_statistics;
use catalog_sync::{
    analyze_orders, CatalogSync, Crawler, FileSnapshotStore, HttpPageFetcher, MarketClient,
    SnapshotStore, WikiModSource,
};
use clap::Parser;
use market_common::{CatalogError, Result};

fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=catalog_sync=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();
    log::info!("Data directory: {}", config.data_dir.display());

    if let Err(e) = run(&cli.command, &config) {
        log::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: &Command, config: &SyncConfig) -> Result<()> {
    match command {
        Command::Sync { .. } => run_sync(command, config),
        Command::Orders {
            url_name, locale, ..
        } => {
            let filter = command.order_filter().unwrap_or_default();
            let client = MarketClient::new(config.market.clone())?;
            let orders = client.fetch_orders(url_name, *locale)?;

            match analyze_orders(&orders, &filter) {
                Some(stats) => print!("{}", format_statistics(url_name, &filter, &stats)),
                None => println!("No orders for {url_name} with parameters: {filter}"),
            }
            Ok(())
        }
        Command::Show { slot } => {
            let store = FileSnapshotStore::new(&config.data_dir);
            let names = store.get(slot)?.ok_or_else(|| CatalogError::MissingSnapshot {
                slot: slot.name(),
            })?;
            for name in &names {
                println!("{name}");
            }
            log::info!("{}: {} names", slot, names.len());
            Ok(())
        }
    }
}

fn run_sync(command: &Command, config: &SyncConfig) -> Result<()> {
    let market = MarketClient::new(config.market.clone())?;
    let fetcher = HttpPageFetcher::new(config.timeout)?;
    let crawler = Crawler::new(fetcher, &config.crawl)?;
    let wiki = WikiModSource::new(crawler, config.wiki.clone());

    let mut store = FileSnapshotStore::new(&config.data_dir);
    let report = CatalogSync::new(market, wiki)
        .with_policy(command.policy())
        .run_cycle(&mut store)?;

    print!("{report}");
    Ok(())
}
