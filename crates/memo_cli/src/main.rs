//! Memo command-line front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the configured backend.
//! - Drive the core store, form and viewer from subcommands.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use memo_core::{
    init_from_config, open_repository, AppConfig, MemoAdapter, MemoStore, NoSeed, SampleData,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    if let Err(err) = init_from_config(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={} backend={}",
        memo_core::core_version(),
        config.storage.backend.as_str()
    );

    let repo = open_repository(&config.storage).context("failed to open memo storage")?;
    let mut store = MemoStore::new(MemoAdapter::new(repo));
    if config.store.seed_sample_data {
        store.initialize(&SampleData);
    } else {
        store.initialize(&NoSeed);
    }

    let result = commands::run(&mut store, cli.command);
    let _adapter = store.teardown();
    result
}
