//! Reproduce time-of-use and demand-charge electricity bills from hourly usage exports.

mod cli;
mod prelude;
mod tables;
mod usage;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Bill(args) => args.run()?,
        Command::Compare(args) => args.run()?,
        Command::Holidays(args) => args.run(),
    }

    info!("done!");
    Ok(())
}
