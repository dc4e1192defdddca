mod bill;
mod holidays;
mod plan;

use std::{fs::File, path::PathBuf};

use clap::{Parser, Subcommand};
use wattbill_core::UsageSample;

pub use self::{
    bill::{BillArgs, CompareArgs},
    holidays::HolidaysArgs,
};
use crate::{prelude::*, usage::read_samples};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the monthly bills of one rate plan.
    #[clap(name = "bill")]
    Bill(Box<BillArgs>),

    /// Compare the totals of all rate plans.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// List the observed holidays of a year.
    #[clap(name = "holidays")]
    Holidays(HolidaysArgs),
}

#[derive(Parser)]
pub struct UsageArgs {
    /// Hourly usage export with `Hour` and `kWh` columns.
    #[clap(long = "usage", env = "USAGE_PATH")]
    path: PathBuf,

    /// Number of disclaimer lines before the header.
    #[clap(long = "skip-lines", env = "USAGE_SKIP_LINES", default_value = "0")]
    skip_lines: usize,
}

impl UsageArgs {
    pub fn read(&self) -> Result<Vec<UsageSample>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        read_samples(file, self.skip_lines)
    }
}
