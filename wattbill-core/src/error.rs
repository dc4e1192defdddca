use chrono::NaiveDate;
use wattbill_quantities::{KilowattHours, Kilowatts};

use crate::{level::Level, sample::BillingPeriod};

/// Everything that can go wrong while billing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tariff table itself is wrong: abort, never guess a rate.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The caller passed something outside the billing domain.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("month {0} is not mapped to any season")]
    UnmappedMonth(u32),

    #[error("month {month} is mapped to both `{first}` and `{second}`")]
    DuplicateMonth { month: u32, first: String, second: String },

    #[error("season `{season}` mentions month {month}, which does not exist")]
    InvalidMonth { season: String, month: u32 },

    #[error("season `{season}` defines no rate for the {level} level")]
    MissingRate { season: String, level: Level },

    #[error("season `{season}` defines a rate for the {level} level, which the plan does not use")]
    UnexpectedRate { season: String, level: Level },

    #[error("season `{season}` has no demand tiers but the plan bills demand")]
    MissingDemandTiers { season: String },

    #[error("season `{season}` has an invalid on-peak window {start}..{end}")]
    InvalidPeakWindow { season: String, start: u32, end: u32 },

    #[error("the plan defines no usage levels")]
    NoLevels,

    #[error("unknown usage level {0}")]
    UnknownLevel(u8),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InvalidInput {
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(u32),

    #[error("consumption must be a non-negative finite number, got {0:?}")]
    InvalidConsumption(KilowattHours),

    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),

    #[error("`{0}` is not a billing period, expected `YYYY-MM`")]
    MalformedPeriod(String),

    #[error("{date} does not belong to the billing period {period}")]
    OutsidePeriod { date: NaiveDate, period: BillingPeriod },

    #[error("{0} has no season")]
    NoSeason(NaiveDate),

    #[error("the demand schedule has no peak for {0}")]
    MissingScheduledDemand(BillingPeriod),

    #[error("scheduled peak for {period} must be a non-negative finite number, got {demand:?}")]
    InvalidScheduledDemand { period: BillingPeriod, demand: Kilowatts },
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
