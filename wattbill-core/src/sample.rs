use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use wattbill_quantities::KilowattHours;

use crate::error::InvalidInput;

/// One hour of metered consumption.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    pub date: NaiveDate,

    /// Hour of day, `0..=23`.
    pub hour: u32,

    #[serde(rename = "kwh")]
    pub energy: KilowattHours,
}

impl UsageSample {
    pub fn try_new(
        date: NaiveDate,
        hour: u32,
        energy: KilowattHours,
    ) -> Result<Self, InvalidInput> {
        Ok(Self { date, hour: check_hour(hour)?, energy: check_energy(energy)? })
    }

    #[must_use]
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::of(self.date)
    }
}

pub(crate) const fn check_hour(hour: u32) -> Result<u32, InvalidInput> {
    if hour < 24 { Ok(hour) } else { Err(InvalidInput::HourOutOfRange(hour)) }
}

pub(crate) fn check_energy(energy: KilowattHours) -> Result<KilowattHours, InvalidInput> {
    if energy.is_finite() && !energy.is_negative() {
        Ok(energy)
    } else {
        Err(InvalidInput::InvalidConsumption(energy))
    }
}

/// Calendar month that a bill covers.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    DeserializeFromStr,
    SerializeDisplay,
)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    pub const fn try_new(year: i32, month: u32) -> Result<Self, InvalidInput> {
        if matches!(month, 1..=12) {
            Ok(Self { year, month })
        } else {
            Err(InvalidInput::InvalidMonth(month))
        }
    }

    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    pub(crate) fn check_contains(self, date: NaiveDate) -> Result<NaiveDate, InvalidInput> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(InvalidInput::OutsidePeriod { date, period: self })
        }
    }
}

impl Display for BillingPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = InvalidInput;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidInput::MalformedPeriod(text.to_owned());
        let (year, month) = text.trim().split_once('-').ok_or_else(malformed)?;
        let year = year.parse().map_err(|_| malformed())?;
        let month = month.parse().map_err(|_| malformed())?;
        Self::try_new(year, month)
    }
}
