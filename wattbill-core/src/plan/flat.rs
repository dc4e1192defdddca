use chrono::NaiveDate;
use enumset::EnumSet;
use wattbill_quantities::{Cost, KilowattHourRate};

use crate::{
    holiday::RuleCalendar,
    level::{Level, TimeOfUse},
    plan::RatePlan,
    prelude::*,
    season::{SeasonBand, SeasonTable},
};

/// Prepaid plan: one seasonal per-kWh rate around the clock, no demand or service charge.
#[derive(Clone, Debug)]
#[must_use]
pub struct FlatPlan {
    time_of_use: TimeOfUse,
}

impl FlatPlan {
    pub fn try_new() -> Result<Self, ConfigurationError> {
        let seasons = SeasonTable::try_new(
            EnumSet::only(Level::OffPeak),
            false,
            vec![
                SeasonBand::builder()
                    .name("winter")
                    .months(vec![1..=4, 11..=12])
                    .rate(Level::OffPeak, 0.0782)
                    .build(),
                SeasonBand::builder()
                    .name("summer")
                    .months(vec![5..=6, 9..=10])
                    .rate(Level::OffPeak, 0.1114)
                    .build(),
                SeasonBand::builder()
                    .name("summer peak")
                    .months(vec![7..=8])
                    .rate(Level::OffPeak, 0.1185)
                    .build(),
            ],
        )?;
        // No on-peak windows, so holidays make no difference:
        Ok(Self { time_of_use: TimeOfUse::new(RuleCalendar::default(), seasons) })
    }
}

impl RatePlan for FlatPlan {
    fn display_name(&self) -> &'static str {
        "SRP/M-Power (Prepaid)"
    }

    fn fixed_charge(&self) -> Cost {
        Cost::ZERO
    }

    fn energy_rate(&self, date: NaiveDate, hour: u32) -> Result<KilowattHourRate> {
        self.time_of_use.rate(date, hour)
    }
}
