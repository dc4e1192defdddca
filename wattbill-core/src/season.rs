//! Seasonal rate table.
//!
//! Tariff rates are filed numbers rather than formulas, so the table is a direct
//! `(season, level)` lookup, validated for completeness once at construction.

use std::{
    collections::BTreeMap,
    ops::{Range, RangeInclusive},
};

use bon::Builder;
use chrono::{Datelike, NaiveDate};
use enumset::EnumSet;
use wattbill_quantities::KilowattHourRate;

use crate::{level::Level, prelude::*, sample::BillingPeriod, tiered::DemandTiers};

/// Named group of calendar months sharing one set of rates and on-peak windows.
#[derive(Clone, Debug, Builder)]
#[must_use]
pub struct SeasonBand {
    #[builder(field)]
    rates: BTreeMap<Level, KilowattHourRate>,

    #[builder(into)]
    name: String,

    /// Month ranges, `1..=12`.
    months: Vec<RangeInclusive<u32>>,

    /// Half-open hour ranges: `17..21` covers hours 17, 18, 19 and 20.
    #[builder(default)]
    peak_windows: Vec<Range<u32>>,

    demand_tiers: Option<DemandTiers>,
}

impl<S: season_band_builder::State> SeasonBandBuilder<S> {
    pub fn rate(mut self, level: Level, rate: impl Into<KilowattHourRate>) -> Self {
        self.rates.insert(level, rate.into());
        self
    }
}

impl SeasonBand {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_peak_hour(&self, hour: u32) -> bool {
        self.peak_windows.iter().any(|window| window.contains(&hour))
    }

    fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.months.iter().flat_map(Clone::clone)
    }
}

/// Seasons partitioning the twelve months, each with a rate for every plan level.
#[derive(Clone, Debug)]
#[must_use]
pub struct SeasonTable {
    levels: EnumSet<Level>,
    seasons: Vec<SeasonBand>,

    /// Index into `seasons` by zero-based month.
    by_month: [usize; 12],
}

impl SeasonTable {
    /// Validate and build the table.
    ///
    /// Every month must belong to exactly one season, every season must have a rate for each
    /// of the `levels` and no others, on-peak windows must lie within a day, and, if the plan
    /// bills demand, every season must have demand tiers.
    pub fn try_new(
        levels: EnumSet<Level>,
        bills_demand: bool,
        seasons: Vec<SeasonBand>,
    ) -> Result<Self, ConfigurationError> {
        if levels.is_empty() {
            return Err(ConfigurationError::NoLevels);
        }

        let mut by_month: [Option<usize>; 12] = [None; 12];
        for (index, season) in seasons.iter().enumerate() {
            for month in season.months() {
                if !(1..=12).contains(&month) {
                    return Err(ConfigurationError::InvalidMonth {
                        season: season.name.clone(),
                        month,
                    });
                }
                let slot = &mut by_month[month as usize - 1];
                if let Some(first) = *slot {
                    return Err(ConfigurationError::DuplicateMonth {
                        month,
                        first: seasons[first].name.clone(),
                        second: season.name.clone(),
                    });
                }
                *slot = Some(index);
            }

            for level in levels {
                if !season.rates.contains_key(&level) {
                    return Err(ConfigurationError::MissingRate {
                        season: season.name.clone(),
                        level,
                    });
                }
            }
            if let Some(level) = season.rates.keys().find(|level| !levels.contains(**level)) {
                return Err(ConfigurationError::UnexpectedRate {
                    season: season.name.clone(),
                    level: *level,
                });
            }

            if let Some(window) = season
                .peak_windows
                .iter()
                .find(|window| window.start >= window.end || window.end > 24)
            {
                return Err(ConfigurationError::InvalidPeakWindow {
                    season: season.name.clone(),
                    start: window.start,
                    end: window.end,
                });
            }

            if bills_demand && season.demand_tiers.is_none() {
                return Err(ConfigurationError::MissingDemandTiers { season: season.name.clone() });
            }
        }

        let mut resolved = [0; 12];
        for ((slot, month), target) in by_month.into_iter().zip(1..).zip(&mut resolved) {
            *target = slot.ok_or(ConfigurationError::UnmappedMonth(month))?;
        }

        Ok(Self { levels, seasons, by_month: resolved })
    }

    #[must_use]
    pub const fn levels(&self) -> EnumSet<Level> {
        self.levels
    }

    pub fn seasons(&self) -> &[SeasonBand] {
        &self.seasons
    }

    fn season_in(&self, month: u32) -> Option<&SeasonBand> {
        let index = usize::try_from(month.checked_sub(1)?).ok()?;
        self.seasons.get(*self.by_month.get(index)?)
    }

    pub fn season_of(&self, date: NaiveDate) -> Result<&SeasonBand> {
        self.season_in(date.month()).ok_or_else(|| InvalidInput::NoSeason(date).into())
    }

    /// Per-kWh rate of the level in the date's season.
    pub fn rate_for(&self, date: NaiveDate, level: Level) -> Result<KilowattHourRate> {
        let season = self.season_of(date)?;
        if !self.levels.contains(level) {
            return Err(ConfigurationError::UnknownLevel(level.index()).into());
        }
        season.rates.get(&level).copied().ok_or_else(|| {
            ConfigurationError::MissingRate { season: season.name.clone(), level }.into()
        })
    }

    pub fn demand_tiers(&self, date: NaiveDate) -> Result<DemandTiers> {
        self.demand_tiers_in(BillingPeriod::of(date))
    }

    pub fn demand_tiers_in(&self, period: BillingPeriod) -> Result<DemandTiers> {
        let season =
            self.season_in(period.month()).ok_or(InvalidInput::InvalidMonth(period.month()))?;
        season.demand_tiers.ok_or_else(|| {
            ConfigurationError::MissingDemandTiers { season: season.name.clone() }.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winter() -> SeasonBand {
        SeasonBand::builder()
            .name("winter")
            .months(vec![1..=4, 11..=12])
            .rate(Level::OffPeak, 0.0370)
            .rate(Level::OnPeak, 0.0410)
            .peak_windows(vec![5..9, 17..21])
            .demand_tiers(DemandTiers::new(3.49, 5.58, 9.57))
            .build()
    }

    fn summer() -> SeasonBand {
        SeasonBand::builder()
            .name("summer")
            .months(vec![5..=10])
            .rate(Level::OffPeak, 0.0360)
            .rate(Level::OnPeak, 0.0462)
            .peak_windows(vec![14..20])
            .demand_tiers(DemandTiers::new(7.89, 14.37, 27.28))
            .build()
    }

    #[test]
    fn test_valid_table() {
        let table = SeasonTable::try_new(EnumSet::all(), true, vec![winter(), summer()]).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        assert_eq!(table.season_of(date).unwrap().name(), "winter");
        assert_eq!(
            table.rate_for(date, Level::OnPeak).unwrap(),
            KilowattHourRate::from(0.0410),
        );
        assert_eq!(table.demand_tiers(date).unwrap(), DemandTiers::new(3.49, 5.58, 9.57));
    }

    #[test]
    fn test_unmapped_month() {
        let result = SeasonTable::try_new(EnumSet::all(), false, vec![winter()]);
        assert_eq!(result.unwrap_err(), ConfigurationError::UnmappedMonth(5));
    }

    #[test]
    fn test_duplicate_month() {
        let overlapping = SeasonBand::builder()
            .name("monsoon")
            .months(vec![7..=7])
            .rate(Level::OffPeak, 0.1)
            .rate(Level::OnPeak, 0.2)
            .build();
        let result = SeasonTable::try_new(EnumSet::all(), false, vec![winter(), summer(), overlapping]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::DuplicateMonth {
                month: 7,
                first: "summer".to_owned(),
                second: "monsoon".to_owned(),
            },
        );
    }

    #[test]
    fn test_invalid_month() {
        let bogus = SeasonBand::builder()
            .name("bogus")
            .months(vec![0..=0])
            .rate(Level::OffPeak, 0.1)
            .build();
        let result = SeasonTable::try_new(EnumSet::only(Level::OffPeak), false, vec![bogus]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::InvalidMonth { season: "bogus".to_owned(), month: 0 },
        );
    }

    #[test]
    fn test_missing_rate() {
        let incomplete = SeasonBand::builder()
            .name("summer")
            .months(vec![5..=10])
            .rate(Level::OffPeak, 0.0360)
            .build();
        let result = SeasonTable::try_new(EnumSet::all(), false, vec![winter(), incomplete]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::MissingRate { season: "summer".to_owned(), level: Level::OnPeak },
        );
    }

    #[test]
    fn test_unexpected_rate() {
        let result =
            SeasonTable::try_new(EnumSet::only(Level::OffPeak), false, vec![winter(), summer()]);
        assert_eq!(
            result.unwrap_err(),
            ConfigurationError::UnexpectedRate {
                season: "winter".to_owned(),
                level: Level::OnPeak,
            },
        );
    }

    #[test]
    fn test_missing_demand_tiers() {
        let without_tiers = SeasonBand::builder()
            .name("summer")
            .months(vec![5..=10])
            .rate(Level::OffPeak, 0.0360)
            .rate(Level::OnPeak, 0.0462)
            .build();
        assert!(SeasonTable::try_new(EnumSet::all(), false, vec![winter(), without_tiers.clone()]).is_ok());
        assert_eq!(
            SeasonTable::try_new(EnumSet::all(), true, vec![winter(), without_tiers]).unwrap_err(),
            ConfigurationError::MissingDemandTiers { season: "summer".to_owned() },
        );
    }

    #[test]
    fn test_invalid_peak_window() {
        let overflowing = SeasonBand::builder()
            .name("summer")
            .months(vec![5..=10])
            .rate(Level::OffPeak, 0.0360)
            .rate(Level::OnPeak, 0.0462)
            .peak_windows(vec![14..25])
            .build();
        assert_eq!(
            SeasonTable::try_new(EnumSet::all(), false, vec![winter(), overflowing]).unwrap_err(),
            ConfigurationError::InvalidPeakWindow {
                season: "summer".to_owned(),
                start: 14,
                end: 25,
            },
        );
    }

    #[test]
    fn test_no_levels() {
        assert_eq!(
            SeasonTable::try_new(EnumSet::empty(), false, vec![winter(), summer()]).unwrap_err(),
            ConfigurationError::NoLevels,
        );
    }

    #[test]
    fn test_level_outside_plan() {
        let off_peak_only = |name: &str, months| {
            SeasonBand::builder().name(name).months(months).rate(Level::OffPeak, 0.0782).build()
        };
        let table = SeasonTable::try_new(
            EnumSet::only(Level::OffPeak),
            false,
            vec![off_peak_only("winter", vec![1..=4, 11..=12]), off_peak_only("summer", vec![5..=10])],
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            table.rate_for(date, Level::OnPeak),
            Err(Error::Configuration(ConfigurationError::UnknownLevel(1))),
        ));
    }
}
