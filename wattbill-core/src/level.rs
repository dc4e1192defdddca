//! Time-of-use classification.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use enumset::EnumSetType;
use wattbill_quantities::KilowattHourRate;

use crate::{
    holiday::{HolidayCalendar, RuleCalendar},
    prelude::*,
    sample::check_hour,
    season::SeasonTable,
};

#[derive(Debug, Hash, PartialOrd, Ord, EnumSetType)]
pub enum Level {
    OffPeak = 0,
    OnPeak = 1,
}

impl Level {
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_peak(self) -> bool {
        self.index() > 0
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OffPeak => write!(f, "off-peak"),
            Self::OnPeak => write!(f, "on-peak"),
        }
    }
}

/// Resolves a date and an hour into a usage level, and the level into a rate.
///
/// This is the single source of truth for «is this hour expensive»: both the energy rate and
/// demand accumulation ask it.
#[derive(Clone, Debug)]
pub struct TimeOfUse<C = RuleCalendar> {
    calendar: C,
    seasons: SeasonTable,
}

impl<C: HolidayCalendar> TimeOfUse<C> {
    pub const fn new(calendar: C, seasons: SeasonTable) -> Self {
        Self { calendar, seasons }
    }

    pub const fn seasons(&self) -> &SeasonTable {
        &self.seasons
    }

    /// Holidays are off-peak regardless of the hour and season.
    pub fn level(&self, date: NaiveDate, hour: u32) -> Result<Level> {
        let hour = check_hour(hour)?;
        if self.calendar.is_holiday(date) {
            return Ok(Level::OffPeak);
        }
        let season = self.seasons.season_of(date)?;
        Ok(if season.is_peak_hour(hour) { Level::OnPeak } else { Level::OffPeak })
    }

    pub fn rate(&self, date: NaiveDate, hour: u32) -> Result<KilowattHourRate> {
        let level = self.level(date, hour)?;
        self.seasons.rate_for(date, level)
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::season::SeasonBand;

    struct EveryDay;

    impl HolidayCalendar for EveryDay {
        fn is_holiday(&self, _date: NaiveDate) -> bool {
            true
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn seasons() -> SeasonTable {
        SeasonTable::try_new(
            EnumSet::all(),
            false,
            vec![
                SeasonBand::builder()
                    .name("winter")
                    .months(vec![1..=4, 11..=12])
                    .rate(Level::OffPeak, 0.0370)
                    .rate(Level::OnPeak, 0.0410)
                    .peak_windows(vec![5..9, 17..21])
                    .build(),
                SeasonBand::builder()
                    .name("summer")
                    .months(vec![5..=10])
                    .rate(Level::OffPeak, 0.0360)
                    .rate(Level::OnPeak, 0.0462)
                    .peak_windows(vec![14..20])
                    .build(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_winter_windows_are_half_open() {
        let time_of_use = TimeOfUse::new(RuleCalendar::default(), seasons());
        let day = date(2024, 1, 10);
        let peak_hours = (0..24)
            .filter(|hour| time_of_use.level(day, *hour).unwrap().is_peak())
            .collect::<Vec<_>>();
        assert_eq!(peak_hours, [5, 6, 7, 8, 17, 18, 19, 20]);
    }

    #[test]
    fn test_summer_window() {
        let time_of_use = TimeOfUse::new(RuleCalendar::default(), seasons());
        let day = date(2024, 7, 10);
        let peak_hours = (0..24)
            .filter(|hour| time_of_use.level(day, *hour).unwrap().is_peak())
            .collect::<Vec<_>>();
        assert_eq!(peak_hours, [14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_holidays_are_off_peak() {
        let time_of_use = TimeOfUse::new(EveryDay, seasons());
        for month in 1..=12 {
            for hour in 0..24 {
                assert_eq!(time_of_use.level(date(2024, month, 15), hour).unwrap(), Level::OffPeak);
            }
        }

        let time_of_use = TimeOfUse::new(RuleCalendar::srp(), seasons());
        assert_eq!(time_of_use.level(date(2024, 12, 25), 6).unwrap(), Level::OffPeak);
        assert_eq!(time_of_use.level(date(2024, 12, 24), 6).unwrap(), Level::OnPeak);
    }

    #[test]
    fn test_rate() {
        let time_of_use = TimeOfUse::new(RuleCalendar::default(), seasons());
        assert_eq!(time_of_use.rate(date(2024, 1, 10), 6).unwrap(), KilowattHourRate::from(0.0410));
        assert_eq!(time_of_use.rate(date(2024, 1, 10), 12).unwrap(), KilowattHourRate::from(0.0370));
    }

    #[test]
    fn test_rejects_bad_hour() {
        let time_of_use = TimeOfUse::new(RuleCalendar::default(), seasons());
        assert!(matches!(
            time_of_use.level(date(2024, 1, 10), 24),
            Err(Error::InvalidInput(InvalidInput::HourOutOfRange(24))),
        ));
    }

    #[test]
    fn test_is_pure() {
        let time_of_use = TimeOfUse::new(RuleCalendar::srp(), seasons());
        let day = date(2024, 3, 4);
        let first = (0..24).map(|hour| time_of_use.level(day, hour).unwrap()).collect::<Vec<_>>();
        let second = (0..24).map(|hour| time_of_use.level(day, hour).unwrap()).collect::<Vec<_>>();
        assert_eq!(first, second);
    }
}
