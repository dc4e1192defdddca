//! Billing holidays.
//!
//! Holidays are defined by rules rather than by dates so that a calendar covers any year.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use itertools::Itertools;

/// Predicate over calendar dates. Holidays are always billed off-peak.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<C: HolidayCalendar + ?Sized> HolidayCalendar for &C {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same day every year. Shifts to Friday when it falls on Saturday, and to Monday on Sunday.
    Fixed { month: u32, day: u32 },

    /// For example, the 1st Monday of September.
    NthWeekday { month: u32, weekday: Weekday, nth: u8 },

    /// For example, the last Monday of May.
    LastWeekday { month: u32, weekday: Weekday },
}

impl HolidayRule {
    /// Date on which the holiday is observed in the given year.
    #[must_use]
    pub fn observed_in(self, year: i32) -> Option<NaiveDate> {
        match self {
            Self::Fixed { month, day } => {
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                match date.weekday() {
                    Weekday::Sat => date.pred_opt(),
                    Weekday::Sun => date.succ_opt(),
                    _ => Some(date),
                }
            }
            Self::NthWeekday { month, weekday, nth } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth)
            }
            Self::LastWeekday { month, weekday } => {
                let last_day = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                }?
                .pred_opt()?;
                let offset = (7 + last_day.weekday().num_days_from_monday()
                    - weekday.num_days_from_monday())
                    % 7;
                last_day.checked_sub_days(Days::new(u64::from(offset)))
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Holiday {
    pub name: &'static str,
    pub rule: HolidayRule,
}

impl Holiday {
    pub const fn fixed(name: &'static str, month: u32, day: u32) -> Self {
        Self { name, rule: HolidayRule::Fixed { month, day } }
    }

    pub const fn nth(name: &'static str, nth: u8, weekday: Weekday, month: u32) -> Self {
        Self { name, rule: HolidayRule::NthWeekday { month, weekday, nth } }
    }

    pub const fn last(name: &'static str, weekday: Weekday, month: u32) -> Self {
        Self { name, rule: HolidayRule::LastWeekday { month, weekday } }
    }
}

const NEW_YEARS_DAY: Holiday = Holiday::fixed("New Year's Day", 1, 1);
const MEMORIAL_DAY: Holiday = Holiday::last("Memorial Day", Weekday::Mon, 5);
const INDEPENDENCE_DAY: Holiday = Holiday::fixed("Independence Day", 7, 4);
const LABOR_DAY: Holiday = Holiday::nth("Labor Day", 1, Weekday::Mon, 9);
const THANKSGIVING_DAY: Holiday = Holiday::nth("Thanksgiving Day", 4, Weekday::Thu, 11);
const CHRISTMAS_DAY: Holiday = Holiday::fixed("Christmas Day", 12, 25);

/// Fixed set of holiday rules plus any one-off utility-specific dates.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct RuleCalendar {
    holidays: Vec<Holiday>,
    extra_dates: BTreeSet<NaiveDate>,
}

impl RuleCalendar {
    pub fn new(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        Self { holidays: holidays.into_iter().collect(), extra_dates: BTreeSet::new() }
    }

    /// Holidays observed by Salt River Project for its time-of-use plans.
    pub fn srp() -> Self {
        Self::new([
            NEW_YEARS_DAY,
            MEMORIAL_DAY,
            INDEPENDENCE_DAY,
            LABOR_DAY,
            THANKSGIVING_DAY,
            CHRISTMAS_DAY,
        ])
    }

    pub fn us_federal() -> Self {
        Self::new([
            NEW_YEARS_DAY,
            Holiday::nth("Martin Luther King Jr. Day", 3, Weekday::Mon, 1),
            Holiday::nth("Washington's Birthday", 3, Weekday::Mon, 2),
            MEMORIAL_DAY,
            Holiday::fixed("Juneteenth", 6, 19),
            INDEPENDENCE_DAY,
            LABOR_DAY,
            Holiday::nth("Columbus Day", 2, Weekday::Mon, 10),
            Holiday::fixed("Veterans Day", 11, 11),
            THANKSGIVING_DAY,
            CHRISTMAS_DAY,
        ])
    }

    pub fn with_extra_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.extra_dates.extend(dates);
        self
    }

    /// Observed holidays of the year, sorted by date.
    #[must_use]
    pub fn holidays_in(&self, year: i32) -> Vec<(NaiveDate, &'static str)> {
        // A fixed holiday on January 1st may be observed on December 31st of the previous year:
        self.holidays
            .iter()
            .flat_map(|holiday| {
                [year, year + 1]
                    .into_iter()
                    .filter_map(|rule_year| holiday.rule.observed_in(rule_year))
                    .map(|date| (date, holiday.name))
            })
            .chain(self.extra_dates.iter().map(|date| (*date, "Utility holiday")))
            .filter(|(date, _)| date.year() == year)
            .sorted()
            .dedup()
            .collect()
    }
}

impl HolidayCalendar for RuleCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.extra_dates.contains(&date)
            || self.holidays.iter().any(|holiday| {
                [date.year(), date.year() + 1]
                    .into_iter()
                    .any(|year| holiday.rule.observed_in(year) == Some(date))
            })
    }
}
