use std::{fs, path::PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use wattbill_core::{DemandSchedule, FlatPlan, RatePlan, RuleCalendar, SolarPlan};

use crate::prelude::*;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum PlanKind {
    /// Flat seasonal rate, no demand charge.
    Flat,

    /// Time-of-use energy rates with on-peak demand billing.
    Solar,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum CalendarKind {
    /// Salt River Project billing holidays.
    Srp,

    /// All US federal holidays.
    UsFederal,
}

impl CalendarKind {
    pub fn calendar(self) -> RuleCalendar {
        match self {
            Self::Srp => RuleCalendar::srp(),
            Self::UsFederal => RuleCalendar::us_federal(),
        }
    }
}

#[derive(Parser)]
pub struct CalendarArgs {
    #[clap(long = "calendar", env = "HOLIDAY_CALENDAR", default_value = "srp")]
    kind: CalendarKind,

    /// Additional utility-specific holidays, `YYYY-MM-DD`.
    #[clap(long = "extra-holiday", env = "EXTRA_HOLIDAYS", value_delimiter = ',')]
    extra_holidays: Vec<NaiveDate>,
}

impl CalendarArgs {
    pub fn calendar(&self) -> RuleCalendar {
        self.kind.calendar().with_extra_dates(self.extra_holidays.iter().copied())
    }
}

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(flatten)]
    calendar: CalendarArgs,

    /// TOML table of measured peak demand in kilowatts by billing period,
    /// for example: `"2024-01" = 6.2`.
    ///
    /// Without it, demand charges are estimated from the hourly usage.
    #[clap(long = "demand-schedule", env = "DEMAND_SCHEDULE_PATH")]
    demand_schedule_path: Option<PathBuf>,
}

impl PlanArgs {
    pub fn demand_schedule(&self) -> Result<Option<DemandSchedule>> {
        let Some(path) = &self.demand_schedule_path else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let schedule = parse_demand_schedule(&text)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(n_periods = schedule.0.len(), "loaded the demand schedule");
        Ok(Some(schedule))
    }

    pub fn build(&self, kind: PlanKind) -> Result<Box<dyn RatePlan>> {
        let plan: Box<dyn RatePlan> = match kind {
            PlanKind::Flat => Box::new(FlatPlan::try_new()?),
            PlanKind::Solar => Box::new(
                SolarPlan::builder()
                    .calendar(self.calendar.calendar())
                    .maybe_demand_schedule(self.demand_schedule()?)
                    .build()?,
            ),
        };
        Ok(plan)
    }
}

fn parse_demand_schedule(text: &str) -> Result<DemandSchedule> {
    Ok(toml::from_str(text)?)
}
