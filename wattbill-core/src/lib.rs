//! Tariff rule engine: classifies metered hours into time-of-use levels, prices them by season,
//! and bills the monthly on-peak demand through declining blocks.

pub mod demand;
pub mod error;
pub mod holiday;
pub mod level;
pub mod plan;
mod prelude;
pub mod sample;
pub mod season;
pub mod tiered;

pub use self::{
    demand::{DemandAccumulator, DemandMode, DemandSchedule},
    error::{ConfigurationError, Error, InvalidInput, Result},
    holiday::{HolidayCalendar, RuleCalendar},
    level::{Level, TimeOfUse},
    plan::{Bill, FlatPlan, RatePlan, SolarPlan},
    sample::{BillingPeriod, UsageSample},
    season::{SeasonBand, SeasonTable},
    tiered::DemandTiers,
};
