mod flat;
mod solar;

use chrono::NaiveDate;
use serde::Serialize;
use wattbill_quantities::{Cost, KilowattHourRate, KilowattHours, Kilowatts};

pub use self::{flat::FlatPlan, solar::SolarPlan};
use crate::{
    prelude::*,
    sample::{BillingPeriod, UsageSample, check_energy, check_hour},
};

/// Monthly bill breakdown.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct Bill {
    pub period: BillingPeriod,
    pub consumption: KilowattHours,
    pub peak_demand: Kilowatts,
    pub energy: Cost,
    pub demand: Cost,
    pub fixed: Cost,
}

impl Bill {
    pub fn total(&self) -> Cost {
        self.energy + self.demand + self.fixed
    }
}

/// Utility rate plan.
///
/// Plans without demand billing only need to price energy: demand recording is then a no-op
/// and the demand charge is zero.
pub trait RatePlan {
    fn display_name(&self) -> &'static str;

    /// Informational remarks about how the plan computes the bill.
    fn notes(&self) -> Option<&'static str> {
        None
    }

    /// Flat monthly amount, independent of usage and demand.
    fn fixed_charge(&self) -> Cost;

    fn energy_rate(&self, date: NaiveDate, hour: u32) -> Result<KilowattHourRate>;

    fn energy_cost(&self, date: NaiveDate, hour: u32, energy: KilowattHours) -> Result<Cost> {
        let energy = check_energy(energy)?;
        Ok(energy * self.energy_rate(date, hour)?)
    }

    fn record_demand(&mut self, _date: NaiveDate, hour: u32, energy: KilowattHours) -> Result {
        check_hour(hour)?;
        check_energy(energy)?;
        Ok(())
    }

    fn peak_demand(&self, _period: BillingPeriod) -> Kilowatts {
        Kilowatts::ZERO
    }

    fn demand_charge(&self, _period: BillingPeriod) -> Result<Cost> {
        Ok(Cost::ZERO)
    }

    /// Discard the accumulated state of the period.
    fn close_period(&mut self, _period: BillingPeriod) {}

    /// Price every sample of the period and add one demand charge and the fixed charge.
    ///
    /// The whole batch is validated and priced before any demand is recorded, so a rejected
    /// batch leaves the period's peak as it was.
    #[instrument(skip_all, fields(plan = self.display_name(), %period))]
    fn total_for_period(&mut self, samples: &[UsageSample], period: BillingPeriod) -> Result<Bill> {
        let mut consumption = KilowattHours::ZERO;
        let mut energy = Cost::ZERO;
        for sample in samples {
            let date = period.check_contains(sample.date)?;
            energy += self.energy_cost(date, sample.hour, sample.energy)?;
            consumption += sample.energy;
        }
        for sample in samples {
            self.record_demand(sample.date, sample.hour, sample.energy)?;
        }
        let bill = Bill {
            period,
            consumption,
            peak_demand: self.peak_demand(period),
            energy,
            demand: self.demand_charge(period)?,
            fixed: self.fixed_charge(),
        };
        debug!(n_samples = samples.len(), total = ?bill.total(), "billed");
        Ok(bill)
    }
}
