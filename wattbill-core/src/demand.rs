//! On-peak demand tracking per billing period.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use wattbill_quantities::{KilowattHours, Kilowatts};

use crate::{level::Level, prelude::*, sample::BillingPeriod};

/// Headroom over the hourly average that approximates short in-hour spikes.
pub const ESTIMATED_HEADROOM: f64 = 1.15;

/// Externally measured peak demand per billing period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use]
pub struct DemandSchedule(pub BTreeMap<BillingPeriod, Kilowatts>);

impl DemandSchedule {
    #[must_use]
    pub fn peak_for(&self, period: BillingPeriod) -> Option<Kilowatts> {
        self.0.get(&period).copied()
    }
}

impl FromIterator<(BillingPeriod, Kilowatts)> for DemandSchedule {
    fn from_iter<T: IntoIterator<Item = (BillingPeriod, Kilowatts)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How an hourly sample turns into demand.
#[derive(Clone, Debug, PartialEq)]
pub enum DemandMode {
    /// Hourly energy only: the peak is estimated from the hourly average times the headroom.
    ///
    /// This is an approximation and may be inaccurate.
    Estimated { headroom: f64 },

    /// The true per-period peak comes from finer-grained metering.
    Scheduled(DemandSchedule),
}

impl Default for DemandMode {
    fn default() -> Self {
        Self::Estimated { headroom: ESTIMATED_HEADROOM }
    }
}

impl DemandMode {
    #[must_use]
    pub const fn is_estimated(&self) -> bool {
        matches!(self, Self::Estimated { .. })
    }

    /// Demand attributed to an hour of consumption in the period.
    pub fn demand(&self, period: BillingPeriod, energy: KilowattHours) -> Result<Kilowatts> {
        match self {
            Self::Estimated { headroom } => Ok(energy / TimeDelta::hours(1) * *headroom),
            Self::Scheduled(schedule) => {
                let demand = schedule
                    .peak_for(period)
                    .ok_or(InvalidInput::MissingScheduledDemand(period))?;
                if demand.is_finite() && !demand.is_negative() {
                    Ok(demand)
                } else {
                    Err(InvalidInput::InvalidScheduledDemand { period, demand }.into())
                }
            }
        }
    }
}

/// Running on-peak maximum per billing period.
///
/// Only the maximum is kept: demand is billed on the peak draw, never on the total.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct DemandAccumulator {
    mode: DemandMode,
    peaks: BTreeMap<BillingPeriod, Kilowatts>,
}

impl DemandAccumulator {
    pub fn new(mode: DemandMode) -> Self {
        Self { mode, peaks: BTreeMap::new() }
    }

    pub const fn mode(&self) -> &DemandMode {
        &self.mode
    }

    /// Off-peak samples are ignored entirely.
    pub fn record(&mut self, date: NaiveDate, level: Level, energy: KilowattHours) -> Result {
        if !level.is_peak() {
            return Ok(());
        }
        let period = BillingPeriod::of(date);
        let demand = self.mode.demand(period, energy)?;
        match self.peaks.entry(period) {
            Entry::Vacant(entry) => {
                debug!(%period, ?demand, "first on-peak demand");
                entry.insert(demand);
            }
            Entry::Occupied(mut entry) if demand > *entry.get() => {
                debug!(%period, ?demand, previous = ?entry.get(), "new peak demand");
                entry.insert(demand);
            }
            Entry::Occupied(_) => {}
        }
        Ok(())
    }

    /// Zero until the first on-peak sample of the period.
    pub fn peak_for(&self, period: BillingPeriod) -> Kilowatts {
        self.peaks.get(&period).copied().unwrap_or(Kilowatts::ZERO)
    }

    /// Discard the period's state, returning its final peak.
    pub fn reset(&mut self, period: BillingPeriod) -> Option<Kilowatts> {
        self.peaks.remove(&period)
    }
}
