use bon::bon;
use chrono::NaiveDate;
use enumset::EnumSet;
use wattbill_quantities::{Cost, KilowattHourRate, KilowattHours, Kilowatts};

use crate::{
    demand::{DemandAccumulator, DemandMode, DemandSchedule},
    holiday::RuleCalendar,
    level::{Level, TimeOfUse},
    plan::RatePlan,
    prelude::*,
    sample::{BillingPeriod, check_energy},
    season::{SeasonBand, SeasonTable},
    tiered::DemandTiers,
};

/// Customer generation (net metering) plan with on-peak demand billing.
#[derive(Clone, Debug)]
#[must_use]
pub struct SolarPlan {
    time_of_use: TimeOfUse,
    demand: DemandAccumulator,
}

impl SolarPlan {
    pub const FIXED_CHARGE: Cost = Cost::new(32.44);
}

#[bon]
impl SolarPlan {
    /// Without a demand schedule, the demand is estimated from the hourly consumption.
    #[builder]
    pub fn new(
        #[builder(default = RuleCalendar::srp())] calendar: RuleCalendar,
        demand_schedule: Option<DemandSchedule>,
    ) -> Result<Self, ConfigurationError> {
        let seasons = SeasonTable::try_new(
            EnumSet::all(),
            true,
            vec![
                SeasonBand::builder()
                    .name("winter")
                    .months(vec![1..=4, 11..=12])
                    .rate(Level::OffPeak, 0.0370)
                    .rate(Level::OnPeak, 0.0410)
                    .peak_windows(vec![5..9, 17..21])
                    .demand_tiers(DemandTiers::new(3.49, 5.58, 9.57))
                    .build(),
                SeasonBand::builder()
                    .name("summer")
                    .months(vec![5..=6, 9..=10])
                    .rate(Level::OffPeak, 0.0360)
                    .rate(Level::OnPeak, 0.0462)
                    .peak_windows(vec![14..20])
                    .demand_tiers(DemandTiers::new(7.89, 14.37, 27.28))
                    .build(),
                SeasonBand::builder()
                    .name("summer peak")
                    .months(vec![7..=8])
                    .rate(Level::OffPeak, 0.0412)
                    .rate(Level::OnPeak, 0.0622)
                    .peak_windows(vec![14..20])
                    .demand_tiers(DemandTiers::new(9.43, 17.51, 33.59))
                    .build(),
            ],
        )?;
        let mode = demand_schedule.map_or_else(DemandMode::default, DemandMode::Scheduled);
        if mode.is_estimated() {
            warn!("no demand schedule, demand charges are estimated");
        }
        Ok(Self {
            time_of_use: TimeOfUse::new(calendar, seasons),
            demand: DemandAccumulator::new(mode),
        })
    }

    pub const fn time_of_use(&self) -> &TimeOfUse {
        &self.time_of_use
    }

    pub fn level(&self, date: NaiveDate, hour: u32) -> Result<Level> {
        self.time_of_use.level(date, hour)
    }
}

impl RatePlan for SolarPlan {
    fn display_name(&self) -> &'static str {
        "SRP/E27 (Customer Generation)"
    }

    fn notes(&self) -> Option<&'static str> {
        self.demand
            .mode()
            .is_estimated()
            .then_some("Demand charges are estimated and may be inaccurate.")
    }

    fn fixed_charge(&self) -> Cost {
        Self::FIXED_CHARGE
    }

    fn energy_rate(&self, date: NaiveDate, hour: u32) -> Result<KilowattHourRate> {
        self.time_of_use.rate(date, hour)
    }

    /// Only on-peak hours count towards the demand.
    fn record_demand(&mut self, date: NaiveDate, hour: u32, energy: KilowattHours) -> Result {
        let energy = check_energy(energy)?;
        let level = self.time_of_use.level(date, hour)?;
        self.demand.record(date, level, energy)
    }

    fn peak_demand(&self, period: BillingPeriod) -> Kilowatts {
        self.demand.peak_for(period)
    }

    fn demand_charge(&self, period: BillingPeriod) -> Result<Cost> {
        let tiers = self.time_of_use.seasons().demand_tiers_in(period)?;
        Ok(tiers.charge(self.demand.peak_for(period)))
    }

    fn close_period(&mut self, period: BillingPeriod) {
        if let Some(peak) = self.demand.reset(period) {
            debug!(%period, ?peak, "closed");
        }
    }
}
