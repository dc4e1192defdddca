use clap::{Parser, ValueEnum};
use wattbill_core::{Bill, RatePlan, UsageSample};

use crate::{
    cli::{
        UsageArgs,
        plan::{PlanArgs, PlanKind},
    },
    prelude::*,
    tables::{PlanSummary, build_bills_table, build_comparison_table},
    usage::by_period,
};

#[derive(Parser)]
pub struct BillArgs {
    #[clap(long = "plan", env = "RATE_PLAN", default_value = "solar")]
    plan: PlanKind,

    #[clap(flatten)]
    usage: UsageArgs,

    #[clap(flatten)]
    plan_args: PlanArgs,
}

impl BillArgs {
    pub fn run(self) -> Result {
        let samples = self.usage.read()?;
        let mut plan = self.plan_args.build(self.plan)?;
        let bills = bill_all(plan.as_mut(), samples)?;
        println!("{}", plan.display_name());
        println!("{}", build_bills_table(&bills));
        if let Some(notes) = plan.notes() {
            println!("{notes}");
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    usage: UsageArgs,

    #[clap(flatten)]
    plan_args: PlanArgs,
}

impl CompareArgs {
    pub fn run(self) -> Result {
        let samples = self.usage.read()?;
        let summaries = PlanKind::value_variants()
            .iter()
            .map(|kind| {
                let mut plan = self.plan_args.build(*kind)?;
                let bills = bill_all(plan.as_mut(), samples.iter().copied())?;
                Ok(PlanSummary::new(plan.display_name(), plan.notes(), &bills))
            })
            .collect::<Result<Vec<_>>>()?;
        println!("{}", build_comparison_table(&summaries));
        Ok(())
    }
}

/// Bill every calendar month present in the samples, oldest first.
#[instrument(skip_all, fields(plan = plan.display_name()))]
fn bill_all(
    plan: &mut dyn RatePlan,
    samples: impl IntoIterator<Item = UsageSample>,
) -> Result<Vec<Bill>> {
    by_period(samples)
        .into_iter()
        .map(|(period, samples)| {
            let bill = plan
                .total_for_period(&samples, period)
                .with_context(|| format!("failed to bill {period}"))?;
            plan.close_period(period);
            info!(%period, total = %bill.total(), "billed");
            Ok(bill)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use wattbill_core::{FlatPlan, SolarPlan};
    use wattbill_quantities::KilowattHours;

    use super::*;

    fn sample(month: u32, day: u32, hour: u32, kwh: f64) -> UsageSample {
        let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        UsageSample::try_new(date, hour, KilowattHours::from(kwh)).unwrap()
    }

    #[test]
    fn test_bill_all() {
        let mut plan = SolarPlan::builder().build().unwrap();
        let samples = [sample(2, 1, 6, 1.0), sample(1, 10, 6, 5.0), sample(1, 10, 12, 2.0)];
        let bills = bill_all(&mut plan, samples).unwrap();

        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].period.to_string(), "2024-01");
        assert_abs_diff_eq!(bills[0].demand.get(), 25.815, epsilon = 1e-9);
        assert_abs_diff_eq!(bills[1].demand.get(), 3.49, epsilon = 1e-9);
        assert_abs_diff_eq!(
            bills[0].total().get(),
            0.0410 * 5.0 + 0.0370 * 2.0 + 25.815 + 32.44,
            epsilon = 1e-9,
        );
    }

    #[test]
    fn test_flat_bill_all() {
        let mut plan = FlatPlan::try_new().unwrap();
        let bills = bill_all(&mut plan, [sample(8, 1, 15, 10.0)]).unwrap();
        assert_abs_diff_eq!(bills[0].total().get(), 1.185, epsilon = 1e-12);
    }
}
