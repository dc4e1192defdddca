use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use wattbill_core::Bill;
use wattbill_quantities::{Cost, KilowattHours};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_bills_table(bills: &[Bill]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Usage", "Peak", "Energy", "Demand", "Fixed", "Total"]);
    for bill in bills {
        table.add_row(vec![
            Cell::new(bill.period),
            Cell::new(bill.consumption).set_alignment(CellAlignment::Right),
            Cell::new(bill.peak_demand).set_alignment(CellAlignment::Right),
            Cell::new(bill.energy).set_alignment(CellAlignment::Right),
            Cell::new(bill.demand).set_alignment(CellAlignment::Right),
            Cell::new(bill.fixed).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(bill.total()).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(bills.iter().map(|bill| bill.consumption).sum::<KilowattHours>())
            .set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new(bills.iter().map(|bill| bill.energy).sum::<Cost>())
            .set_alignment(CellAlignment::Right),
        Cell::new(bills.iter().map(|bill| bill.demand).sum::<Cost>())
            .set_alignment(CellAlignment::Right),
        Cell::new(bills.iter().map(|bill| bill.fixed).sum::<Cost>())
            .set_alignment(CellAlignment::Right),
        Cell::new(bills.iter().map(Bill::total).sum::<Cost>())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

/// Totals of one plan over all billed months.
pub struct PlanSummary {
    pub name: &'static str,
    pub notes: Option<&'static str>,
    pub n_months: usize,
    pub energy: Cost,
    pub demand: Cost,
    pub fixed: Cost,
}

impl PlanSummary {
    pub fn new(name: &'static str, notes: Option<&'static str>, bills: &[Bill]) -> Self {
        Self {
            name,
            notes,
            n_months: bills.len(),
            energy: bills.iter().map(|bill| bill.energy).sum(),
            demand: bills.iter().map(|bill| bill.demand).sum(),
            fixed: bills.iter().map(|bill| bill.fixed).sum(),
        }
    }

    pub fn total(&self) -> Cost {
        self.energy + self.demand + self.fixed
    }
}

pub fn build_comparison_table(summaries: &[PlanSummary]) -> Table {
    let cheapest = summaries.iter().map(PlanSummary::total).min();

    let mut table = new_table();
    table.set_header(vec!["Plan", "Months", "Energy", "Demand", "Fixed", "Total", "Notes"]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.name),
            Cell::new(summary.n_months).set_alignment(CellAlignment::Right),
            Cell::new(summary.energy).set_alignment(CellAlignment::Right),
            Cell::new(summary.demand).set_alignment(CellAlignment::Right),
            Cell::new(summary.fixed).set_alignment(CellAlignment::Right),
            Cell::new(summary.total()).set_alignment(CellAlignment::Right).fg(
                if Some(summary.total()) == cheapest { Color::Green } else { Color::Red },
            ),
            Cell::new(summary.notes.unwrap_or_default()).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_holidays_table(holidays: &[(NaiveDate, &str)]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Weekday", "Holiday"]);
    for (date, name) in holidays {
        table.add_row(vec![
            Cell::new(date.format("%Y-%m-%d")),
            Cell::new(date.format("%A")).add_attribute(Attribute::Dim),
            Cell::new(name),
        ]);
    }
    table
}
