use chrono::{Datelike, Local};
use clap::Parser;

use crate::{cli::plan::CalendarArgs, tables::build_holidays_table};

#[derive(Parser)]
pub struct HolidaysArgs {
    /// Defaults to the current year.
    #[clap(long)]
    year: Option<i32>,

    #[clap(flatten)]
    calendar: CalendarArgs,
}

impl HolidaysArgs {
    pub fn run(self) {
        let year = self.year.unwrap_or_else(|| Local::now().year());
        println!("{}", build_holidays_table(&self.calendar.calendar().holidays_in(year)));
    }
}
