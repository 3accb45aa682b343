//! Month arithmetic shared by the generator and the planner. All functions
//! are total over the (year, month) ranges chrono can represent.

use chrono::{Datelike, NaiveDate};

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Create a date for the first day of the next month
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;

    // Get the first day of the next month
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1).unwrap();

    // Go back one day to get the last day of the current month
    let last_day_current_month = first_day_next_month.pred_opt().unwrap();

    // The day of the month is the number of days in the month
    last_day_current_month.day()
}

/// Advances a (year, month) cursor by one calendar month.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// The date of `day` in the given month, clamped to the month's length
/// (day 31 in April yields April 30, day 29 in a non-leap February yields
/// February 28).
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// First day of the given month.
pub fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// First day of the month `months` whole months before the given month.
pub fn month_start_back(year: i32, month: u32, months: u32) -> NaiveDate {
    let total = year * 12 + month as i32 - 1 - months as i32;
    month_start(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Half-open date range covering exactly the given month.
pub fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let (next_year, next) = next_month(year, month);
    (month_start(year, month), month_start(next_year, next))
}
