use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

/// One calendar day, the atomic unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateUnit(NaiveDate);

impl DateUnit {
    /// Returns `None` for an impossible calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Every day in `[start, end]`, ascending, each exactly once.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<DateUnit>> {
    if start > end {
        return Err(Error::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let num_days = (end - start).num_days() as usize + 1;
    let mut dates = Vec::with_capacity(num_days);
    let mut current = Some(start);
    while let Some(day) = current.filter(|d| *d <= end) {
        dates.push(DateUnit(day));
        current = day.succ_opt();
    }
    Ok(dates)
}

/// Same as [`date_range`] but takes `YYYY-MM-DD` strings.
pub fn get_dates(start_date: &str, end_date: &str) -> Result<Vec<DateUnit>> {
    date_range(parse_day(start_date)?, parse_day(end_date)?)
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::InvalidConfig(format!("'{s}' is not a YYYY-MM-DD date: {e}")))
}
