use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), ISO_DATE).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

/// Half-open calendar range `[start, end)` used for history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date < self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", format_date(self.start), format_date(self.end))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-01-01").expect("valid"), date!(2024 - 01 - 01));
        assert!(matches!(
            parse_date("01/02/2024"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn range_requires_start_before_end() {
        let err = DateRange::parse("2025-11-01", "2024-01-01").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyDateRange { .. }));

        let same = DateRange::parse("2024-01-01", "2024-01-01");
        assert!(same.is_err());
    }

    #[test]
    fn range_is_end_exclusive() {
        let range = DateRange::parse("2024-01-01", "2024-01-05").expect("valid");
        assert!(range.contains(date!(2024 - 01 - 01)));
        assert!(range.contains(date!(2024 - 01 - 04)));
        assert!(!range.contains(date!(2024 - 01 - 05)));
        assert_eq!(range.to_string(), "2024-01-01..2024-01-05");
    }
}
