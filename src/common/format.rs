//! Display formatting for bill fields

use chrono::{Datelike, NaiveDate};

/// French month abbreviations, capitalized and cut to three characters
const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Parse an ISO-like bill date (`YYYY-MM-DD`, optionally followed by a time)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Format a bill date as the short French form shown in the bills table
///
/// `2004-04-04` becomes `4 Avr. 04`. Returns `None` when the date cannot be
/// parsed; callers keep the raw value in that case.
pub fn format_date(raw: &str) -> Option<String> {
    let date = parse_date(raw)?;
    let month = MONTHS_FR[date.month0() as usize];
    let year = date.year().rem_euclid(100);
    Some(format!("{} {}. {:02}", date.day(), month, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2004-04-04").as_deref(), Some("4 Avr. 04"));
        assert_eq!(format_date("2001-01-01").as_deref(), Some("1 Jan. 01"));
        assert_eq!(format_date("2022-12-25").as_deref(), Some("25 Déc. 22"));
        assert_eq!(format_date("2003-03-03").as_deref(), Some("3 Mar. 03"));
    }

    #[test]
    fn test_format_date_with_time_suffix() {
        assert_eq!(
            format_date("2021-08-15T10:20:00.000Z").as_deref(),
            Some("15 Aoû. 21")
        );
    }

    #[test]
    fn test_format_date_rejects_garbage() {
        assert!(format_date("").is_none());
        assert!(format_date("not a date").is_none());
        assert!(format_date("2021-13-45").is_none());
    }
}
