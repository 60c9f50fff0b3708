use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::errors::{Error, Result, ValidationError};

/// Start of the given day in UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Exclusive end of the given day in UTC (start of the next day).
pub fn end_of_day_exclusive(date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(next),
        None => start_of_day(date),
    }
}

/// Parses a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        Error::Validation(ValidationError::field(
            field,
            format!("'{}' is not a YYYY-MM-DD date", value),
        ))
    })
}

/// Parses an RFC 3339 timestamp stored by the storage layer.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert_eq!(
            end_of_day_exclusive(date).to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-13-01", "dateFrom").is_err());
        assert!(parse_date(" 2024-01-31 ", "dateFrom").is_ok());
    }
}
