//! Column conversions and query helpers shared by the repositories.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::error;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Ids per `IN (...)` clause; SQLite caps bound parameters per statement.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Parses a money column stored as TEXT. Corrupt values are logged and read as zero.
pub fn parse_decimal(value: &str, field_name: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        error!("Failed to parse {} '{}' as Decimal: {}", field_name, value, e);
        Decimal::ZERO
    })
}

pub fn parse_optional_decimal(value: Option<&str>, field_name: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal(v, field_name))
}

pub fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(value, Utc)
}

pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// `%keyword%` pattern for LIKE filters.
pub fn like_pattern(keyword: &str) -> String {
    format!("%{}%", keyword.replace('%', "\\%").replace('_', "\\_"))
}
