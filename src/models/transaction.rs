use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub category: String,
    pub cost: Decimal,
    #[serde(deserialize_with = "deserialize_date")]
    pub added_on: NaiveDate,
}

impl Transaction {
    #[cfg(test)]
    pub fn new(category: String, cost: Decimal, added_on: NaiveDate) -> Self {
        Self {
            category,
            cost,
            added_on,
        }
    }

    /// Calendar month/year equality, no timezone adjustment.
    pub fn falls_in(&self, month: u32, year: i32) -> bool {
        self.added_on.month() == month && self.added_on.year() == year
    }
}

/// Parse the backend's `addedOn`: an RFC 3339 timestamp, a naive datetime,
/// or a bare `YYYY-MM-DD` date. Only the calendar date is kept.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

/// Body of `GET /transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}
