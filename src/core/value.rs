//! Scalar field values carried by records

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Largest magnitude below which every whole `f64` is an exact integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single scalar field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free text (names, descriptions)
    Text(String),
    /// Numeric value (budgets, sizes)
    Number(f64),
    /// Enumerated tag (stage, status, priority)
    Tag(String),
    /// Calendar date
    Date(NaiveDate),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Canonical string form used for free-text search and exact filter matching
    pub fn as_match_string(&self) -> String {
        self.to_string()
    }

    /// Compare two values of the same kind for sorting.
    ///
    /// Text compares case-insensitively (raw text breaks ties), numbers use a
    /// total order, dates and timestamps compare chronologically. Values of
    /// different kinds fall back to comparing their string forms.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) | (Value::Tag(a), Value::Tag(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Date(a), Value::Timestamp(b)) => a.cmp(&b.date_naive()),
            (Value::Timestamp(a), Value::Date(b)) => a.date_naive().cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Tag(s) => write!(f, "{}", s),
            Value::Number(n) => {
                // whole numbers print without a fraction
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_match_string_forms() {
        assert_eq!(Value::Number(1500.0).as_match_string(), "1500");
        assert_eq!(Value::Number(2.5).as_match_string(), "2.5");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()).as_match_string(),
            "2025-03-07"
        );
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Value::Timestamp(ts).as_match_string(), "2025-01-02T03:04:05Z");
        assert_eq!(Value::Tag("in_progress".into()).as_match_string(), "in_progress");
    }

    #[test]
    fn test_large_whole_numbers_keep_distinct_match_strings() {
        let big = Value::Number(1e20).as_match_string();
        assert_eq!(big, "100000000000000000000");
        assert_ne!(big, Value::Number(1e19).as_match_string());
        assert_eq!(Value::Number(-1e20).as_match_string(), "-100000000000000000000");
        assert_eq!(
            Value::Number(9_007_199_254_740_991.0).as_match_string(),
            "9007199254740991"
        );
        assert_eq!(Value::Number(f64::INFINITY).as_match_string(), "inf");
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let a = Value::from("alpha");
        let b = Value::from("Beta");
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
        assert_eq!(Value::from("Same").sort_cmp(&Value::from("Same")), Ordering::Equal);
    }

    #[test]
    fn test_number_sort() {
        assert_eq!(Value::Number(2.0).sort_cmp(&Value::Number(10.0)), Ordering::Less);
    }
}
