// Typed view over one untrusted sensor packet from the document store.
// Lookups never fail: a bad value is reported as an explicit outcome.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the reading time inside a packet.
pub const TIMESTAMP_KEY: &str = "timestamp";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// How requested element names are matched against packet keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMatch {
    Exact,
    #[default]
    CaseInsensitive,
}

impl FieldMatch {
    pub fn matches(self, key: &str, field: &str) -> bool {
        match self {
            FieldMatch::Exact => key == field,
            FieldMatch::CaseInsensitive => key
                .chars()
                .flat_map(char::to_lowercase)
                .eq(field.chars().flat_map(char::to_lowercase)),
        }
    }

    /// Canonical form of a requested element name under this policy.
    pub fn normalize(self, field: &str) -> String {
        let field = field.trim();
        match self {
            FieldMatch::Exact => field.to_string(),
            FieldMatch::CaseInsensitive => field.to_lowercase(),
        }
    }
}

/// Outcome of looking up one requested field in one packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLookup {
    Absent,
    NotNumeric,
    Number(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct RawPacket<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawPacket<'a> {
    /// Returns None when the packet entry is not a JSON object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| RawPacket { fields })
    }

    /// Calendar date of the reading in the given offset, if the timestamp parses.
    pub fn date(&self, offset: FixedOffset) -> Option<NaiveDate> {
        self.fields
            .get(TIMESTAMP_KEY)
            .and_then(|ts| parse_timestamp(ts, offset))
    }

    /// Case-insensitive lookups prefer an exact key, then the first match in
    /// map iteration order (sorted keys unless serde_json's `preserve_order` is on).
    pub fn lookup(&self, field: &str, policy: FieldMatch) -> FieldLookup {
        let value = match policy {
            FieldMatch::Exact => self.fields.get(field),
            FieldMatch::CaseInsensitive => self.fields.get(field).or_else(|| {
                self.fields
                    .iter()
                    .find(|(key, _)| policy.matches(key, field))
                    .map(|(_, v)| v)
            }),
        };
        match value {
            None => FieldLookup::Absent,
            Some(v) => coerce_number(v).map_or(FieldLookup::NotNumeric, FieldLookup::Number),
        }
    }
}

/// Numeric value of a JSON number or a trimmed numeric string. Non-finite results are rejected.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parses a packet timestamp into a calendar date in `offset`.
///
/// Numbers are Unix epoch milliseconds. A four-digit string is a bare year
/// (January 1st); any longer all-digit string is epoch milliseconds. Strings may also be
/// RFC 3339, RFC 2822, a naive date-time (read as wall-clock time in `offset`)
/// or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(value: &Value, offset: FixedOffset) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => {
                    let f = n.as_f64()?;
                    if !f.is_finite() {
                        return None;
                    }
                    f.trunc() as i64
                }
            };
            epoch_millis_to_date(millis, offset)
        }
        Value::String(s) => parse_timestamp_str(s.trim(), offset),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str, offset: FixedOffset) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        if s.len() == 4 {
            return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
        }
        return epoch_millis_to_date(s.parse().ok()?, offset);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&offset).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&offset).date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn epoch_millis_to_date(millis: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&offset).date_naive())
}
