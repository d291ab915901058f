// Calendar month as requested by the chart page ("01".."12").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthError {
    #[error("month must be two digits \"01\"..\"12\", got {0:?}")]
    Format(String),
    #[error("month out of range 1..=12: {0}")]
    Range(u32),
}

/// Month of the year, 1..=12. Displays zero-padded ("06").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(number: u32) -> Result<Self, MonthError> {
        if (1..=12).contains(&number) {
            Ok(Month(number as u8))
        } else {
            Err(MonthError::Range(number))
        }
    }

    pub fn number(self) -> u32 {
        u32::from(self.0)
    }
}

impl FromStr for Month {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MonthError::Format(s.to_string()));
        }
        let n: u32 = s.parse().map_err(|_| MonthError::Format(s.to_string()))?;
        Month::new(n)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_digit_months() {
        assert_eq!("01".parse::<Month>().unwrap().number(), 1);
        assert_eq!("12".parse::<Month>().unwrap().number(), 12);
        assert_eq!("06".parse::<Month>().unwrap().to_string(), "06");
    }

    #[test]
    fn rejects_bad_months() {
        assert!(matches!("6".parse::<Month>(), Err(MonthError::Format(_))));
        assert!(matches!("13".parse::<Month>(), Err(MonthError::Range(13))));
        assert!(matches!("00".parse::<Month>(), Err(MonthError::Range(0))));
        assert!(matches!("ab".parse::<Month>(), Err(MonthError::Format(_))));
    }
}
