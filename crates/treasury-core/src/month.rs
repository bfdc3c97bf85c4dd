use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::TreasuryError;

pub const INVALID_MONTH: &str = "Invalid month format";

/// A `YYYY-MM` bucket key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    pub fn parse(value: &str) -> Result<Self, TreasuryError> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(TreasuryError::validation(INVALID_MONTH));
        }

        let month: u32 = value[5..]
            .parse()
            .map_err(|_| TreasuryError::validation(INVALID_MONTH))?;
        if !(1..=12).contains(&month) {
            return Err(TreasuryError::validation(INVALID_MONTH));
        }

        Ok(Self(value.to_string()))
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self(format!("{:04}-{:02}", at.year(), at.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MonthKey {
    type Err = TreasuryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = TreasuryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn parses_well_formed_keys() {
        assert_eq!(MonthKey::parse("2024-06").unwrap().as_str(), "2024-06");
        assert_eq!(MonthKey::parse("1999-12").unwrap().to_string(), "1999-12");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["2024-6", "24-06", "2024/06", "2024-13", "2024-00", "abcd-ef", "", "2024-06-01"] {
            let err = MonthKey::parse(raw).unwrap_err();
            assert_eq!(err.to_string(), INVALID_MONTH, "{raw} should be rejected");
        }
    }

    #[test]
    fn derives_key_in_the_given_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 30, 20, 0, 0).unwrap();
        assert_eq!(MonthKey::from_datetime(&instant).as_str(), "2024-06");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(
            MonthKey::from_datetime(&instant.with_timezone(&ist)).as_str(),
            "2024-07"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = MonthKey::parse("2024-06").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-06\"");
        assert!(serde_json::from_str::<MonthKey>("\"2024-13\"").is_err());
    }
}
