//! Bikram Sambat (BS) ↔ Gregorian conversion.
//!
//! Every BS date maps to a day offset from the table epoch (2060-01-01 BS);
//! the Gregorian side is plain `chrono` arithmetic on that offset, so the
//! mapping is a day-accurate bijection over the supported years and elapsed
//! days agree with Gregorian subtraction by construction.

pub mod data;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MuddaError;
use crate::numerals::to_ascii_digits;
use crate::MuddaResult;

/// Nepali month names, Baisakh first.
pub const MONTH_NAMES: [&str; 12] = [
    "बैशाख", "जेठ", "असार", "साउन", "भदौ", "असोज", "कात्तिक", "मंसिर", "पुस", "माघ", "फागुन",
    "चैत",
];

/// A validated Bikram Sambat calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BsDate {
    year: i32,
    month: u32,
    day: u32,
}

impl BsDate {
    pub fn new(year: i32, month: u32, day: u32) -> MuddaResult<Self> {
        Self::checked("date", year, month, day)
    }

    fn checked(field: &str, year: i32, month: u32, day: u32) -> MuddaResult<Self> {
        let text = format!("{year:04}-{month:02}-{day:02}");
        let months = data::months_of(year).ok_or_else(|| {
            MuddaError::date_format(
                field,
                &text,
                format!(
                    "year outside supported calendar range {}–{}",
                    data::FIRST_YEAR,
                    data::LAST_YEAR
                ),
            )
        })?;
        if !(1..=12).contains(&month) {
            return Err(MuddaError::date_format(field, &text, "month must be 1–12"));
        }
        let month_len = u32::from(months[(month - 1) as usize]);
        if day < 1 || day > month_len {
            return Err(MuddaError::date_format(
                field,
                &text,
                format!("{} {year} has {month_len} days", MONTH_NAMES[(month - 1) as usize]),
            ));
        }
        Ok(Self { year, month, day })
    }

    /// Parse `"YYYY-MM-DD"`, accepting Devanagari digits, attributing any
    /// failure to `field`.
    pub fn parse_field(field: &str, input: &str) -> MuddaResult<Self> {
        let ascii = to_ascii_digits(input.trim());
        let parts: Vec<&str> = ascii.split('-').collect();
        if parts.len() != 3 {
            return Err(MuddaError::date_format(field, input, "expected YYYY-MM-DD"));
        }
        let year: i32 = parts[0]
            .parse()
            .map_err(|_| MuddaError::date_format(field, input, "year is not a number"))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| MuddaError::date_format(field, input, "month is not a number"))?;
        let day: u32 = parts[2]
            .parse()
            .map_err(|_| MuddaError::date_format(field, input, "day is not a number"))?;
        Self::checked(field, year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Days elapsed since 2060-01-01 BS.
    fn ordinal(&self) -> i64 {
        let full_years: i64 = (data::FIRST_YEAR..self.year)
            .filter_map(data::year_length)
            .sum();
        let full_months: i64 = data::months_of(self.year)
            .map(|m| m[..(self.month - 1) as usize].iter().map(|d| i64::from(*d)).sum())
            .unwrap_or(0);
        full_years + full_months + i64::from(self.day) - 1
    }

    fn from_ordinal(field: &str, ordinal: i64, source: &str) -> MuddaResult<Self> {
        if ordinal < 0 {
            return Err(MuddaError::date_format(field, source, "before supported calendar range"));
        }
        let mut remaining = ordinal;
        for year in data::FIRST_YEAR..=data::LAST_YEAR {
            let months = data::months_of(year).ok_or_else(|| {
                MuddaError::date_format(field, source, "calendar table is incomplete")
            })?;
            let len = data::year_length(year).unwrap_or(0);
            if remaining >= len {
                remaining -= len;
                continue;
            }
            for (idx, days) in months.iter().enumerate() {
                let days = i64::from(*days);
                if remaining < days {
                    return Ok(Self {
                        year,
                        month: idx as u32 + 1,
                        day: remaining as u32 + 1,
                    });
                }
                remaining -= days;
            }
        }
        Err(MuddaError::date_format(field, source, "after supported calendar range"))
    }

    pub fn to_gregorian(&self) -> NaiveDate {
        data::epoch() + Duration::days(self.ordinal())
    }

    pub fn from_gregorian(date: NaiveDate) -> MuddaResult<Self> {
        let ordinal = (date - data::epoch()).num_days();
        Self::from_ordinal("date", ordinal, &date.to_string())
    }

    /// Today's date in BS, from the local clock.
    pub fn today() -> MuddaResult<Self> {
        Self::from_gregorian(Local::now().date_naive())
    }
}

/// Days from `issue` to `final_date`; negative when `final_date` is earlier.
pub fn days_between(issue: &BsDate, final_date: &BsDate) -> i64 {
    final_date.ordinal() - issue.ordinal()
}

impl fmt::Display for BsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BsDate {
    type Err = MuddaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("date", s)
    }
}

impl TryFrom<String> for BsDate {
    type Error = MuddaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BsDate> for String {
    fn from(date: BsDate) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ad(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_anchors() {
        assert_eq!("2060-01-01".parse::<BsDate>().unwrap().to_gregorian(), ad(2003, 4, 14));
        assert_eq!("2077-01-01".parse::<BsDate>().unwrap().to_gregorian(), ad(2020, 4, 13));
        assert_eq!("2080-01-01".parse::<BsDate>().unwrap().to_gregorian(), ad(2023, 4, 14));
        assert_eq!("2081-01-01".parse::<BsDate>().unwrap().to_gregorian(), ad(2024, 4, 13));
        assert_eq!("2082-01-01".parse::<BsDate>().unwrap().to_gregorian(), ad(2025, 4, 14));
    }

    #[test]
    fn test_month_start_anchors() {
        let anchors = [
            ((2081, 2, 1), ad(2024, 5, 14)),
            ((2081, 3, 1), ad(2024, 6, 15)),
            ((2081, 4, 1), ad(2024, 7, 16)),
            ((2081, 10, 1), ad(2025, 1, 14)),
            ((2081, 12, 1), ad(2025, 3, 14)),
            ((2082, 2, 1), ad(2025, 5, 15)),
            ((2082, 3, 1), ad(2025, 6, 15)),
            ((2082, 4, 1), ad(2025, 7, 17)),
            ((2082, 6, 1), ad(2025, 9, 17)),
        ];
        for ((y, m, d), expected) in anchors {
            let bs = BsDate::new(y, m, d).unwrap();
            assert_eq!(bs.to_gregorian(), expected, "{bs}");
            assert_eq!(BsDate::from_gregorian(expected).unwrap(), bs);
        }
    }

    #[test]
    fn test_every_year_is_365_or_366_days() {
        for year in data::FIRST_YEAR..=data::LAST_YEAR {
            let days = data::year_length(year).unwrap();
            assert!((365..=366).contains(&days), "{year}: {days}");
        }
    }

    #[test]
    fn test_month_boundaries() {
        // Baisakh 2080 has 31 days, Jestha 2080 starts the day after
        let last = BsDate::new(2080, 1, 31).unwrap();
        let next = BsDate::new(2080, 2, 1).unwrap();
        assert_eq!(next.to_gregorian() - last.to_gregorian(), Duration::days(1));
        assert_eq!(last.to_gregorian(), ad(2023, 5, 14));
    }

    #[test]
    fn test_from_gregorian_inverts() {
        for text in ["2060-01-01", "2072-06-30", "2080-12-30", "2081-03-31", "2090-12-30"] {
            let bs: BsDate = text.parse().unwrap();
            assert_eq!(BsDate::from_gregorian(bs.to_gregorian()).unwrap(), bs);
        }
        assert_eq!(BsDate::from_gregorian(ad(2024, 4, 12)).unwrap().to_string(), "2080-12-30");
    }

    #[test]
    fn test_days_between_matches_gregorian() {
        let a: BsDate = "2079-05-17".parse().unwrap();
        let b: BsDate = "2081-09-03".parse().unwrap();
        let gregorian = (b.to_gregorian() - a.to_gregorian()).num_days();
        assert_eq!(days_between(&a, &b), gregorian);
        assert_eq!(days_between(&b, &a), -gregorian);
    }

    #[test]
    fn test_year_2080_is_365_days() {
        let a: BsDate = "2080-01-01".parse().unwrap();
        let b: BsDate = "2081-01-01".parse().unwrap();
        assert_eq!(days_between(&a, &b), 365);
    }

    #[test]
    fn test_parse_devanagari_digits() {
        let bs: BsDate = "२०८१-०१-०१".parse().unwrap();
        assert_eq!(bs, BsDate::new(2081, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "2080-01", "2080/01/01", "20a0-01-01", "2080-01-01-01"] {
            let err = BsDate::parse_field("issue_date", bad).unwrap_err();
            assert!(matches!(err, MuddaError::DateFormat { .. }), "{bad}: {err:?}");
            assert_eq!(err.field(), Some("issue_date"));
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("2059-12-30".parse::<BsDate>().is_err());
        assert!("2091-01-01".parse::<BsDate>().is_err());
        assert!("2080-13-01".parse::<BsDate>().is_err());
        assert!("2080-00-10".parse::<BsDate>().is_err());
        // Ashwin 2080 has 30 days
        assert!("2080-06-31".parse::<BsDate>().is_err());
        assert!("2080-03-32".parse::<BsDate>().is_err());
    }

    #[test]
    fn test_from_gregorian_out_of_range() {
        assert!(BsDate::from_gregorian(ad(2003, 4, 13)).is_err());
        assert!(BsDate::from_gregorian(ad(2040, 1, 1)).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let bs = BsDate::new(2080, 4, 9).unwrap();
        let json = serde_json::to_string(&bs).unwrap();
        assert_eq!(json, "\"2080-04-09\"");
        let back: BsDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bs);
        assert!(serde_json::from_str::<BsDate>("\"2080-04-40\"").is_err());
    }
}
