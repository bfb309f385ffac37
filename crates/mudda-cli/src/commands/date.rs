use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::{json, Value};

use mudda_core::calendar::{days_between, BsDate};
use mudda_core::numerals::{to_ascii_digits, to_local_digits};

#[derive(Subcommand)]
pub enum DateCommand {
    /// Convert a BS date (YYYY-MM-DD) to its Gregorian date
    ToAd { date: String },
    /// Convert a Gregorian date (YYYY-MM-DD) to BS
    ToBs { date: String },
    /// Days from the issue date to the final date, both BS
    Days { issue_date: String, final_date: String },
    /// Today's date in BS
    Today,
}

pub fn run_date(command: DateCommand) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        DateCommand::ToAd { date } => {
            let bs = BsDate::parse_field("date", &date)?;
            Ok(json!({
                "input": date,
                "converted": bs.to_gregorian().to_string(),
                "bs_local": to_local_digits(&bs.to_string()),
                "month_name": bs.month_name(),
            }))
        }
        DateCommand::ToBs { date } => {
            let ad = NaiveDate::parse_from_str(to_ascii_digits(date.trim()).as_str(), "%Y-%m-%d")
                .map_err(|e| format!("'{date}' is not an AD date (YYYY-MM-DD): {e}"))?;
            Ok(describe(&date, BsDate::from_gregorian(ad)?))
        }
        DateCommand::Days {
            issue_date,
            final_date,
        } => {
            let issue = BsDate::parse_field("issue_date", &issue_date)?;
            let last = BsDate::parse_field("final_date", &final_date)?;
            Ok(json!({
                "issue_date": issue.to_string(),
                "final_date": last.to_string(),
                "total_days": days_between(&issue, &last),
            }))
        }
        DateCommand::Today => Ok(describe("today", BsDate::today()?)),
    }
}

fn describe(input: &str, bs: BsDate) -> Value {
    json!({
        "input": input,
        "converted": bs.to_string(),
        "bs_local": to_local_digits(&bs.to_string()),
        "month_name": bs.month_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ad_accepts_devanagari() {
        let value = run_date(DateCommand::ToAd {
            date: "२०८१-०१-०१".into(),
        })
        .unwrap();
        assert_eq!(value["converted"], "2024-04-13");
        assert_eq!(value["bs_local"], "२०८१-०१-०१");
    }

    #[test]
    fn test_to_bs() {
        let value = run_date(DateCommand::ToBs {
            date: "2023-04-14".into(),
        })
        .unwrap();
        assert_eq!(value["converted"], "2080-01-01");
    }

    #[test]
    fn test_days_is_signed() {
        let value = run_date(DateCommand::Days {
            issue_date: "2081-01-02".into(),
            final_date: "2081-01-01".into(),
        })
        .unwrap();
        assert_eq!(value["total_days"], -1);
    }

    #[test]
    fn test_bad_ad_date() {
        assert!(run_date(DateCommand::ToBs {
            date: "14/04/2023".into()
        })
        .is_err());
    }
}
