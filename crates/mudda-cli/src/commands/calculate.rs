use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mudda_core::calculator::{self, BsCalculationInput, CalculationInput};
use mudda_core::calendar::BsDate;
use mudda_core::case::parse_tax_rate;
use mudda_core::numerals::parse_local_decimal;

use crate::input;
use crate::settings::AppConfig;

/// Arguments for a stand-alone calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CalculateArgs {
    /// Path to JSON or YAML input file (overrides individual flags). Without
    /// it or any flag, input is read from stdin
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount; Devanagari digits and grouping commas accepted
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Issue date (BS, YYYY-MM-DD)
    #[arg(long)]
    pub issue_date: Option<String>,

    /// Final date (BS, YYYY-MM-DD)
    #[arg(long)]
    pub final_date: Option<String>,

    /// Day count, in place of issue and final dates
    #[arg(long, conflicts_with_all = ["issue_date", "final_date"])]
    pub days: Option<i64>,

    /// Tax rate: 0.01 / 1% or 0.005 / 0.5%
    #[arg(long)]
    pub tax_rate: Option<String>,

    /// Amount already paid toward revenue
    #[arg(long)]
    pub prepaid: Option<String>,

    /// Claimed amount; derived as principal plus interest when omitted
    #[arg(long)]
    pub claimed: Option<String>,

    /// Print amounts and dates with Devanagari digits
    #[arg(long)]
    pub local: bool,
}

impl CalculateArgs {
    /// Whether any calculation value was given on the command line.
    fn has_flags(&self) -> bool {
        [
            &self.principal,
            &self.rate,
            &self.issue_date,
            &self.final_date,
            &self.tax_rate,
            &self.prepaid,
            &self.claimed,
        ]
        .iter()
        .any(|flag| flag.is_some())
            || self.days.is_some()
    }
}

pub fn run_calculate(
    args: CalculateArgs,
    config: &AppConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let document = if let Some(ref path) = args.input {
        Some(input::file::read_input::<Value>(path)?)
    } else if args.has_flags() {
        None
    } else {
        input::stdin::read_stdin()?
    };

    let mut value = match document {
        Some(data) if data.get("total_days").is_some() => {
            let calc_input: CalculationInput = serde_json::from_value(data)?;
            serde_json::to_value(calculator::calculate(&calc_input)?)?
        }
        Some(data) => {
            let bs_input: BsCalculationInput = serde_json::from_value(data)?;
            serde_json::to_value(calculator::calculate_from_bs(&bs_input)?)?
        }
        None => from_flags(&args, config)?,
    };

    if args.local {
        super::localize(&mut value);
    }
    Ok(value)
}

fn from_flags(args: &CalculateArgs, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let principal_amount = parse_local_decimal(
        "principal_amount",
        args.principal
            .as_deref()
            .ok_or("--principal is required (or provide --input)")?,
    )?;
    let interest_rate = parse_local_decimal(
        "interest_rate",
        args.rate.as_deref().ok_or("--rate is required (or provide --input)")?,
    )?;
    let tax_rate = match args.tax_rate.as_deref() {
        Some(raw) => parse_tax_rate(raw)?,
        None => config.calculator.default_tax_rate.as_decimal(),
    };
    let prepaid_amount = match args.prepaid.as_deref() {
        Some(raw) => parse_local_decimal("prepaid_amount", raw)?,
        None => Decimal::ZERO,
    };
    let claimed_amount = args
        .claimed
        .as_deref()
        .map(|raw| parse_local_decimal("claimed_amount", raw))
        .transpose()?;

    if let Some(total_days) = args.days {
        let calc_input = CalculationInput {
            principal_amount,
            interest_rate,
            total_days,
            tax_rate,
            prepaid_amount,
            claimed_amount,
        };
        return Ok(serde_json::to_value(calculator::calculate(&calc_input)?)?);
    }

    let bs_input = BsCalculationInput {
        principal_amount,
        interest_rate,
        issue_date: BsDate::parse_field(
            "issue_date",
            args.issue_date
                .as_deref()
                .ok_or("--issue-date is required (or provide --days or --input)")?,
        )?,
        final_date: BsDate::parse_field(
            "final_date",
            args.final_date
                .as_deref()
                .ok_or("--final-date is required (or provide --days or --input)")?,
        )?,
        tax_rate,
        prepaid_amount,
        claimed_amount,
    };
    Ok(serde_json::to_value(calculator::calculate_from_bs(&bs_input)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CalculateArgs {
        CalculateArgs {
            input: None,
            principal: Some("१,००,०००.००".into()),
            rate: Some("10".into()),
            issue_date: Some("२०८०-०१-०१".into()),
            final_date: Some("2081-01-01".into()),
            days: None,
            tax_rate: None,
            prepaid: None,
            claimed: None,
            local: false,
        }
    }

    #[test]
    fn test_flags_with_bs_dates() {
        let value = from_flags(&args(), &AppConfig::default()).unwrap();
        assert_eq!(value["result"]["total_days"], 365);
        assert_eq!(value["result"]["interest_amount"], "10000.00");
        assert_eq!(value["result"]["payable_amount"], "1100.00");
        assert_eq!(value["result"]["issue_date_ad"], "2023-04-14");
    }

    #[test]
    fn test_flags_with_day_count_and_half_rate() {
        let args = CalculateArgs {
            issue_date: None,
            final_date: None,
            days: Some(365),
            tax_rate: Some("0.5%".into()),
            prepaid: Some("५००".into()),
            ..args()
        };
        let value = from_flags(&args, &AppConfig::default()).unwrap();
        // 110000.00 * 0.005 = 550.00, less 500 prepaid
        assert_eq!(value["result"]["tax_revenue_amount"], "550.00");
        assert_eq!(value["result"]["payable_amount"], "50.00");
    }

    #[test]
    fn test_flags_skip_stdin() {
        let args = CalculateArgs {
            issue_date: None,
            final_date: None,
            days: Some(365),
            ..args()
        };
        assert!(args.has_flags());
        let value = run_calculate(args, &AppConfig::default()).unwrap();
        assert_eq!(value["result"]["payable_amount"], "1100.00");
    }

    #[test]
    fn test_no_flags_detected() {
        let bare = CalculateArgs {
            principal: None,
            rate: None,
            issue_date: None,
            final_date: None,
            ..args()
        };
        assert!(!bare.has_flags());
    }

    #[test]
    fn test_missing_principal_names_the_flag() {
        let args = CalculateArgs {
            principal: None,
            ..args()
        };
        let err = from_flags(&args, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--principal"));
    }

    #[test]
    fn test_rejected_tax_rate_is_typed() {
        let args = CalculateArgs {
            tax_rate: Some("1.5%".into()),
            ..args()
        };
        let err = from_flags(&args, &AppConfig::default()).unwrap_err();
        assert!(err.downcast_ref::<mudda_core::MuddaError>().is_some());
    }
}
