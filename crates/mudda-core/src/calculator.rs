use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{days_between, BsDate};
use crate::{types::*, MuddaError, MuddaResult};

/// Annual percentage over a 365-day year: rate% * days / (100 * 365).
const DAILY_INTEREST_DIVISOR: Decimal = dec!(36500);

/// Largest amount a stored currency field holds (10 digits, 2 decimals).
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Largest interest rate a record holds (5 digits, 2 decimals).
pub const MAX_INTEREST_RATE: Decimal = dec!(999.99);

// ---------------------------------------------------------------------------
// Tax rate
// ---------------------------------------------------------------------------

/// The two revenue rates the tribunal applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub enum TaxRate {
    #[default]
    OnePercent,
    HalfPercent,
}

impl TaxRate {
    pub const ALL: [TaxRate; 2] = [TaxRate::OnePercent, TaxRate::HalfPercent];

    pub fn as_decimal(&self) -> Rate {
        match self {
            Self::OnePercent => dec!(0.01),
            Self::HalfPercent => dec!(0.005),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnePercent => "1%",
            Self::HalfPercent => "0.5%",
        }
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = MuddaError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        TaxRate::ALL
            .into_iter()
            .find(|rate| rate.as_decimal() == value)
            .ok_or(MuddaError::InvalidTaxRate(value))
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Self {
        rate.as_decimal()
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInput {
    pub principal_amount: Money,
    /// Annual percentage, e.g. 10.00
    pub interest_rate: Percent,
    pub total_days: i64,
    pub tax_rate: Rate,
    #[serde(default)]
    pub prepaid_amount: Money,
    /// Claim typed in by the user. When absent the claim is principal plus interest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub total_days: i64,
    pub interest_amount: Money,
    pub claimed_amount: Money,
    pub total_amount: Money,
    pub tax_revenue_amount: Money,
    pub payable_amount: Money,
}

/// Same inputs with the period given as two BS dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BsCalculationInput {
    pub principal_amount: Money,
    pub interest_rate: Percent,
    pub issue_date: BsDate,
    pub final_date: BsDate,
    pub tax_rate: Rate,
    #[serde(default)]
    pub prepaid_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_amount: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BsCalculationOutput {
    pub issue_date_bs: BsDate,
    pub final_date_bs: BsDate,
    pub issue_date_ad: NaiveDate,
    pub final_date_ad: NaiveDate,
    #[serde(flatten)]
    pub amounts: CalculationOutput,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive every computed currency field. Pure and deterministic; each step
/// is rounded to paisa before it feeds the next one.
pub fn derive_amounts(input: &CalculationInput) -> MuddaResult<CalculationOutput> {
    validate_input(input)?;
    let tax_rate = TaxRate::try_from(input.tax_rate)?;

    if input.total_days < 0 {
        return Err(MuddaError::NegativeDuration {
            days: -input.total_days,
        });
    }

    let days = Decimal::from(input.total_days);
    let interest_amount =
        round2(input.principal_amount * input.interest_rate * days / DAILY_INTEREST_DIVISOR);

    let (claimed_amount, total_amount) = match input.claimed_amount {
        Some(claim) => (round2(claim), round2(claim + interest_amount)),
        None => {
            let claim = round2(input.principal_amount + interest_amount);
            (claim, claim)
        }
    };

    let tax_revenue_amount = round2(total_amount * tax_rate.as_decimal());
    let payable_amount = round2(tax_revenue_amount - input.prepaid_amount);

    Ok(CalculationOutput {
        total_days: input.total_days,
        interest_amount,
        claimed_amount,
        total_amount,
        tax_revenue_amount,
        payable_amount,
    })
}

/// Run the calculation and wrap it in the standard output envelope.
pub fn calculate(input: &CalculationInput) -> MuddaResult<ComputationOutput<CalculationOutput>> {
    let start = Instant::now();
    let output = derive_amounts(input)?;
    let warnings = collect_warnings(input, &output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Simple interest (rate% x days / 36500), revenue on total, payable = revenue - prepaid",
        &assumptions(),
        warnings,
        elapsed,
        output,
    ))
}

/// Convert the BS period to a day count and run the calculation.
pub fn calculate_from_bs(
    input: &BsCalculationInput,
) -> MuddaResult<ComputationOutput<BsCalculationOutput>> {
    let start = Instant::now();
    let calc_input = CalculationInput {
        principal_amount: input.principal_amount,
        interest_rate: input.interest_rate,
        total_days: days_between(&input.issue_date, &input.final_date),
        tax_rate: input.tax_rate,
        prepaid_amount: input.prepaid_amount,
        claimed_amount: input.claimed_amount,
    };
    let amounts = derive_amounts(&calc_input)?;
    let warnings = collect_warnings(&calc_input, &amounts);

    let output = BsCalculationOutput {
        issue_date_bs: input.issue_date,
        final_date_bs: input.final_date,
        issue_date_ad: input.issue_date.to_gregorian(),
        final_date_ad: input.final_date.to_gregorian(),
        amounts,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bikram Sambat period, simple interest (rate% x days / 36500), payable = revenue - prepaid",
        &assumptions(),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn assumptions() -> serde_json::Value {
    serde_json::json!({
        "day_count": "actual days / 365",
        "rounding": "round-half-even to 2 dp at every step",
        "payable_basis": "tax_revenue_amount - prepaid_amount",
        "permitted_tax_rates": ["0.01", "0.005"]
    })
}

fn collect_warnings(input: &CalculationInput, output: &CalculationOutput) -> Vec<String> {
    let mut warnings = Vec::new();
    if output.payable_amount < Decimal::ZERO {
        warnings.push(format!(
            "Prepaid amount exceeds revenue due by {}; nothing further is payable.",
            -output.payable_amount
        ));
    }
    if let Some(claim) = input.claimed_amount {
        if claim < input.principal_amount {
            warnings.push("Claimed amount is below the principal.".into());
        }
    }
    if output.total_days == 0 {
        warnings.push("Issue and final dates coincide; no interest accrues.".into());
    }
    warnings
}

fn validate_amount(field: &str, value: Decimal, max: Decimal) -> MuddaResult<()> {
    if value < Decimal::ZERO {
        return Err(MuddaError::InvalidInput {
            field: field.into(),
            reason: "Amount cannot be negative.".into(),
        });
    }
    if value > max {
        return Err(MuddaError::InvalidInput {
            field: field.into(),
            reason: format!("Amount cannot exceed {max}."),
        });
    }
    if value.normalize().scale() > CURRENCY_DP {
        return Err(MuddaError::InvalidInput {
            field: field.into(),
            reason: "At most 2 decimal places are allowed.".into(),
        });
    }
    Ok(())
}

fn validate_input(input: &CalculationInput) -> MuddaResult<()> {
    validate_amount("principal_amount", input.principal_amount, MAX_AMOUNT)?;
    validate_amount("interest_rate", input.interest_rate, MAX_INTEREST_RATE)?;
    validate_amount("prepaid_amount", input.prepaid_amount, MAX_AMOUNT)?;
    if let Some(claim) = input.claimed_amount {
        validate_amount("claimed_amount", claim, MAX_AMOUNT)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_input() -> CalculationInput {
        CalculationInput {
            principal_amount: dec!(100000.00),
            interest_rate: dec!(10.00),
            total_days: 365,
            tax_rate: dec!(0.01),
            prepaid_amount: dec!(0.00),
            claimed_amount: None,
        }
    }

    #[test]
    fn test_one_year_at_ten_percent() {
        let out = derive_amounts(&sample_input()).unwrap();
        assert_eq!(out.total_days, 365);
        assert_eq!(out.interest_amount, dec!(10000.00));
        assert_eq!(out.claimed_amount, dec!(110000.00));
        assert_eq!(out.total_amount, dec!(110000.00));
        assert_eq!(out.tax_revenue_amount, dec!(1100.00));
        assert_eq!(out.payable_amount, dec!(1100.00));
        assert_eq!(out.payable_amount.to_string(), "1100.00");
    }

    #[test]
    fn test_zero_days_means_zero_interest() {
        let input = CalculationInput {
            total_days: 0,
            ..sample_input()
        };
        let out = derive_amounts(&input).unwrap();
        assert_eq!(out.interest_amount, dec!(0.00));
        assert_eq!(out.interest_amount.to_string(), "0.00");
        assert_eq!(out.claimed_amount, dec!(100000.00));
    }

    #[test]
    fn test_interest_rounds_half_even() {
        // 1000 * 7.3 * 1 / 36500 = 0.2 exactly
        let input = CalculationInput {
            principal_amount: dec!(1000),
            interest_rate: dec!(7.3),
            total_days: 1,
            ..sample_input()
        };
        assert_eq!(derive_amounts(&input).unwrap().interest_amount, dec!(0.20));

        // 125 * 36.5 * 1 / 36500 = 0.125 -> 0.12 (half-even), not 0.13
        let input = CalculationInput {
            principal_amount: dec!(125),
            interest_rate: dec!(36.5),
            total_days: 1,
            ..sample_input()
        };
        assert_eq!(derive_amounts(&input).unwrap().interest_amount, dec!(0.12));
    }

    #[test]
    fn test_revenue_rounds_half_even() {
        // total 112.50 * 0.01 = 1.125 -> 1.12
        let input = CalculationInput {
            principal_amount: dec!(112.50),
            interest_rate: dec!(0),
            total_days: 30,
            ..sample_input()
        };
        let out = derive_amounts(&input).unwrap();
        assert_eq!(out.total_amount, dec!(112.50));
        assert_eq!(out.tax_revenue_amount, dec!(1.12));
    }

    #[test]
    fn test_half_percent_tax() {
        let input = CalculationInput {
            tax_rate: dec!(0.005),
            prepaid_amount: dec!(50),
            ..sample_input()
        };
        let out = derive_amounts(&input).unwrap();
        assert_eq!(out.tax_revenue_amount, dec!(550.00));
        assert_eq!(out.payable_amount, dec!(500.00));
    }

    #[test]
    fn test_supplied_claim_adds_interest_to_total() {
        let input = CalculationInput {
            claimed_amount: Some(dec!(120000)),
            ..sample_input()
        };
        let out = derive_amounts(&input).unwrap();
        assert_eq!(out.claimed_amount, dec!(120000.00));
        assert_eq!(out.total_amount, dec!(130000.00));
        assert_eq!(out.tax_revenue_amount, dec!(1300.00));
    }

    #[test]
    fn test_invalid_tax_rate() {
        for rate in [dec!(0.015), dec!(0), dec!(1), dec!(0.05)] {
            let input = CalculationInput {
                tax_rate: rate,
                ..sample_input()
            };
            assert_eq!(derive_amounts(&input).unwrap_err(), MuddaError::InvalidTaxRate(rate));
        }
    }

    #[test]
    fn test_tax_rate_scale_does_not_matter() {
        assert_eq!(TaxRate::try_from(dec!(0.010)).unwrap(), TaxRate::OnePercent);
        assert_eq!(TaxRate::try_from(dec!(0.0050)).unwrap(), TaxRate::HalfPercent);
    }

    #[test]
    fn test_negative_duration() {
        let input = CalculationInput {
            total_days: -3,
            ..sample_input()
        };
        assert_eq!(
            derive_amounts(&input).unwrap_err(),
            MuddaError::NegativeDuration { days: 3 }
        );
    }

    #[test]
    fn test_rejects_negative_and_oversized_amounts() {
        let input = CalculationInput {
            principal_amount: dec!(-1),
            ..sample_input()
        };
        let err = derive_amounts(&input).unwrap_err();
        assert_eq!(err.field(), Some("principal_amount"));

        let input = CalculationInput {
            prepaid_amount: dec!(100000000.00),
            ..sample_input()
        };
        assert_eq!(derive_amounts(&input).unwrap_err().field(), Some("prepaid_amount"));

        let input = CalculationInput {
            interest_rate: dec!(10.125),
            ..sample_input()
        };
        assert_eq!(derive_amounts(&input).unwrap_err().field(), Some("interest_rate"));
    }

    #[test]
    fn test_prepaid_above_revenue_warns() {
        let input = CalculationInput {
            prepaid_amount: dec!(2000),
            ..sample_input()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.result.payable_amount, dec!(-900.00));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_calculate_from_bs() {
        let input = BsCalculationInput {
            principal_amount: dec!(100000.00),
            interest_rate: dec!(10.00),
            issue_date: "2080-01-01".parse().unwrap(),
            final_date: "2081-01-01".parse().unwrap(),
            tax_rate: dec!(0.01),
            prepaid_amount: dec!(0),
            claimed_amount: None,
        };
        let out = calculate_from_bs(&input).unwrap().result;
        assert_eq!(out.issue_date_ad, NaiveDate::from_ymd_opt(2023, 4, 14).unwrap());
        assert_eq!(out.final_date_ad, NaiveDate::from_ymd_opt(2024, 4, 13).unwrap());
        assert_eq!(out.amounts.total_days, 365);
        assert_eq!(out.amounts.payable_amount, dec!(1100.00));
    }

    #[test]
    fn test_calculate_from_bs_reversed_dates() {
        let input = BsCalculationInput {
            principal_amount: dec!(5000),
            interest_rate: dec!(12),
            issue_date: "2081-02-10".parse().unwrap(),
            final_date: "2081-02-01".parse().unwrap(),
            tax_rate: dec!(0.01),
            prepaid_amount: dec!(0),
            claimed_amount: None,
        };
        assert_eq!(
            calculate_from_bs(&input).unwrap_err(),
            MuddaError::NegativeDuration { days: 9 }
        );
    }

    #[test]
    fn test_output_serializes_amounts_as_strings() {
        let out = derive_amounts(&sample_input()).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["payable_amount"], "1100.00");
        assert_eq!(json["total_days"], 365);
    }
}
