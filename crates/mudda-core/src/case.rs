use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calculator::{derive_amounts, CalculationInput, CalculationOutput, TaxRate};
use crate::calendar::{days_between, BsDate};
use crate::numerals::parse_local_decimal;
use crate::{types::*, MuddaError, MuddaResult};

pub const MAX_CASE_NUMBER_LEN: usize = 15;
pub const MAX_TEXT_LEN: usize = 100;
pub const MAX_BANK_NAME_LEN: usize = 255;

pub type BankId = u32;

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

/// Petitioner identity. Cases refer to it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Open,
    Closed,
    Pending,
}

impl CaseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Pending => "Pending",
        }
    }

    pub fn local_label(&self) -> &'static str {
        match self {
            Self::Open => "खुला",
            Self::Closed => "बन्द",
            Self::Pending => "विचाराधीन",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CaseStatus {
    type Err = MuddaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "खुला" => Ok(Self::Open),
            "closed" | "बन्द" => Ok(Self::Closed),
            "pending" | "विचाराधीन" => Ok(Self::Pending),
            other => Err(MuddaError::InvalidInput {
                field: "status".into(),
                reason: format!("'{other}' is not one of open, closed, pending"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed input
// ---------------------------------------------------------------------------

/// Everything staff supply for a case, already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    pub case_number: String,
    pub title: String,
    /// Bank name, resolved against the bank directory on save.
    #[serde(default)]
    pub petitioner: Option<String>,
    pub defendant: String,
    pub principal_amount: Money,
    pub interest_rate: Percent,
    #[serde(default)]
    pub prepaid_amount: Money,
    #[serde(default)]
    pub claimed_amount: Option<Money>,
    pub issue_date: BsDate,
    pub final_date: BsDate,
    #[serde(default)]
    pub document_date: Option<BsDate>,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Rate,
    #[serde(default)]
    pub status: CaseStatus,
}

fn default_tax_rate() -> Rate {
    TaxRate::default().as_decimal()
}

// ---------------------------------------------------------------------------
// Raw form input
// ---------------------------------------------------------------------------

/// Case fields exactly as typed, digits in either numeral system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseForm {
    pub case_number: String,
    pub title: String,
    pub petitioner: Option<String>,
    pub defendant: String,
    pub principal_amount: String,
    pub interest_rate: String,
    pub prepaid_amount: String,
    pub claimed_amount: String,
    pub issue_date: String,
    pub final_date: String,
    pub document_date: String,
    pub tax_rate: String,
    pub status: String,
}

impl CaseForm {
    /// Parse and normalise every field. Fails on the first field that does
    /// not parse; nothing is computed here.
    pub fn clean(&self) -> MuddaResult<CaseInput> {
        let principal_amount = parse_required("principal_amount", &self.principal_amount)?;
        let interest_rate = parse_required("interest_rate", &self.interest_rate)?;
        let prepaid_amount = parse_local_decimal("prepaid_amount", &self.prepaid_amount)?;
        let claimed_amount = if self.claimed_amount.trim().is_empty() {
            None
        } else {
            Some(parse_local_decimal("claimed_amount", &self.claimed_amount)?)
        };

        let issue_date = BsDate::parse_field("issue_date", &self.issue_date)?;
        let final_date = BsDate::parse_field("final_date", &self.final_date)?;
        let document_date = if self.document_date.trim().is_empty() {
            None
        } else {
            Some(BsDate::parse_field("document_date", &self.document_date)?)
        };

        let status = if self.status.trim().is_empty() {
            CaseStatus::default()
        } else {
            self.status.parse()?
        };

        Ok(CaseInput {
            case_number: self.case_number.trim().to_string(),
            title: self.title.trim().to_string(),
            petitioner: self
                .petitioner
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            defendant: self.defendant.trim().to_string(),
            principal_amount,
            interest_rate,
            prepaid_amount,
            claimed_amount,
            issue_date,
            final_date,
            document_date,
            tax_rate: parse_tax_rate(&self.tax_rate)?,
            status,
        })
    }

    /// Pre-filled form for editing an existing record.
    pub fn from_record(record: &CaseRecord, petitioner: Option<&Bank>) -> Self {
        Self {
            case_number: record.case_number.clone(),
            title: record.title.clone(),
            petitioner: petitioner.map(|b| b.name.clone()),
            defendant: record.defendant.clone(),
            principal_amount: record.principal_amount.to_string(),
            interest_rate: record.interest_rate.to_string(),
            prepaid_amount: record.prepaid_amount.to_string(),
            claimed_amount: record
                .supplied_claim
                .map(|c| c.to_string())
                .unwrap_or_default(),
            issue_date: record.issue_date_bs.to_string(),
            final_date: record.final_date_bs.to_string(),
            document_date: record
                .document_date_bs
                .map(|d| d.to_string())
                .unwrap_or_default(),
            tax_rate: record.tax_rate.as_decimal().to_string(),
            status: record.status.label().to_lowercase(),
        }
    }
}

/// Principal and rate must be typed; only prepaid and claim may be blank.
fn parse_required(field: &str, raw: &str) -> MuddaResult<Decimal> {
    if raw.trim().is_empty() {
        return Err(MuddaError::InvalidInput {
            field: field.to_string(),
            reason: "required".into(),
        });
    }
    parse_local_decimal(field, raw)
}

/// Accepts the fraction (`0.01`) or the label (`1%`, `०.५%`). Any other
/// number is passed through so the calculator can reject it by value.
pub fn parse_tax_rate(raw: &str) -> MuddaResult<Rate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default_tax_rate());
    }
    match raw.strip_suffix('%') {
        Some(pct) => Ok(parse_local_decimal("tax_rate", pct)? / Decimal::ONE_HUNDRED),
        None => parse_local_decimal("tax_rate", raw),
    }
}

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// A saved case: inputs plus every derived field, recomputed on each save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_number: String,
    pub title: String,
    pub petitioner: Option<BankId>,
    pub defendant: String,
    pub principal_amount: Money,
    pub interest_rate: Percent,
    pub prepaid_amount: Money,
    /// Claim as typed; `None` when the claim is derived from principal and interest.
    pub supplied_claim: Option<Money>,
    pub issue_date_bs: BsDate,
    pub final_date_bs: BsDate,
    pub document_date_bs: Option<BsDate>,
    pub tax_rate: TaxRate,
    pub status: CaseStatus,

    pub issue_date_ad: NaiveDate,
    pub final_date_ad: NaiveDate,
    #[serde(flatten)]
    pub amounts: CalculationOutput,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaseRecord {
    /// Validate `input` and build the record with all derived fields.
    pub fn compute(
        input: &CaseInput,
        petitioner: Option<BankId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> MuddaResult<Self> {
        validate_identity(input)?;
        let tax_rate = TaxRate::try_from(input.tax_rate)?;
        let amounts = derive_amounts(&calculation_input(
            input.principal_amount,
            input.interest_rate,
            &input.issue_date,
            &input.final_date,
            tax_rate,
            input.prepaid_amount,
            input.claimed_amount,
        ))?;

        Ok(Self {
            case_number: input.case_number.trim().to_string(),
            title: input.title.clone(),
            petitioner,
            defendant: input.defendant.clone(),
            principal_amount: input.principal_amount,
            interest_rate: input.interest_rate,
            prepaid_amount: input.prepaid_amount,
            supplied_claim: input.claimed_amount,
            issue_date_bs: input.issue_date,
            final_date_bs: input.final_date,
            document_date_bs: input.document_date,
            tax_rate,
            status: input.status,
            issue_date_ad: input.issue_date.to_gregorian(),
            final_date_ad: input.final_date.to_gregorian(),
            amounts,
            created_at,
            updated_at,
        })
    }

    /// Derived fields recomputed from the stored inputs alone.
    pub fn recompute(&self) -> MuddaResult<CalculationOutput> {
        derive_amounts(&calculation_input(
            self.principal_amount,
            self.interest_rate,
            &self.issue_date_bs,
            &self.final_date_bs,
            self.tax_rate,
            self.prepaid_amount,
            self.supplied_claim,
        ))
    }

    /// Typed input that would reproduce this record.
    pub fn to_input(&self, petitioner: Option<&Bank>) -> CaseInput {
        CaseInput {
            case_number: self.case_number.clone(),
            title: self.title.clone(),
            petitioner: petitioner.map(|b| b.name.clone()),
            defendant: self.defendant.clone(),
            principal_amount: self.principal_amount,
            interest_rate: self.interest_rate,
            prepaid_amount: self.prepaid_amount,
            claimed_amount: self.supplied_claim,
            issue_date: self.issue_date_bs,
            final_date: self.final_date_bs,
            document_date: self.document_date_bs,
            tax_rate: self.tax_rate.as_decimal(),
            status: self.status,
        }
    }
}

fn calculation_input(
    principal_amount: Money,
    interest_rate: Percent,
    issue_date: &BsDate,
    final_date: &BsDate,
    tax_rate: TaxRate,
    prepaid_amount: Money,
    claimed_amount: Option<Money>,
) -> CalculationInput {
    CalculationInput {
        principal_amount,
        interest_rate,
        total_days: days_between(issue_date, final_date),
        tax_rate: tax_rate.as_decimal(),
        prepaid_amount,
        claimed_amount,
    }
}

fn validate_identity(input: &CaseInput) -> MuddaResult<()> {
    if input.case_number.trim().is_empty() {
        return Err(MuddaError::MissingIdentifier);
    }
    check_length("case_number", input.case_number.trim(), MAX_CASE_NUMBER_LEN)?;
    check_length("title", &input.title, MAX_TEXT_LEN)?;
    check_length("defendant", &input.defendant, MAX_TEXT_LEN)?;
    Ok(())
}

pub(crate) fn check_length(field: &str, value: &str, max: usize) -> MuddaResult<()> {
    if value.chars().count() > max {
        return Err(MuddaError::InvalidInput {
            field: field.into(),
            reason: format!("At most {max} characters are allowed."),
        });
    }
    Ok(())
}
