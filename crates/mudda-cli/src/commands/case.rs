use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tracing::debug;

use mudda_core::case::{CaseForm, CaseRecord};
use mudda_core::numerals::{localize_case_number, to_ascii_digits};
use mudda_core::store::CaseBook;
use mudda_core::{MuddaError, MuddaResult};

use crate::input;
use crate::settings::AppConfig;

#[derive(Subcommand)]
pub enum CaseCommand {
    /// Save a new case
    Add(CaseFormArgs),
    /// Show one case with every derived amount
    Show {
        case_number: String,
        /// Print amounts and dates with Devanagari digits
        #[arg(long)]
        local: bool,
    },
    /// Edit a case; omitted fields keep their stored values
    Update {
        #[arg(value_name = "CASE_NUMBER")]
        target: String,
        #[command(flatten)]
        form: CaseFormArgs,
    },
    /// Remove a case
    Delete { case_number: String },
    /// List cases, newest first
    List {
        /// Print numbers with Devanagari digits
        #[arg(long)]
        local: bool,
    },
}

/// Case fields as typed; Devanagari or ASCII digits
#[derive(Args, Default)]
#[command(allow_hyphen_values = true)]
pub struct CaseFormArgs {
    /// JSON or YAML case form, `-` for stdin. Flags override it; on update
    /// only the fields it names change
    #[arg(long)]
    pub input: Option<String>,
    #[arg(long)]
    pub case_number: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Petitioner bank, by registered name
    #[arg(long)]
    pub petitioner: Option<String>,
    #[arg(long)]
    pub defendant: Option<String>,
    #[arg(long)]
    pub principal: Option<String>,
    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,
    #[arg(long)]
    pub prepaid: Option<String>,
    /// Claimed amount; pass an empty string to derive it again
    #[arg(long)]
    pub claimed: Option<String>,
    /// Issue date (BS, YYYY-MM-DD)
    #[arg(long)]
    pub issue_date: Option<String>,
    /// Final date (BS, YYYY-MM-DD)
    #[arg(long)]
    pub final_date: Option<String>,
    /// Document date (BS, YYYY-MM-DD)
    #[arg(long)]
    pub document_date: Option<String>,
    /// 0.01 / 1% or 0.005 / 0.5%
    #[arg(long)]
    pub tax_rate: Option<String>,
    /// open, closed or pending
    #[arg(long)]
    pub status: Option<String>,
}

impl CaseFormArgs {
    /// Lay the given flags over `form`.
    fn apply(self, mut form: CaseForm) -> CaseForm {
        let fields = [
            (self.case_number, &mut form.case_number),
            (self.title, &mut form.title),
            (self.defendant, &mut form.defendant),
            (self.principal, &mut form.principal_amount),
            (self.rate, &mut form.interest_rate),
            (self.prepaid, &mut form.prepaid_amount),
            (self.claimed, &mut form.claimed_amount),
            (self.issue_date, &mut form.issue_date),
            (self.final_date, &mut form.final_date),
            (self.document_date, &mut form.document_date),
            (self.tax_rate, &mut form.tax_rate),
            (self.status, &mut form.status),
        ];
        for (flag, slot) in fields {
            if let Some(value) = flag {
                *slot = value;
            }
        }
        if let Some(petitioner) = self.petitioner {
            form.petitioner = Some(petitioner);
        }
        form
    }
}

pub fn run_case(command: CaseCommand, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let store = super::open_store(config);
    let mut book = store.load()?;

    let value = match command {
        CaseCommand::Add(args) => {
            let mut base = read_form(args.input.as_deref())?.unwrap_or_default();
            if base.tax_rate.trim().is_empty() {
                base.tax_rate = config.calculator.default_tax_rate.as_decimal().to_string();
            }
            let input = args.apply(base).clean()?;
            let key = book.create_case(&input)?.case_number.clone();
            let value = record_value(&book, book.case(&key)?)?;
            store.save(&book)?;
            value
        }
        CaseCommand::Update { target, form } => {
            let key = resolve_key(&book, &target)?;
            let existing = book.case(&key)?;
            let mut base = CaseForm::from_record(existing, book.petitioner_of(existing));
            if let Some(overrides) = read_document(form.input.as_deref())? {
                base = layer_form(base, overrides)?;
            }
            let input = form.apply(base).clean()?;
            book.update_case(&key, &input)?;
            let value = record_value(&book, book.case(&key)?)?;
            store.save(&book)?;
            value
        }
        CaseCommand::Show { case_number, local } => {
            let key = resolve_key(&book, &case_number)?;
            let mut value = record_value(&book, book.case(&key)?)?;
            if local {
                super::localize(&mut value);
            }
            value
        }
        CaseCommand::Delete { case_number } => {
            let key = resolve_key(&book, &case_number)?;
            let removed = book.delete_case(&key)?;
            store.save(&book)?;
            json!({ "result": { "deleted": removed.case_number } })
        }
        CaseCommand::List { local } => {
            let rows: Vec<Value> = book
                .cases()
                .into_iter()
                .map(|record| list_row(&book, record, local))
                .collect();
            Value::Array(rows)
        }
    };
    Ok(value)
}

fn read_form(path: Option<&str>) -> Result<Option<CaseForm>, Box<dyn std::error::Error>> {
    match read_document(path)? {
        Some(document) => Ok(Some(serde_json::from_value(stringify_numbers(document))?)),
        None => Ok(None),
    }
}

fn read_document(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        None => Ok(None),
        Some("-") => match input::stdin::read_stdin()? {
            Some(data) => Ok(Some(data)),
            None => Err("--input - given but nothing was piped to stdin".into()),
        },
        Some(path) => Ok(Some(input::file::read_input(path)?)),
    }
}

/// Replace the fields of `base` named in `overrides`; the rest keep their values.
fn layer_form(base: CaseForm, overrides: Value) -> Result<CaseForm, Box<dyn std::error::Error>> {
    let Value::Object(overrides) = stringify_numbers(overrides) else {
        return Err("case form must be a mapping of field names to values".into());
    };
    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(ref mut fields) = merged {
        fields.extend(overrides);
    }
    Ok(serde_json::from_value(merged)?)
}

/// Form fields are text; `principal_amount: 50000` in YAML arrives as a number.
fn stringify_numbers(document: Value) -> Value {
    match document {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| match value {
                    Value::Number(n) => (key, Value::String(n.to_string())),
                    other => (key, other),
                })
                .collect(),
        ),
        other => other,
    }
}

/// Stored key for a case number typed in either numeral system.
pub(crate) fn resolve_key(book: &CaseBook, typed: &str) -> MuddaResult<String> {
    let typed = typed.trim();
    [
        typed.to_string(),
        localize_case_number(typed),
        to_ascii_digits(typed),
    ]
    .into_iter()
    .find(|candidate| book.case(candidate).is_ok())
    .ok_or_else(|| MuddaError::CaseNotFound(typed.to_string()))
}

fn record_value(book: &CaseBook, record: &CaseRecord) -> Result<Value, Box<dyn std::error::Error>> {
    let mut result = serde_json::to_value(record)?;
    if let Value::Object(ref mut map) = result {
        let name = book.petitioner_of(record).map(|b| b.name.clone());
        map.insert("petitioner_name".into(), json!(name));
    }
    debug!(case_number = %record.case_number, "rendered case");
    Ok(json!({ "result": result }))
}

fn list_row(book: &CaseBook, record: &CaseRecord, local: bool) -> Value {
    let case_number = if local {
        localize_case_number(&record.case_number)
    } else {
        record.case_number.clone()
    };
    let status = if local {
        record.status.local_label()
    } else {
        record.status.label()
    };
    let mut row = json!({
        "case_number": case_number,
        "title": record.title,
        "petitioner": book.petitioner_of(record).map(|b| b.name.as_str()).unwrap_or(""),
        "defendant": record.defendant,
        "total_days": record.amounts.total_days,
        "interest_amount": record.amounts.interest_amount,
        "payable_amount": record.amounts.payable_amount,
        "status": status,
    });
    if local {
        for key in ["total_days", "interest_amount", "payable_amount"] {
            if let Some(field) = row.get_mut(key) {
                super::localize(field);
            }
        }
    }
    row
}
