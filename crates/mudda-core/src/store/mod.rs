//! Case records and the bank directory, kept together so petitioner
//! references stay consistent.
//!
//! Every mutation validates and computes first and only then touches the
//! maps, so a rejected save leaves the book exactly as it was.

pub mod file;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::case::{check_length, Bank, BankId, CaseInput, CaseRecord, MAX_BANK_NAME_LEN};
use crate::{MuddaError, MuddaResult};

pub use file::JsonFileStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseBook {
    #[serde(default)]
    banks: BTreeMap<BankId, Bank>,
    #[serde(default)]
    cases: BTreeMap<String, CaseRecord>,
    #[serde(default)]
    next_bank_id: BankId,
}

impl CaseBook {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Banks ----------------------------------------------------------------

    pub fn register_bank(&mut self, name: &str) -> MuddaResult<&Bank> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MuddaError::InvalidInput {
                field: "name".into(),
                reason: "Bank name cannot be empty.".into(),
            });
        }
        check_length("name", name, MAX_BANK_NAME_LEN)?;
        if self.bank_by_name(name).is_some() {
            return Err(MuddaError::DuplicateBank(name.to_string()));
        }

        self.next_bank_id += 1;
        let id = self.next_bank_id;
        info!(bank_id = id, name, "registered bank");
        Ok(self.banks.entry(id).or_insert(Bank {
            id,
            name: name.to_string(),
        }))
    }

    pub fn bank(&self, id: BankId) -> Option<&Bank> {
        self.banks.get(&id)
    }

    /// Exact name lookup, ignoring case.
    pub fn bank_by_name(&self, name: &str) -> Option<&Bank> {
        let wanted = name.trim().to_lowercase();
        self.banks.values().find(|b| b.name.to_lowercase() == wanted)
    }

    /// Banks whose name contains `query`, ignoring case, sorted by name.
    pub fn search_banks(&self, query: &str) -> Vec<&Bank> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<&Bank> = self
            .banks
            .values()
            .filter(|b| b.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    pub fn banks(&self) -> impl Iterator<Item = &Bank> {
        self.banks.values()
    }

    /// Remove a bank; cases that named it as petitioner keep their data
    /// with the reference cleared. Returns how many cases were touched.
    pub fn delete_bank(&mut self, name: &str) -> MuddaResult<usize> {
        let id = self
            .bank_by_name(name)
            .map(|b| b.id)
            .ok_or_else(|| MuddaError::BankNotFound(name.to_string()))?;

        self.banks.remove(&id);
        let mut cleared = 0;
        for record in self.cases.values_mut() {
            if record.petitioner == Some(id) {
                record.petitioner = None;
                cleared += 1;
            }
        }
        info!(bank_id = id, cleared, "deleted bank");
        Ok(cleared)
    }

    fn resolve_petitioner(&self, input: &CaseInput) -> MuddaResult<Option<BankId>> {
        match input.petitioner.as_deref() {
            None => Ok(None),
            Some(name) => self
                .bank_by_name(name)
                .map(|b| Some(b.id))
                .ok_or_else(|| MuddaError::BankNotFound(name.to_string())),
        }
    }

    // -- Cases ----------------------------------------------------------------

    pub fn create_case(&mut self, input: &CaseInput) -> MuddaResult<&CaseRecord> {
        let case_number = input.case_number.trim();
        if case_number.is_empty() {
            return Err(MuddaError::MissingIdentifier);
        }
        if self.cases.contains_key(case_number) {
            return Err(MuddaError::DuplicateCase(case_number.to_string()));
        }

        let mut input = input.clone();
        input.case_number = case_number.to_string();
        let petitioner = self.resolve_petitioner(&input)?;
        let now = Utc::now();
        let record = CaseRecord::compute(&input, petitioner, now, now)?;
        debug!(
            case_number,
            total_days = record.amounts.total_days,
            payable = %record.amounts.payable_amount,
            "computed case"
        );

        info!(case_number = %input.case_number, "created case");
        Ok(self.cases.entry(input.case_number).or_insert(record))
    }

    /// Replace the inputs of an existing case and recompute it. The case
    /// number in `input` must be empty or equal to `case_number`.
    pub fn update_case(&mut self, case_number: &str, input: &CaseInput) -> MuddaResult<&CaseRecord> {
        let existing = self
            .cases
            .get(case_number)
            .ok_or_else(|| MuddaError::CaseNotFound(case_number.to_string()))?;

        let requested = input.case_number.trim();
        if !requested.is_empty() && requested != case_number {
            return Err(MuddaError::IdentifierImmutable {
                existing: case_number.to_string(),
                requested: requested.to_string(),
            });
        }

        let mut input = input.clone();
        input.case_number = case_number.to_string();
        let petitioner = self.resolve_petitioner(&input)?;
        let record = CaseRecord::compute(&input, petitioner, existing.created_at, Utc::now())?;

        info!(case_number, payable = %record.amounts.payable_amount, "updated case");
        let slot = self
            .cases
            .get_mut(case_number)
            .ok_or_else(|| MuddaError::CaseNotFound(case_number.to_string()))?;
        *slot = record;
        Ok(slot)
    }

    pub fn case(&self, case_number: &str) -> MuddaResult<&CaseRecord> {
        self.cases
            .get(case_number)
            .ok_or_else(|| MuddaError::CaseNotFound(case_number.to_string()))
    }

    /// All cases, newest first.
    pub fn cases(&self) -> Vec<&CaseRecord> {
        let mut all: Vec<&CaseRecord> = self.cases.values().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.case_number.cmp(&b.case_number))
        });
        all
    }

    pub fn delete_case(&mut self, case_number: &str) -> MuddaResult<CaseRecord> {
        let removed = self
            .cases
            .remove(case_number)
            .ok_or_else(|| MuddaError::CaseNotFound(case_number.to_string()))?;
        info!(case_number, "deleted case");
        Ok(removed)
    }

    /// Petitioner bank of a record, if it still exists.
    pub fn petitioner_of(&self, record: &CaseRecord) -> Option<&Bank> {
        record.petitioner.and_then(|id| self.bank(id))
    }
}
