use clap::Subcommand;
use serde_json::{json, Value};

use crate::settings::AppConfig;

#[derive(Subcommand)]
pub enum BankCommand {
    /// Register a petitioner bank
    Add { name: String },
    /// List every registered bank
    List,
    /// Banks whose name contains the query (case-insensitive)
    Search { query: String },
    /// Remove a bank; its cases keep their data without a petitioner
    Delete { name: String },
}

pub fn run_bank(command: BankCommand, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let store = super::open_store(config);
    let mut book = store.load()?;

    match command {
        BankCommand::Add { name } => {
            let bank = serde_json::to_value(book.register_bank(&name)?)?;
            store.save(&book)?;
            Ok(json!({ "result": bank }))
        }
        BankCommand::List => Ok(serde_json::to_value(book.banks().collect::<Vec<_>>())?),
        BankCommand::Search { query } => Ok(serde_json::to_value(book.search_banks(&query))?),
        BankCommand::Delete { name } => {
            let cleared = book.delete_bank(&name)?;
            store.save(&book)?;
            Ok(json!({ "result": { "deleted": name, "cases_unlinked": cleared } }))
        }
    }
}
