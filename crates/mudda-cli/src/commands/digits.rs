use clap::Subcommand;
use serde_json::{json, Value};

use mudda_core::numerals::{to_ascii_digits, to_local_digits};

#[derive(Subcommand)]
pub enum DigitsCommand {
    /// Replace ASCII digits with Devanagari digits
    ToLocal { text: String },
    /// Replace Devanagari digits with ASCII digits
    ToAscii { text: String },
}

pub fn run_digits(command: DigitsCommand) -> Result<Value, Box<dyn std::error::Error>> {
    let (input, converted) = match command {
        DigitsCommand::ToLocal { text } => {
            let converted = to_local_digits(&text);
            (text, converted)
        }
        DigitsCommand::ToAscii { text } => {
            let converted = to_ascii_digits(&text);
            (text, converted)
        }
    };
    Ok(json!({ "input": input, "converted": converted }))
}
