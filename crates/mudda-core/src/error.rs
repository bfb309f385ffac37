use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MuddaError {
    #[error("Invalid BS date in {field} ('{input}'): {reason}")]
    DateFormat {
        field: String,
        input: String,
        reason: String,
    },

    #[error("Final date is {days} day(s) earlier than issue date")]
    NegativeDuration { days: i64 },

    #[error("Tax rate {0} is not permitted (allowed: 0.01, 0.005)")]
    InvalidTaxRate(Decimal),

    #[error("Case number must be supplied before saving")]
    MissingIdentifier,

    #[error("Case number cannot change once saved ({existing} -> {requested})")]
    IdentifierImmutable { existing: String, requested: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Case {0} already exists")]
    DuplicateCase(String),

    #[error("Case {0} not found")]
    CaseNotFound(String),

    #[error("Bank '{0}' not found")]
    BankNotFound(String),

    #[error("Bank '{0}' already exists")]
    DuplicateBank(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Report rendering failed: {0}")]
    Render(String),
}

impl MuddaError {
    /// Name of the input field the failure belongs to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::DateFormat { field, .. } | Self::InvalidInput { field, .. } => Some(field),
            Self::NegativeDuration { .. } => Some("final_date"),
            Self::InvalidTaxRate(_) => Some("tax_rate"),
            Self::MissingIdentifier | Self::IdentifierImmutable { .. } => Some("case_number"),
            Self::DuplicateCase(_) => Some("case_number"),
            Self::BankNotFound(_) | Self::DuplicateBank(_) => Some("petitioner"),
            Self::CaseNotFound(_) | Self::Serialization(_) | Self::Storage(_) | Self::Render(_) => None,
        }
    }

    /// Message shown to tribunal staff, in Nepali.
    pub fn localized(&self) -> String {
        match self {
            Self::DateFormat { input, .. } => {
                format!("मिति '{input}' मान्य वि.सं. ढाँचा (YYYY-MM-DD) मा छैन।")
            }
            Self::NegativeDuration { .. } => {
                "मुद्दा दर्ता मिति अन्तिम मिति भन्दा पछि हुन सक्दैन।".to_string()
            }
            Self::InvalidTaxRate(_) => "कर दर १% वा ०.५% मात्र हुन सक्छ।".to_string(),
            Self::MissingIdentifier => {
                "मुद्दा नम्बर (ID) manually specify गर्नुहोस्।".to_string()
            }
            Self::IdentifierImmutable { .. } => {
                "सुरक्षित गरिसकेको मुद्दा नम्बर परिवर्तन गर्न मिल्दैन।".to_string()
            }
            Self::InvalidInput { field, reason } => format!("{field}: {reason}"),
            Self::DuplicateCase(id) => format!("मुद्दा नम्बर {id} पहिले नै दर्ता छ।"),
            Self::CaseNotFound(id) => format!("मुद्दा नम्बर {id} फेला परेन।"),
            Self::BankNotFound(name) => format!("बैंक '{name}' फेला परेन।"),
            Self::DuplicateBank(name) => format!("बैंक '{name}' पहिले नै दर्ता छ।"),
            Self::Serialization(e) | Self::Storage(e) => e.clone(),
            Self::Render(e) => format!("प्रतिवेदन तयार गर्न सकिएन: {e}"),
        }
    }

    pub(crate) fn date_format(field: &str, input: &str, reason: impl Into<String>) -> Self {
        Self::DateFormat {
            field: field.to_string(),
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MuddaError {
    fn from(e: serde_json::Error) -> Self {
        MuddaError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MuddaError {
    fn from(e: std::io::Error) -> Self {
        MuddaError::Storage(e.to_string())
    }
}
