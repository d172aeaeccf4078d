use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Data class labels that carry a severity weight. The vocabulary is open, other labels are kept as is.
pub const DATA_CLASS_PASSWORDS: &str = "Passwords";
pub const DATA_CLASS_NATIONAL_IDS: &str = "National ID numbers";
pub const DATA_CLASS_FINANCIAL: &str = "Financial information";
pub const DATA_CLASS_PHONE_NUMBERS: &str = "Phone numbers";
pub const DATA_CLASS_PHYSICAL_ADDRESSES: &str = "Physical addresses";

/// A public breach record mentioning the queried identity.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct BreachRecord {
    pub name: String,
    pub domain: String,
    pub breach_date: NaiveDate,
    // Date the breach was disclosed / added to the corpus
    pub added_date: NaiveDate,
    pub pwn_count: u64,
    pub data_classes: Vec<String>,
    pub description: String,
}

impl BreachRecord {
    pub fn has_data_class(&self, data_class: &str) -> bool {
        self.data_classes.iter().any(|c| c == data_class)
    }

    pub fn exposes_passwords(&self) -> bool {
        self.has_data_class(DATA_CLASS_PASSWORDS)
    }

    pub fn exposes_financial_information(&self) -> bool {
        self.has_data_class(DATA_CLASS_FINANCIAL)
    }
}

// Parse a JSON array of breach records, used for built-in catalogs and by callers that fetch records themselves
pub fn breaches_from_json(json: &str) -> serde_json::Result<Vec<BreachRecord>> {
    serde_json::from_str(json)
}
