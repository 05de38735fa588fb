use serde::{Deserialize, Serialize};

use crate::logic::claim::ClaimRecord;

/// One training row: a claim and its fraud label (0 or 1)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LabeledClaim {
    pub claim: ClaimRecord,
    pub label: u8,
}

impl LabeledClaim {
    pub fn new(claim: ClaimRecord, fraud: bool) -> Self {
        Self { claim, label: u8::from(fraud) }
    }

    pub fn is_fraud(&self) -> bool {
        self.label == 1
    }
}

/// Parse a fraud label cell: 0/1, 0.0/1.0, true/false, yes/no
pub fn parse_label(value: &str) -> Option<u8> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(1),
        "0" | "0.0" | "false" | "no" => Some(0),
        _ => None,
    }
}
