//! Successful conversion records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful conversion. Records drive the running total and the
/// "currencies seen" summary; they live until an explicit reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub from_currency: String,
    pub from_amount: f64,
    pub converted_amount: f64,
    pub target_currency: String,
    pub original_text: String,
    pub inserted_at: DateTime<Utc>,
}

impl ConversionRecord {
    pub fn new(
        from_currency: impl Into<String>,
        from_amount: f64,
        converted_amount: f64,
        target_currency: impl Into<String>,
        original_text: impl Into<String>,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            from_amount,
            converted_amount,
            target_currency: target_currency.into(),
            original_text: original_text.into(),
            inserted_at: Utc::now(),
        }
    }
}
