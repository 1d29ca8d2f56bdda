//! Boundary messages exchanged with the UI and the conversion host.
//!
//! Every message is a JSON object tagged by `type`, with camelCase fields.

use serde::{Deserialize, Serialize};

use crate::settings::{Settings, SettingsPatch};

/// Request sent by the status UI to the scanning side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlRequest {
    GetStats,
    ToggleExtension { enabled: bool },
    Rescan,
    UpdateSettings { settings: SettingsPatch },
}

/// Response to a [`ControlRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Stats(StatsResponse),
    Ack(AckResponse),
}

impl ControlResponse {
    pub fn ok() -> Self {
        Self::Ack(AckResponse { success: true })
    }
}

/// Answer to `getStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub enabled: bool,
    pub conversions_found: usize,
    pub total_conversions: u64,
    /// Distinct source currencies, in first-seen order.
    pub currencies: Vec<String>,
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

/// Messages handled by (or emitted towards) the conversion host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    ConvertCurrency(ConvertRequest),
    UpdateBadge { count: u64 },
}

/// A single conversion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub amount: f64,
    pub from_currency: String,
    #[serde(default = "default_target")]
    pub target_currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchangerate_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freecurrency_api_key: Option<String>,
}

fn default_target() -> String {
    crate::settings::DEFAULT_TARGET_CURRENCY.to_string()
}

impl ConvertRequest {
    /// Settings view carrying the credentials embedded in the request.
    pub fn settings(&self) -> Settings {
        Settings {
            target_currency: self.target_currency.clone(),
            exchangerate_api_key: self.exchangerate_api_key.clone(),
            freecurrency_api_key: self.freecurrency_api_key.clone(),
        }
    }
}

/// Result of a [`ConvertRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConvertResponse {
    pub fn converted(amount: f64) -> Self {
        Self {
            success: true,
            converted_amount: Some(amount),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            converted_amount: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
