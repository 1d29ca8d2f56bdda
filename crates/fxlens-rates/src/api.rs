//! Response bodies of the rate APIs.
//! Only the fields the extractors read are declared.

use std::collections::HashMap;

use serde::Deserialize;

/// `GET /v6/{key}/pair/{from}/{to}/{amount}` on ExchangeRate-API.
#[derive(Debug, Deserialize)]
pub struct PairConversionResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub conversion_result: Option<f64>,
}

/// `GET /v1/latest` on FreeCurrencyAPI.
#[derive(Debug, Deserialize)]
pub struct LatestRatesResponse {
    #[serde(default)]
    pub data: HashMap<String, f64>,
}

/// `GET /v6/latest/{from}` on open.er-api.com.
#[derive(Debug, Deserialize)]
pub struct OpenRatesResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

/// Decode `body` as `T`, or `None` when the shape does not match.
pub fn decode<T: serde::de::DeserializeOwned>(body: &serde_json::Value) -> Option<T> {
    T::deserialize(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_pair_response() {
        let body = json!({"result": "success", "conversion_result": 18.4});
        let parsed: PairConversionResponse = decode(&body).unwrap();
        assert_eq!(parsed.conversion_result, Some(18.4));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let parsed: OpenRatesResponse = decode(&json!({"result": "error"})).unwrap();
        assert!(parsed.rates.is_empty());
    }

    #[test]
    fn test_decode_wrong_shape() {
        assert!(decode::<LatestRatesResponse>(&json!({"data": "nope"})).is_none());
        assert!(decode::<LatestRatesResponse>(&json!([1, 2])).is_none());
    }
}
