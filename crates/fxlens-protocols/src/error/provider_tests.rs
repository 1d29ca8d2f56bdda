use super::*;

#[test]
fn test_provider_error_missing_credential() {
    let err = ProviderError::MissingCredential("exchangerate-api".to_string());
    assert!(err.to_string().contains("Missing credential"));
    assert!(err.to_string().contains("exchangerate-api"));
}

#[test]
fn test_provider_error_api_error() {
    let err = ProviderError::ApiError {
        status: 503,
        message: "Service Unavailable".to_string(),
    };
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("Service Unavailable"));
}

#[test]
fn test_provider_error_network() {
    let err = ProviderError::Network("Connection refused".to_string());
    assert!(err.to_string().contains("Network error"));
}

#[test]
fn test_provider_error_timeout() {
    let err = ProviderError::Timeout(10);
    assert!(err.to_string().contains("Timeout"));
    assert!(err.to_string().contains("10"));
}

#[test]
fn test_declined_is_declined() {
    assert!(ProviderError::Declined("no rate for XYZ".to_string()).is_declined());
    assert!(!ProviderError::Timeout(1).is_declined());
    assert!(!ProviderError::InvalidResponse("not json".to_string()).is_declined());
}
