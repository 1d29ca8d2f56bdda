use super::*;
use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::providers::{FawazahmedProvider, OpenErApiProvider};

/// Transport answering from a fixed table, recording every URL it is asked for.
#[derive(Default)]
struct ScriptedTransport {
    responses: HashMap<String, Result<Value, u16>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn respond(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), Ok(body));
        self
    }

    fn fail(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RateTransport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        self.calls.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ProviderError::ApiError {
                status: *status,
                message: String::new(),
            }),
            None => Err(ProviderError::Network("connection refused".to_string())),
        }
    }
}

const CDN_EUR: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/eur.json";
const MIRROR_EUR: &str = "https://latest.currency-api.pages.dev/v1/currencies/eur.json";
const OPEN_EUR: &str = "https://open.er-api.com/v6/latest/EUR";

fn orchestrator(transport: Arc<ScriptedTransport>) -> RateOrchestrator {
    RateOrchestrator::new(ProviderRegistry::builtin(), transport)
}

#[tokio::test]
async fn test_first_keyless_provider_wins() {
    let transport = Arc::new(
        ScriptedTransport::default().respond(CDN_EUR, json!({"eur": {"usd": 1.5}})),
    );
    let result = orchestrator(transport.clone())
        .convert(10.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap();

    assert_eq!(result, 15.0);
    // keyed providers are skipped without a request
    assert_eq!(transport.calls(), vec![CDN_EUR.to_string()]);
}

#[tokio::test]
async fn test_failover_to_next_provider() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .fail(CDN_EUR, 503)
            .respond(MIRROR_EUR, json!({"eur": {"jpy": 160.0}}))
            .respond(OPEN_EUR, json!({"rates": {"JPY": 999.0}})),
    );
    let result = orchestrator(transport.clone())
        .convert(2.0, "eur", "jpy", &Settings::default())
        .await
        .unwrap();

    assert_eq!(result, 320.0);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_missing_pair_fails_over() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond(CDN_EUR, json!({"eur": {"gbp": 0.8}}))
            .respond(MIRROR_EUR, json!({"eur": {"gbp": 0.8}}))
            .respond(OPEN_EUR, json!({"rates": {"USD": 1.1}})),
    );
    let result = orchestrator(transport)
        .convert(10.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap();
    assert!((result - 11.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_zero_rate_is_not_accepted() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond(CDN_EUR, json!({"eur": {"usd": 0.0}}))
            .respond(MIRROR_EUR, json!({"eur": {"usd": 1.2}})),
    );
    let result = orchestrator(transport)
        .convert(5.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap();
    assert!((result - 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_keyed_provider_used_first() {
    let settings = Settings {
        exchangerate_api_key: Some("secret".to_string()),
        ..Settings::default()
    };
    let keyed = "https://v6.exchangerate-api.com/v6/secret/pair/EUR/USD/10";
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond(keyed, json!({"result": "success", "conversion_result": 10.85}))
            .respond(CDN_EUR, json!({"eur": {"usd": 1.5}})),
    );
    let result = orchestrator(transport.clone())
        .convert(10.0, "EUR", "USD", &settings)
        .await
        .unwrap();

    assert_eq!(result, 10.85);
    assert_eq!(transport.calls(), vec![keyed.to_string()]);
}

#[tokio::test]
async fn test_all_providers_failed() {
    let transport = Arc::new(ScriptedTransport::default());
    let err = orchestrator(transport.clone())
        .convert(10.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap_err();

    match err {
        ConversionError::AllProvidersFailed { attempted } => assert_eq!(attempted, 3),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.calls().len(), 3);
}

#[tokio::test]
async fn test_invalid_amount_makes_no_request() {
    let transport = Arc::new(ScriptedTransport::default());
    let orchestrator = orchestrator(transport.clone());

    for amount in [0.0, -4.0, f64::NAN] {
        let err = orchestrator
            .convert(amount, "EUR", "USD", &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_empty_registry_fails_with_zero_attempts() {
    let orchestrator =
        RateOrchestrator::new(ProviderRegistry::new(), Arc::new(ScriptedTransport::default()));
    let err = orchestrator
        .convert(1.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConversionError::AllProvidersFailed { attempted: 0 }));
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(OpenErApiProvider::new()));
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond(OPEN_EUR, json!({"rates": {"USD": 1.1}}))
            .with_delay(Duration::from_secs(30)),
    );
    let orchestrator =
        RateOrchestrator::new(registry, transport.clone()).with_timeout(Duration::from_secs(2));

    let err = orchestrator
        .convert(1.0, "EUR", "USD", &Settings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConversionError::AllProvidersFailed { attempted: 1 }));
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_from_config_applies_timeout() {
    let mut config = Config::default();
    config.rates.timeout_secs = 3;
    let orchestrator = RateOrchestrator::from_config(&config);
    assert_eq!(orchestrator.timeout(), Duration::from_secs(3));
    assert_eq!(orchestrator.registry().len(), 5);
}

#[test]
fn test_default_timeout() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FawazahmedProvider::cdn()));
    let orchestrator = RateOrchestrator::new(registry, Arc::new(ScriptedTransport::default()));
    assert_eq!(orchestrator.timeout(), Duration::from_secs(10));
}

mod http_tests {
    use super::*;
    use fxlens_config::ProviderConfig;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        for name in fxlens_config::PROVIDER_NAMES {
            config.providers.insert(
                name.to_string(),
                ProviderConfig {
                    base_url: Some(server.uri()),
                },
            );
        }
        config
    }

    #[tokio::test]
    async fn test_failover_over_http() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v6/k1/pair/EUR/USD/20"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1/latest"))
            .and(matchers::query_param("apikey", "k2"))
            .and(matchers::query_param("base_currency", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(
                "/npm/@fawazahmed0/currency-api@latest/v1/currencies/eur.json",
            ))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1/currencies/eur.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"eur": {"usd": 1.25}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v6/latest/EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rates": {"USD": 9.0}})))
            .expect(0)
            .mount(&server)
            .await;

        let settings = Settings {
            target_currency: "USD".to_string(),
            exchangerate_api_key: Some("k1".to_string()),
            freecurrency_api_key: Some("k2".to_string()),
        };
        let orchestrator = RateOrchestrator::from_config(&config_for(&server));
        let result = orchestrator
            .convert(20.0, "EUR", "USD", &settings)
            .await
            .unwrap();
        assert_eq!(result, 25.0);
    }

    #[tokio::test]
    async fn test_disabled_provider_not_contacted() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(
                "/npm/@fawazahmed0/currency-api@latest/v1/currencies/gbp.json",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"gbp": {"usd": 1.3}})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/v1/currencies/gbp.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"gbp": {"usd": 1.5}})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.rates.disabled = vec!["fawazahmed0-api".to_string()];
        let result = RateOrchestrator::from_config(&config)
            .convert(2.0, "GBP", "USD", &Settings::default())
            .await
            .unwrap();
        assert_eq!(result, 3.0);
    }

    #[tokio::test]
    async fn test_every_provider_errors() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let err = RateOrchestrator::from_config(&config_for(&server))
            .convert(1.0, "CHF", "USD", &Settings::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("All currency conversion providers failed"));
    }
}
