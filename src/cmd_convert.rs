//! One-shot conversion command.

use anyhow::Context;
use fxlens_config::Config;
use fxlens_core::currency;
use fxlens_protocols::CurrencyConverter;
use fxlens_rates::RateOrchestrator;
use tracing::{debug, warn};

/// Accept either a code (`eur`) or a table symbol (`€`).
pub(crate) fn normalize_currency(input: &str) -> String {
    let trimmed = input.trim();
    match currency::resolve(trimmed) {
        Some(code) => code.to_string(),
        None => trimmed.to_ascii_uppercase(),
    }
}

pub(crate) async fn run_convert(
    config: &Config,
    amount: f64,
    from: &str,
    to: Option<&str>,
) -> anyhow::Result<()> {
    let from = normalize_currency(from);
    let target = to
        .map(normalize_currency)
        .unwrap_or_else(|| config.settings.target_currency.clone());
    if !currency::is_supported(&from) {
        warn!("{} is not a recognised currency, trying anyway", from);
    }

    let orchestrator = RateOrchestrator::from_config(config);
    debug!(
        "Converting with {} providers, {}s timeout each",
        orchestrator.registry().len(),
        orchestrator.timeout().as_secs()
    );

    let converted = orchestrator
        .convert(amount, &from, &target, &config.settings)
        .await
        .with_context(|| format!("failed to convert {} {} to {}", amount, from, target))?;

    println!("{:.2} {} = {:.2} {}", amount, from, converted, target);
    Ok(())
}
