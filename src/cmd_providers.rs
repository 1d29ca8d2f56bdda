//! Provider listing.

use fxlens_config::{Config, PROVIDER_NAMES};
use fxlens_rates::ProviderRegistry;
use serde_json::json;

pub(crate) fn run_providers(config: &Config, format: &str) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_config(config);

    match format {
        "json" => {
            let providers: Vec<_> = registry
                .providers()
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    json!({
                        "priority": i + 1,
                        "name": p.name(),
                        "requiresCredential": p.requires_credential(),
                        "available": p.is_available(&config.settings),
                    })
                })
                .collect();
            let disabled: Vec<_> = PROVIDER_NAMES
                .iter()
                .filter(|name| config.rates.is_disabled(name))
                .collect();
            let out = json!({ "providers": providers, "disabled": disabled });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "table" => {
            println!("{:<4} {:<28} {:<10} {:<10}", "#", "NAME", "KEY", "STATUS");
            println!("{}", "-".repeat(56));
            for (i, provider) in registry.providers().iter().enumerate() {
                let status = if provider.is_available(&config.settings) {
                    "ready"
                } else {
                    "no key"
                };
                let key = if provider.requires_credential() {
                    "required"
                } else {
                    "-"
                };
                println!("{:<4} {:<28} {:<10} {:<10}", i + 1, provider.name(), key, status);
            }
            for name in PROVIDER_NAMES.iter().filter(|n| config.rates.is_disabled(n)) {
                println!("{:<4} {:<28} {:<10} {:<10}", "-", name, "-", "disabled");
            }
        }
        other => anyhow::bail!("Unknown format '{}', expected table or json", other),
    }
    Ok(())
}
