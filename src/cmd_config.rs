//! Configuration commands.

use std::path::Path;

use fxlens_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::ConfigAction;

pub(crate) fn handle_config_command(
    action: ConfigAction,
    config: &Config,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Check => check(config, path),
        ConfigAction::Show => show(config),
    }
}

fn check(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let source = match path {
        Some(path) => path.display().to_string(),
        None => {
            let default = ConfigLoader::default_path();
            if default.exists() {
                default.display().to_string()
            } else {
                "built-in defaults".to_string()
            }
        }
    };
    println!("Config: {}", source);

    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        println!("  warning  {:<32} {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("  error    {:<32} {}", error.path, error.message);
    }

    if !result.is_valid() {
        anyhow::bail!("{} configuration error(s)", result.errors.len());
    }
    println!("OK ({} warning(s))", result.warnings.len());
    Ok(())
}

fn show(config: &Config) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(&masked(config))?);
    Ok(())
}

fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    for key in [
        &mut config.settings.exchangerate_api_key,
        &mut config.settings.freecurrency_api_key,
    ] {
        if key.is_some() {
            *key = Some("****".to_string());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_keys() {
        let mut config = Config::default();
        config.settings.exchangerate_api_key = Some("secret".to_string());
        let masked = masked(&config);
        assert_eq!(masked.settings.exchangerate_api_key.as_deref(), Some("****"));
        assert_eq!(masked.settings.freecurrency_api_key, None);
        assert!(!toml::to_string_pretty(&masked).unwrap().contains("secret"));
    }
}
