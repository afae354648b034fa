//! Config command handlers

use anyhow::{bail, Context, Result};

use ebb_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "default_user": config.default_user,
                    "dictionary": {
                        "configured": config.dictionary.is_configured(),
                        "api_key": config.dictionary.api_key.as_deref().map(mask),
                        "endpoint": config.dictionary.endpoint,
                        "timeout_secs": config.dictionary.timeout_secs
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:     {}", config.data_dir.display());
            println!(
                "  default_user: {}",
                config.default_user.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  dict key:     {}",
                config
                    .dictionary
                    .api_key
                    .as_deref()
                    .map(mask)
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!(
                "  dict secret:  {}",
                if config.dictionary.api_secret.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!("  dict endpoint: {}", config.dictionary.endpoint);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    // Keep the displayed value safe to echo back
    let mut shown = value.clone();

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "default_user" => {
            config.default_user = optional(value);
        }
        "dict_api_key" => {
            config.dictionary.api_key = optional(value);
            shown = config
                .dictionary
                .api_key
                .as_deref()
                .map(mask)
                .unwrap_or_else(|| "(not set)".to_string());
        }
        "dict_api_secret" => {
            config.dictionary.api_secret = optional(value);
            shown = "(hidden)".to_string();
        }
        "dict_endpoint" => {
            config.dictionary.endpoint = value.clone();
        }
        "dict_token_endpoint" => {
            config.dictionary.token_endpoint = value.clone();
        }
        "dict_timeout_secs" => {
            config.dictionary.timeout_secs = value
                .parse()
                .context("Invalid value for dict_timeout_secs. Use a number of seconds.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, default_user, dict_api_key, dict_api_secret, \
                 dict_endpoint, dict_token_endpoint, dict_timeout_secs",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

/// Empty string or "none" clears an optional value
fn optional(value: String) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value)
    }
}

/// Show only the first few characters of a credential
fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}...", visible)
}
