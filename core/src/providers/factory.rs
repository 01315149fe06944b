use crate::config::Config;
use crate::providers::{GROQ_BASE_URL, OPENAI_BASE_URL, OpenAIProvider};
use crate::traits::Provider;
use anyhow::{Result, anyhow};

const GROQ_KEY_VARS: &[&str] = &["GROQ_API_KEY", "VASU_GROQ_API_KEY"];
const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "VASU_OPENAI_API_KEY"];

pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let provider_name = config.provider.as_deref().unwrap_or("groq");

    let (env_vars, default_base_url) = match provider_name.to_lowercase().as_str() {
        "groq" => (GROQ_KEY_VARS, GROQ_BASE_URL),
        "openai" => (OPENAI_KEY_VARS, OPENAI_BASE_URL),
        _ => {
            return Err(anyhow!(
                "Unknown provider: {}. Available: groq, openai",
                provider_name
            ));
        }
    };

    let api_key = resolve_api_key_with_fallback(env_vars, &config.api_key)?;
    let base_url = config.base_url.as_deref().unwrap_or(default_base_url);

    tracing::debug!("Using provider {} at {}", provider_name, base_url);
    Ok(Box::new(OpenAIProvider::new(api_key).with_base_url(base_url)))
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = resolve_api_key_from_env(var_name) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or add api_key to the config file.",
            env_vars.join(" / ")
        ))
    }
}

fn resolve_api_key_from_env(var_name: &str) -> Result<String> {
    std::env::var(var_name)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!("Environment variable {} not set", var_name))
}
