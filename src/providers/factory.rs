use super::compatible::OpenAiCompatibleProvider;
use super::traits::Provider;
use crate::config::Config;
use std::time::Duration;

/// Resolve an API key: explicit value first, then provider-specific
/// environment variables, then the generic fallbacks.
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env_candidates: &[&str] = match name {
        "groq" => &["GROQ_API_KEY"],
        "openai" => &["OPENAI_API_KEY"],
        "openrouter" => &["OPENROUTER_API_KEY"],
        _ => &[],
    };

    provider_env_candidates
        .iter()
        .chain(["MAILTONE_API_KEY", "API_KEY"].iter())
        .find_map(|env_var| {
            std::env::var(env_var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}

fn default_base_url(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "groq" => Some(("Groq", "https://api.groq.com/openai/v1")),
        "openai" => Some(("OpenAI", "https://api.openai.com/v1")),
        "openrouter" => Some(("OpenRouter", "https://openrouter.ai/api/v1")),
        _ => None,
    }
}

/// Build the chat-completion provider described by `config`.
///
/// A configured `base_url` takes precedence over the provider's built-in
/// endpoint, which also lets any other OpenAI-compatible server be used by name.
pub fn create_provider(config: &Config) -> anyhow::Result<Box<dyn Provider>> {
    let name = config.default_provider.as_str();
    let api_key = resolve_api_key(name, config.api_key.as_deref());

    let (label, base_url) = match (config.base_url.as_deref(), default_base_url(name)) {
        (Some(url), Some((label, _))) => (label, url),
        (Some(url), None) => (name, url),
        (None, Some((label, url))) => (label, url),
        (None, None) => anyhow::bail!(
            "Unknown provider: {name}. Use groq, openai, openrouter, or set base_url in config.toml."
        ),
    };

    tracing::debug!(provider = label, base_url, "creating chat-completion provider");
    Ok(Box::new(
        OpenAiCompatibleProvider::new(label, base_url, api_key.as_deref())
            .with_request_timeout(Duration::from_secs(config.provider_timeout_secs)),
    ))
}
