use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("MAILTONE_API_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .or_else(|_| std::env::var("API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("MAILTONE_PROVIDER")
            && !provider.is_empty()
        {
            self.default_provider = provider;
        }

        if let Ok(base_url) = std::env::var("MAILTONE_BASE_URL")
            && !base_url.is_empty()
        {
            self.base_url = Some(base_url);
        }

        if let Ok(model) = std::env::var("MAILTONE_MODEL")
            && !model.is_empty()
        {
            self.default_model = model;
        }

        if let Ok(port_str) =
            std::env::var("MAILTONE_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("MAILTONE_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(temp_str) = std::env::var("MAILTONE_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.default_temperature = temp;
        }

        if let Ok(db) = std::env::var("MAILTONE_HISTORY_DB")
            && !db.is_empty()
        {
            self.history.path = Some(PathBuf::from(db));
        }
    }
}
