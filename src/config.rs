use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub eta_model_path: String,
    pub price_model_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            eta_model_path: std::env::var("ETA_MODEL_PATH")
                .unwrap_or_else(|_| "models/eta_model.json".to_string()),
            price_model_path: std::env::var("PRICE_MODEL_PATH")
                .unwrap_or_else(|_| "models/price_model.json".to_string()),
        };

        if config.eta_model_path.trim().is_empty() {
            anyhow::bail!("ETA_MODEL_PATH cannot be empty");
        }
        if config.price_model_path.trim().is_empty() {
            anyhow::bail!("PRICE_MODEL_PATH cannot be empty");
        }

        tracing::debug!("ETA model path: {}", config.eta_model_path);
        tracing::debug!("Price model path: {}", config.price_model_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
