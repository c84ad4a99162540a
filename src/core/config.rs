use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{ReportError, ReportResult};

pub const DEFAULT_DIGITALOCEAN_ENDPOINT: &str = "https://cloud.digitalocean.com/gen-ai";
pub const DEFAULT_DIGITALOCEAN_MODEL: &str = "openai-gpt-oss-120b";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Configuración del servicio de reportes, cargada desde variables de entorno
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub reports_dir: PathBuf,
    pub database_url: String,
    pub digitalocean_api_key: Option<String>,
    pub digitalocean_endpoint: String,
    pub digitalocean_model: String,
    pub openai_api_key: Option<String>,
    pub llm_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            reports_dir: PathBuf::from("./reports"),
            database_url: "sqlite://../server/data/facturafacil.db".to_string(),
            digitalocean_api_key: None,
            digitalocean_endpoint: DEFAULT_DIGITALOCEAN_ENDPOINT.to_string(),
            digitalocean_model: DEFAULT_DIGITALOCEAN_MODEL.to_string(),
            openai_api_key: None,
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl ReportConfig {
    /// Lee la configuración del entorno. Llamar a `dotenv::dotenv()` antes si se usa `.env`.
    pub fn from_env() -> ReportResult<Self> {
        let default = ReportConfig::default();

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| default.llm_timeout.as_secs().to_string())
            .parse::<u64>()
            .map_err(|e| ReportError::Config(format!("LLM_TIMEOUT_SECS: {}", e)))?;

        Ok(ReportConfig {
            reports_dir: env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.reports_dir),
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
            digitalocean_api_key: non_empty_var("DIGITALOCEAN_API_KEY"),
            digitalocean_endpoint: env::var("DIGITALOCEAN_ENDPOINT")
                .unwrap_or(default.digitalocean_endpoint),
            digitalocean_model: non_empty_var("DIGITALOCEAN_MODEL")
                .unwrap_or(default.digitalocean_model),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            llm_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
