pub mod basic;
pub mod calendar;
pub mod chat;
pub mod clients;
pub mod summary;

use async_trait::async_trait;

use crate::core::{
    AnalysisPayload, ClientAnalysis, ClientRanking, ClientRecord, MonthlySummaryRow,
    ReportConfig, ReportResult,
};

pub use basic::{fallback_analysis, BasicInsightProvider};
pub use calendar::{tax_calendar, COMPLIANCE_TIPS};
pub use chat::{parse_model_response, ChatInsightProvider, ModelAnalysis};
pub use clients::{fallback_client_analysis, parse_client_response, ModelClientAnalysis};
pub use summary::{format_soles, trend_label};

/// Fuente del análisis que acompaña al reporte de ventas.
/// Nunca falla: ante errores del backend devuelve un payload de respaldo.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn analyze(&self, business_name: &str, monthly: &[MonthlySummaryRow]) -> AnalysisPayload;

    /// Conteo RUC/DNI de la cartera y, si hay ranking de compras, lectura del modelo
    async fn analyze_clients(
        &self,
        clients: &[ClientRecord],
        top_clients: &[ClientRanking],
    ) -> ClientAnalysis;

    fn name(&self) -> &str;
}

/// DigitalOcean GenAI si hay clave, luego OpenAI, y si no el análisis básico
pub fn provider_from_config(config: &ReportConfig) -> ReportResult<Box<dyn InsightProvider>> {
    if let Some(key) = &config.digitalocean_api_key {
        tracing::info!(model = %config.digitalocean_model, "usando DigitalOcean GenAI");
        let provider = ChatInsightProvider::new(
            "digitalocean",
            &config.digitalocean_endpoint,
            key,
            &config.digitalocean_model,
            config.llm_timeout,
        )?;
        return Ok(Box::new(provider));
    }

    if let Some(key) = &config.openai_api_key {
        tracing::info!("usando OpenAI");
        let provider = ChatInsightProvider::new(
            "openai",
            crate::core::config::OPENAI_ENDPOINT,
            key,
            crate::core::config::OPENAI_MODEL,
            config.llm_timeout,
        )?;
        return Ok(Box::new(provider));
    }

    tracing::warn!("sin API key de IA configurada, se usará el análisis básico");
    Ok(Box::new(BasicInsightProvider::new()))
}
