use async_trait::async_trait;

use crate::core::{
    AnalysisPayload, ClientAnalysis, ClientRanking, ClientRecord, ClientSummary,
    MonthlySummaryRow, SummaryMetrics,
};
use super::clients::fallback_client_analysis;
use super::summary::format_soles;
use super::InsightProvider;

/// Análisis determinista usado cuando no hay backend de IA configurado
#[derive(Debug, Clone, Default)]
pub struct BasicInsightProvider;

impl BasicInsightProvider {
    pub fn new() -> Self {
        BasicInsightProvider
    }
}

/// Payload de respaldo a partir de las métricas calculadas
pub fn fallback_analysis(summary: SummaryMetrics) -> AnalysisPayload {
    let insights = vec![
        "⚠️ Configura tu API key de DigitalOcean GenAI para obtener análisis avanzados con IA"
            .to_string(),
        format!("📊 Total de ventas: {}", format_soles(summary.total_sales)),
        format!("📈 Promedio mensual: {}", format_soles(summary.average_monthly_sales)),
        format!("📄 Total documentos emitidos: {}", summary.document_count),
    ];

    AnalysisPayload {
        summary,
        insights,
        recommendations: vec![
            "Configura DIGITALOCEAN_API_KEY en el archivo .env para obtener recomendaciones personalizadas"
                .to_string(),
        ],
        tax_alerts: Vec::new(),
        projection: None,
        model_generated: false,
    }
}

#[async_trait]
impl InsightProvider for BasicInsightProvider {
    async fn analyze(&self, _business_name: &str, monthly: &[MonthlySummaryRow]) -> AnalysisPayload {
        fallback_analysis(SummaryMetrics::from_monthly(monthly))
    }

    async fn analyze_clients(
        &self,
        clients: &[ClientRecord],
        _top_clients: &[ClientRanking],
    ) -> ClientAnalysis {
        fallback_client_analysis(ClientSummary::from_clients(clients))
    }

    fn name(&self) -> &str {
        "basic"
    }
}
