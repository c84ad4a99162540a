use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::core::{
    AnalysisPayload, ClientAnalysis, ClientRanking, ClientRecord, ClientSummary,
    MonthlySummaryRow, ReportError, ReportResult, SummaryMetrics,
};
use super::clients::{build_client_prompt, fallback_client_analysis, parse_client_response};
use super::summary::format_soles;
use super::InsightProvider;

const SALES_MAX_TOKENS: u32 = 1000;
const CLIENTS_MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

/// Cliente de un backend compatible con la API de chat completions de OpenAI
pub struct ChatInsightProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    label: String,
}

/// Contenido esperado dentro de la respuesta del modelo
#[derive(Debug, Default, Deserialize)]
pub struct ModelAnalysis {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default, rename = "recomendaciones")]
    pub recommendations: Vec<String>,
    #[serde(default, rename = "alertas_sunat")]
    pub tax_alerts: Vec<String>,
    #[serde(default, rename = "proyeccion_trimestre")]
    pub projection: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatInsightProvider {
    pub fn new(
        label: &str,
        endpoint: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> ReportResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ChatInsightProvider {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            label: label.to_string(),
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> ReportResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_tokens,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReportError::Insight("respuesta sin contenido".to_string()))
    }
}

#[async_trait]
impl InsightProvider for ChatInsightProvider {
    async fn analyze(&self, business_name: &str, monthly: &[MonthlySummaryRow]) -> AnalysisPayload {
        let summary = SummaryMetrics::from_monthly(monthly);
        let prompt = build_prompt(business_name, &summary, monthly);

        let result = match self.complete(&prompt, SALES_MAX_TOKENS).await {
            Ok(text) => parse_model_response(&text),
            Err(e) => Err(e),
        };

        match result {
            Ok(analysis) => AnalysisPayload {
                summary,
                insights: analysis.insights,
                recommendations: analysis.recommendations,
                tax_alerts: analysis.tax_alerts,
                projection: analysis.projection,
                model_generated: true,
            },
            Err(e) => {
                tracing::warn!(provider = %self.label, error = %e, "análisis IA fallido");
                AnalysisPayload {
                    summary,
                    insights: vec![format!("Error en análisis IA: {}", e)],
                    recommendations: Vec::new(),
                    tax_alerts: Vec::new(),
                    projection: None,
                    model_generated: false,
                }
            }
        }
    }

    async fn analyze_clients(
        &self,
        clients: &[ClientRecord],
        top_clients: &[ClientRanking],
    ) -> ClientAnalysis {
        let summary = ClientSummary::from_clients(clients);
        if top_clients.is_empty() {
            return fallback_client_analysis(summary);
        }

        let prompt = build_client_prompt(&summary, top_clients);
        let result = match self.complete(&prompt, CLIENTS_MAX_TOKENS).await {
            Ok(text) => parse_client_response(&text),
            Err(e) => Err(e),
        };

        match result {
            Ok(analysis) => ClientAnalysis {
                summary,
                insights: analysis.insights,
                retention_strategies: analysis.retention_strategies,
                opportunities: analysis.opportunities,
                model_generated: true,
            },
            Err(e) => {
                tracing::warn!(provider = %self.label, error = %e, "análisis de clientes fallido");
                ClientAnalysis {
                    summary,
                    insights: vec![format!("Error en análisis IA: {}", e)],
                    model_generated: false,
                    ..Default::default()
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.label
    }
}

pub fn build_prompt(
    business_name: &str,
    summary: &SummaryMetrics,
    monthly: &[MonthlySummaryRow],
) -> String {
    let monthly_lines = if monthly.is_empty() {
        "Sin datos".to_string()
    } else {
        monthly
            .iter()
            .map(|row| {
                format!(
                    "- {}-{} {}: {} documentos, total {}, IGV {}",
                    row.year,
                    row.month_label(),
                    row.kind.to_uppercase(),
                    row.document_count,
                    format_soles(row.total),
                    format_soles(row.tax)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Eres un contador y asesor financiero experto para MYPES peruanas.
Analiza los datos de ventas del negocio "{name}".

DATOS:
- Total de ventas: {total}
- Promedio mensual: {average}
- Total documentos: {count}
- IGV acumulado: {tax}
- Tendencia: {trend}

DATOS MENSUALES:
{monthly}

Responde solo con JSON en este formato:
{{
  "insights": ["insight1", "insight2", "insight3"],
  "recomendaciones": ["recomendacion1", "recomendacion2", "recomendacion3"],
  "alertas_sunat": ["alerta1 si aplica"],
  "proyeccion_trimestre": "texto de proyección"
}}"#,
        name = business_name,
        total = format_soles(summary.total_sales),
        average = format_soles(summary.average_monthly_sales),
        count = summary.document_count,
        tax = format_soles(summary.total_tax),
        trend = summary.trend,
        monthly = monthly_lines,
    )
}

/// Quita el bloque ```json que algunos modelos ponen alrededor del JSON
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim()
}

/// Interpreta el JSON devuelto por el modelo
pub fn parse_model_response(text: &str) -> ReportResult<ModelAnalysis> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ReportError::Insight(format!("respuesta no es JSON válido: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let text = r#"{"insights": ["a", "b"], "recomendaciones": ["c"], "proyeccion_trimestre": "crece"}"#;
        let analysis = parse_model_response(text).unwrap();
        assert_eq!(analysis.insights, vec!["a", "b"]);
        assert_eq!(analysis.recommendations, vec!["c"]);
        assert!(analysis.tax_alerts.is_empty());
        assert_eq!(analysis.projection.as_deref(), Some("crece"));
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"insights\": [\"x\"]}\n```\n";
        let analysis = parse_model_response(text).unwrap();
        assert_eq!(analysis.insights, vec!["x"]);
    }

    #[test]
    fn rejects_prose() {
        let err = parse_model_response("Las ventas subieron").unwrap_err();
        assert!(matches!(err, ReportError::Insight(_)));
    }

    #[test]
    fn prompt_includes_metrics_and_months() {
        let rows = vec![MonthlySummaryRow {
            year: 2024,
            month: 3,
            kind: "boleta".to_string(),
            document_count: 4,
            subtotal: 100.0,
            tax: 18.0,
            total: 118.0,
        }];
        let summary = SummaryMetrics::from_monthly(&rows);
        let prompt = build_prompt("Bodega Central", &summary, &rows);
        assert!(prompt.contains("\"Bodega Central\""));
        assert!(prompt.contains("- 2024-03 BOLETA: 4 documentos"));
        assert!(prompt.contains("Tendencia: Datos insuficientes"));
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back() {
        let provider = ChatInsightProvider::new(
            "prueba",
            "http://127.0.0.1:9",
            "clave",
            "modelo",
            Duration::from_millis(500),
        )
        .unwrap();
        let payload = provider.analyze("Mi Negocio", &[]).await;
        assert!(!payload.model_generated);
        assert_eq!(payload.insights.len(), 1);
        assert!(payload.insights[0].starts_with("Error en análisis IA"));
        assert!(payload.recommendations.is_empty());
    }

    fn unreachable_provider() -> ChatInsightProvider {
        ChatInsightProvider::new(
            "prueba",
            "http://127.0.0.1:9",
            "clave",
            "modelo",
            Duration::from_millis(500),
        )
        .unwrap()
    }

    fn registered(id_type: &str) -> ClientRecord {
        ClientRecord {
            id_type: Some(id_type.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn clients_without_purchases_skip_the_model() {
        let clients = vec![registered("RUC"), registered("DNI")];
        let analysis = unreachable_provider().analyze_clients(&clients, &[]).await;

        assert!(!analysis.model_generated);
        assert_eq!(analysis.summary.total_clients, 2);
        assert_eq!(analysis.insights[0], "👥 Total de clientes: 2");
    }

    #[tokio::test]
    async fn client_analysis_error_keeps_the_counts() {
        let clients = vec![registered("RUC"), registered("DNI"), registered("DNI")];
        let top = vec![ClientRanking {
            name: "Distribuidora Norte".to_string(),
            document_number: Some("20555555551".to_string()),
            purchase_count: 2,
            total_amount: 1770.0,
            last_purchase: None,
        }];
        let analysis = unreachable_provider().analyze_clients(&clients, &top).await;

        assert!(!analysis.model_generated);
        assert_eq!(analysis.summary.business_clients, 1);
        assert_eq!(analysis.summary.individual_clients, 2);
        assert_eq!(analysis.insights.len(), 1);
        assert!(analysis.insights[0].starts_with("Error en análisis IA"));
        assert!(analysis.retention_strategies.is_empty());
    }
}
