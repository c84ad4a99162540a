use serde::Deserialize;

use crate::core::{
    ClientAnalysis, ClientRanking, ClientRecord, ClientSummary, ReportError, ReportResult,
};
use super::chat::strip_code_fence;
use super::summary::format_soles;

impl ClientSummary {
    /// Cuenta clientes por tipo de documento: RUC para empresas, DNI para personas
    pub fn from_clients(clients: &[ClientRecord]) -> Self {
        let count_type = |wanted: &str| {
            clients
                .iter()
                .filter(|client| {
                    client
                        .id_type
                        .as_deref()
                        .map(|t| t.trim().eq_ignore_ascii_case(wanted))
                        .unwrap_or(false)
                })
                .count() as u64
        };

        ClientSummary {
            total_clients: clients.len() as u64,
            business_clients: count_type("RUC"),
            individual_clients: count_type("DNI"),
        }
    }
}

/// Análisis de clientes sin modelo: solo los conteos
pub fn fallback_client_analysis(summary: ClientSummary) -> ClientAnalysis {
    ClientAnalysis {
        summary,
        insights: vec![
            format!("👥 Total de clientes: {}", summary.total_clients),
            format!("🏢 Empresas (RUC): {}", summary.business_clients),
            format!("👤 Personas (DNI): {}", summary.individual_clients),
        ],
        retention_strategies: Vec::new(),
        opportunities: Vec::new(),
        model_generated: false,
    }
}

/// Contenido esperado en la respuesta del modelo para clientes
#[derive(Debug, Default, Deserialize)]
pub struct ModelClientAnalysis {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default, rename = "estrategias_retencion")]
    pub retention_strategies: Vec<String>,
    #[serde(default, rename = "oportunidades")]
    pub opportunities: Vec<String>,
}

pub fn build_client_prompt(summary: &ClientSummary, top_clients: &[ClientRanking]) -> String {
    let top_lines = top_clients
        .iter()
        .map(|client| {
            format!(
                "- {} ({}): {} compras, {}, última {}",
                client.name,
                client.document_number.as_deref().unwrap_or("sin documento"),
                client.purchase_count,
                format_soles(client.total_amount),
                client.last_purchase.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analiza esta base de clientes de una MYPE peruana:

RESUMEN:
- Total clientes: {total}
- Empresas (RUC): {business}
- Personas naturales: {individual}

TOP CLIENTES:
{top}

Responde solo con JSON en este formato:
{{
  "insights": ["3 observaciones clave"],
  "estrategias_retencion": ["2 estrategias"],
  "oportunidades": ["2 oportunidades de crecimiento"]
}}"#,
        total = summary.total_clients,
        business = summary.business_clients,
        individual = summary.individual_clients,
        top = top_lines,
    )
}

pub fn parse_client_response(text: &str) -> ReportResult<ModelClientAnalysis> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ReportError::Insight(format!("respuesta no es JSON válido: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, id_type: Option<&str>) -> ClientRecord {
        ClientRecord {
            name: name.to_string(),
            id_type: id_type.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn counts_companies_and_people() {
        let clients = vec![
            client("Distribuidora Norte", Some("RUC")),
            client("Ana Torres", Some("DNI")),
            client("Bruno Díaz", Some("dni")),
            client("Turista", Some("PASAPORTE")),
            client("Sin documento", None),
        ];
        let summary = ClientSummary::from_clients(&clients);
        assert_eq!(summary.total_clients, 5);
        assert_eq!(summary.business_clients, 1);
        assert_eq!(summary.individual_clients, 2);
    }

    #[test]
    fn empty_client_list_counts_zero() {
        assert_eq!(ClientSummary::from_clients(&[]), ClientSummary::default());
    }

    #[test]
    fn fallback_lists_the_counts() {
        let summary = ClientSummary {
            total_clients: 7,
            business_clients: 3,
            individual_clients: 4,
        };
        let analysis = fallback_client_analysis(summary);
        assert!(!analysis.model_generated);
        assert_eq!(
            analysis.insights,
            vec![
                "👥 Total de clientes: 7",
                "🏢 Empresas (RUC): 3",
                "👤 Personas (DNI): 4",
            ]
        );
        assert!(analysis.retention_strategies.is_empty());
        assert!(analysis.opportunities.is_empty());
    }

    #[test]
    fn parses_retention_and_opportunities() {
        let text = "```json\n{\"insights\": [\"a\"], \"estrategias_retencion\": [\"b\"], \"oportunidades\": [\"c\", \"d\"]}\n```";
        let parsed = parse_client_response(text).unwrap();
        assert_eq!(parsed.insights, vec!["a"]);
        assert_eq!(parsed.retention_strategies, vec!["b"]);
        assert_eq!(parsed.opportunities, vec!["c", "d"]);
    }

    #[test]
    fn prompt_lists_top_clients() {
        let top = vec![ClientRanking {
            name: "Distribuidora Norte".to_string(),
            document_number: Some("20555555551".to_string()),
            purchase_count: 2,
            total_amount: 1770.0,
            last_purchase: Some("2024-02-03".to_string()),
        }];
        let prompt = build_client_prompt(&ClientSummary::default(), &top);
        assert!(prompt.contains("- Distribuidora Norte (20555555551): 2 compras, S/ 1,770.00"));
    }
}
