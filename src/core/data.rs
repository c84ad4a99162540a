use serde::{Deserialize, Serialize};

/// Etiqueta usada cuando un documento no tiene cliente asociado
pub const DEFAULT_COUNTERPARTY: &str = "Cliente General";

/// Datos de identidad del negocio emisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessIdentity {
    pub id: Option<i64>,
    pub tax_id: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl BusinessIdentity {
    pub fn tax_id(&self) -> &str {
        self.tax_id.as_deref().unwrap_or("")
    }

    pub fn legal_name(&self) -> &str {
        self.legal_name.as_deref().unwrap_or("")
    }

    /// Nombre para encabezados; nunca vacío
    pub fn display_name(&self) -> &str {
        match self.legal_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Mi Negocio",
        }
    }
}

/// Clasificación de los tipos de comprobante conocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Receipt,
    Invoice,
    Other,
}

impl DocumentKind {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "boleta" | "receipt" => DocumentKind::Receipt,
            "factura" | "invoice" => DocumentKind::Invoice,
            _ => DocumentKind::Other,
        }
    }
}

/// Un comprobante de venta emitido
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub kind: String,
    pub series: String,
    pub number: String,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub currency: String,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: String,
    pub counterparty_name: Option<String>,
    pub counterparty_id: Option<String>,
    pub counterparty_id_type: Option<String>,
}

impl DocumentRecord {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::classify(&self.kind)
    }

    /// "serie-número", p. ej. "B001-42"
    pub fn reference(&self) -> String {
        format!("{}-{}", self.series, self.number)
    }

    pub fn counterparty(&self) -> &str {
        match self.counterparty_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_COUNTERPARTY,
        }
    }
}

/// Una fila del resumen mensual: (año, mes, tipo)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    pub year: i32,
    pub month: u32,
    pub kind: String,
    pub document_count: u64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl MonthlySummaryRow {
    pub fn month_label(&self) -> String {
        format!("{:02}", self.month)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRanking {
    pub name: String,
    pub document_number: Option<String>,
    pub purchase_count: u64,
    pub total_amount: f64,
    pub last_purchase: Option<String>,
}

/// Cliente registrado del negocio, haya comprado o no
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRanking {
    pub description: String,
    pub quantity_sold: f64,
    pub total_amount: f64,
    pub document_count: u64,
}

/// Métricas resumidas del análisis de ventas.
///
/// Todos los campos tienen valor por defecto: un payload parcial se
/// deserializa sin errores y se muestra con ceros / "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub average_monthly_sales: f64,
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub total_tax: f64,
    #[serde(default = "default_trend")]
    pub trend: String,
}

fn default_trend() -> String {
    "N/A".to_string()
}

impl Default for SummaryMetrics {
    fn default() -> Self {
        SummaryMetrics {
            total_sales: 0.0,
            average_monthly_sales: 0.0,
            document_count: 0,
            total_tax: 0.0,
            trend: default_trend(),
        }
    }
}

/// Resultado del proveedor de análisis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub summary: SummaryMetrics,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub tax_alerts: Vec<String>,
    #[serde(default)]
    pub projection: Option<String>,
    /// `false` cuando el contenido es el análisis básico de respaldo
    #[serde(default)]
    pub model_generated: bool,
}

/// Conteos de la cartera de clientes por tipo de documento de identidad
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default)]
    pub total_clients: u64,
    /// Clientes identificados con RUC
    #[serde(default)]
    pub business_clients: u64,
    /// Clientes identificados con DNI
    #[serde(default)]
    pub individual_clients: u64,
}

/// Resultado del análisis de la cartera de clientes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientAnalysis {
    #[serde(default)]
    pub summary: ClientSummary,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub retention_strategies: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub model_generated: bool,
}

/// Obligación del calendario tributario mensual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxObligation {
    pub due: String,
    pub obligation: String,
    pub description: String,
}

/// Periodo de declaración (año, mes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilingPeriod {
    pub year: i32,
    pub month: u32,
}

impl FilingPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        FilingPeriod { year, month }
    }

    /// Clave "YYYY-MM" con el mes rellenado a dos dígitos
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Compara los primeros 7 caracteres de la fecha de emisión con la clave.
    /// No interpreta la fecha: asume el formato textual `YYYY-MM-DD`.
    pub fn contains(&self, document: &DocumentRecord) -> bool {
        document.issue_date.get(..7) == Some(self.key().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_on(date: &str) -> DocumentRecord {
        DocumentRecord {
            issue_date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn period_key_pads_month() {
        assert_eq!(FilingPeriod::new(2024, 3).key(), "2024-03");
        assert_eq!(FilingPeriod::new(2024, 12).key(), "2024-12");
    }

    #[test]
    fn period_matches_by_prefix_only() {
        let march = FilingPeriod::new(2024, 3);
        assert!(march.contains(&doc_on("2024-03-01")));
        assert!(march.contains(&doc_on("2024-03-31")));
        assert!(march.contains(&doc_on("2024-03-31T23:59:59")));
        assert!(!march.contains(&doc_on("2024-02-29")));
        assert!(!march.contains(&doc_on("2024-04-01")));
        assert!(!march.contains(&doc_on("2024-3-15")));
        assert!(!march.contains(&doc_on("")));
        assert!(!march.contains(&doc_on("03/15/2024")));
    }

    #[test]
    fn kinds_are_classified_in_both_languages() {
        assert_eq!(DocumentKind::classify("boleta"), DocumentKind::Receipt);
        assert_eq!(DocumentKind::classify("RECEIPT"), DocumentKind::Receipt);
        assert_eq!(DocumentKind::classify("factura"), DocumentKind::Invoice);
        assert_eq!(DocumentKind::classify("nota_credito"), DocumentKind::Other);
    }

    #[test]
    fn missing_counterparty_uses_generic_label() {
        let mut doc = doc_on("2024-01-01");
        assert_eq!(doc.counterparty(), DEFAULT_COUNTERPARTY);
        doc.counterparty_name = Some("ACME SAC".to_string());
        assert_eq!(doc.counterparty(), "ACME SAC");
    }

    #[test]
    fn partial_payload_deserializes_with_defaults() {
        let payload: AnalysisPayload =
            serde_json::from_str(r#"{"summary": {"total_sales": 10.5}, "insights": ["a"]}"#).unwrap();
        assert_eq!(payload.summary.total_sales, 10.5);
        assert_eq!(payload.summary.trend, "N/A");
        assert!(payload.recommendations.is_empty());
        assert!(!payload.model_generated);
    }
}
