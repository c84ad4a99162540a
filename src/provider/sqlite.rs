use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::core::{
    BusinessIdentity, ClientRanking, ClientRecord, DocumentRecord, MonthlySummaryRow,
    ProductRanking, ReportResult,
};

pub const DEFAULT_RANKING_LIMIT: i64 = 10;

/// Lecturas agregadas sobre la base SQLite de facturación.
/// Solo consulta; el armado de hojas queda en `reports`.
#[derive(Clone)]
pub struct SqliteProvider {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct BusinessRow {
    id: i64,
    ruc: Option<String>,
    razon_social: Option<String>,
    nombre_comercial: Option<String>,
    direccion: Option<String>,
    telefono: Option<String>,
    email: Option<String>,
}

impl From<BusinessRow> for BusinessIdentity {
    fn from(row: BusinessRow) -> Self {
        BusinessIdentity {
            id: Some(row.id),
            tax_id: row.ruc,
            legal_name: row.razon_social,
            trade_name: row.nombre_comercial,
            address: row.direccion,
            phone: row.telefono,
            email: row.email,
        }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    tipo: String,
    serie: String,
    numero: String,
    fecha_emision: String,
    fecha_vencimiento: Option<String>,
    moneda: String,
    subtotal: f64,
    igv: f64,
    total: f64,
    estado: String,
    cliente_nombre: Option<String>,
    cliente_documento: Option<String>,
    cliente_tipo_doc: Option<String>,
}

impl From<DocumentRow> for DocumentRecord {
    fn from(row: DocumentRow) -> Self {
        DocumentRecord {
            kind: row.tipo,
            series: row.serie,
            number: row.numero,
            issue_date: row.fecha_emision,
            due_date: row.fecha_vencimiento,
            currency: row.moneda,
            subtotal: row.subtotal,
            tax: row.igv,
            total: row.total,
            status: row.estado,
            counterparty_name: row.cliente_nombre,
            counterparty_id: row.cliente_documento,
            counterparty_id_type: row.cliente_tipo_doc,
        }
    }
}

#[derive(Debug, FromRow)]
struct MonthlyRow {
    anio: i64,
    mes: i64,
    tipo: String,
    cantidad_documentos: i64,
    subtotal: f64,
    igv: f64,
    total: f64,
}

impl From<MonthlyRow> for MonthlySummaryRow {
    fn from(row: MonthlyRow) -> Self {
        MonthlySummaryRow {
            year: row.anio as i32,
            month: row.mes as u32,
            kind: row.tipo,
            document_count: row.cantidad_documentos.max(0) as u64,
            subtotal: row.subtotal,
            tax: row.igv,
            total: row.total,
        }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    nombre: String,
    numero_documento: Option<String>,
    total_compras: i64,
    monto_total: f64,
    ultima_compra: Option<String>,
}

impl From<ClientRow> for ClientRanking {
    fn from(row: ClientRow) -> Self {
        ClientRanking {
            name: row.nombre,
            document_number: row.numero_documento,
            purchase_count: row.total_compras.max(0) as u64,
            total_amount: row.monto_total,
            last_purchase: row.ultima_compra,
        }
    }
}

#[derive(Debug, FromRow)]
struct RegisteredClientRow {
    id: i64,
    tipo_documento: Option<String>,
    numero_documento: Option<String>,
    nombre: String,
    direccion: Option<String>,
    email: Option<String>,
    telefono: Option<String>,
    created_at: Option<String>,
}

impl From<RegisteredClientRow> for ClientRecord {
    fn from(row: RegisteredClientRow) -> Self {
        ClientRecord {
            id: row.id,
            id_type: row.tipo_documento,
            id_number: row.numero_documento,
            name: row.nombre,
            address: row.direccion,
            email: row.email,
            phone: row.telefono,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    descripcion: String,
    cantidad_vendida: f64,
    monto_total: f64,
    en_documentos: i64,
}

impl From<ProductRow> for ProductRanking {
    fn from(row: ProductRow) -> Self {
        ProductRanking {
            description: row.descripcion,
            quantity_sold: row.cantidad_vendida,
            total_amount: row.monto_total,
            document_count: row.en_documentos.max(0) as u64,
        }
    }
}

impl SqliteProvider {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProvider { pool }
    }

    /// Conecta con un pool pequeño; la herramienta hace pocas consultas secuenciales
    pub async fn connect(database_url: &str) -> ReportResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await?;
        tracing::debug!(url = %database_url, "conectado a la base de datos");
        Ok(SqliteProvider { pool })
    }

    pub async fn business(&self, business_id: i64) -> ReportResult<Option<BusinessIdentity>> {
        let row = sqlx::query_as::<_, BusinessRow>(
            r#"
            SELECT id, ruc, razon_social, nombre_comercial, direccion,
                   telefono, email
            FROM businesses
            WHERE id = ?
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BusinessIdentity::from))
    }

    /// Comprobantes del negocio, del más reciente al más antiguo.
    /// Las fechas son inclusivas y se comparan como texto ISO.
    pub async fn documents(
        &self,
        business_id: i64,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ReportResult<Vec<DocumentRecord>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT
                d.tipo AS tipo,
                COALESCE(CAST(d.serie AS TEXT), '') AS serie,
                COALESCE(CAST(d.numero AS TEXT), '') AS numero,
                d.fecha_emision AS fecha_emision,
                d.fecha_vencimiento AS fecha_vencimiento,
                COALESCE(d.moneda, 'PEN') AS moneda,
                CAST(COALESCE(d.subtotal, 0) AS REAL) AS subtotal,
                CAST(COALESCE(d.igv, 0) AS REAL) AS igv,
                CAST(COALESCE(d.total, 0) AS REAL) AS total,
                COALESCE(d.estado, '') AS estado,
                c.nombre AS cliente_nombre,
                c.numero_documento AS cliente_documento,
                c.tipo_documento AS cliente_tipo_doc
            FROM documents d
            LEFT JOIN clients c ON d.client_id = c.id
            WHERE d.business_id = ?
              AND (? IS NULL OR d.fecha_emision >= ?)
              AND (? IS NULL OR d.fecha_emision <= ?)
            ORDER BY d.fecha_emision DESC
            "#,
        )
        .bind(business_id)
        .bind(start_date)
        .bind(start_date)
        .bind(end_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(business_id, count = rows.len(), "documentos leídos");
        Ok(rows.into_iter().map(DocumentRecord::from).collect())
    }

    /// Resumen por (año, mes, tipo), sin anulados, más reciente primero
    pub async fn monthly_summary(
        &self,
        business_id: i64,
        year: Option<i32>,
    ) -> ReportResult<Vec<MonthlySummaryRow>> {
        let year = year.map(|y| y.to_string());
        let rows = sqlx::query_as::<_, MonthlyRow>(
            r#"
            SELECT
                CAST(strftime('%Y', fecha_emision) AS INTEGER) AS anio,
                CAST(strftime('%m', fecha_emision) AS INTEGER) AS mes,
                tipo,
                CAST(COUNT(*) AS INTEGER) AS cantidad_documentos,
                CAST(COALESCE(SUM(subtotal), 0) AS REAL) AS subtotal,
                CAST(COALESCE(SUM(igv), 0) AS REAL) AS igv,
                CAST(COALESCE(SUM(total), 0) AS REAL) AS total
            FROM documents
            WHERE business_id = ? AND estado != 'anulado'
              AND (? IS NULL OR strftime('%Y', fecha_emision) = ?)
            GROUP BY anio, mes, tipo
            ORDER BY anio DESC, mes DESC
            "#,
        )
        .bind(business_id)
        .bind(year.as_deref())
        .bind(year.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MonthlySummaryRow::from).collect())
    }

    /// Todos los clientes registrados, por nombre
    pub async fn clients(&self, business_id: i64) -> ReportResult<Vec<ClientRecord>> {
        let rows = sqlx::query_as::<_, RegisteredClientRow>(
            r#"
            SELECT
                id,
                tipo_documento,
                CAST(numero_documento AS TEXT) AS numero_documento,
                COALESCE(nombre, '') AS nombre,
                direccion,
                email,
                telefono,
                CAST(created_at AS TEXT) AS created_at
            FROM clients
            WHERE business_id = ?
            ORDER BY nombre
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClientRecord::from).collect())
    }

    pub async fn top_clients(&self, business_id: i64, limit: i64) -> ReportResult<Vec<ClientRanking>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT
                c.nombre AS nombre,
                c.numero_documento AS numero_documento,
                CAST(COUNT(d.id) AS INTEGER) AS total_compras,
                CAST(COALESCE(SUM(d.total), 0) AS REAL) AS monto_total,
                MAX(d.fecha_emision) AS ultima_compra
            FROM clients c
            JOIN documents d ON c.id = d.client_id
            WHERE c.business_id = ? AND d.estado != 'anulado'
            GROUP BY c.id
            ORDER BY monto_total DESC
            LIMIT ?
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClientRanking::from).collect())
    }

    pub async fn top_products(&self, business_id: i64, limit: i64) -> ReportResult<Vec<ProductRanking>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                di.descripcion AS descripcion,
                CAST(COALESCE(SUM(di.cantidad), 0) AS REAL) AS cantidad_vendida,
                CAST(COALESCE(SUM(di.total), 0) AS REAL) AS monto_total,
                CAST(COUNT(DISTINCT di.document_id) AS INTEGER) AS en_documentos
            FROM document_items di
            JOIN documents d ON di.document_id = d.id
            WHERE d.business_id = ? AND d.estado != 'anulado'
            GROUP BY di.descripcion
            ORDER BY monto_total DESC
            LIMIT ?
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRanking::from).collect())
    }
}
