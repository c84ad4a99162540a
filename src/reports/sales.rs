//! Reporte de ventas: cinco hojas (resumen ejecutivo, documentos, resumen
//! mensual, top clientes y top productos).

use chrono::NaiveDateTime;

use crate::core::{
    AnalysisPayload, BusinessIdentity, ClientRanking, DocumentRecord, MonthlySummaryRow,
    ProductRanking,
};
use crate::excel::{
    CellRange, CellStyle, CellValue, ChartKind, ChartSpec, ReportStyle, SheetBuilder, SheetLayout,
    WorkbookLayout,
};
use super::totals::DocumentTotals;

pub const SUMMARY_SHEET: &str = "Resumen Ejecutivo";
pub const DOCUMENTS_SHEET: &str = "Documentos";
pub const MONTHLY_SHEET: &str = "Resumen Mensual";
pub const CLIENTS_SHEET: &str = "Top Clientes";
pub const PRODUCTS_SHEET: &str = "Top Productos";

/// Máximo de porciones del gráfico de productos, independiente del límite de la consulta
pub const PIE_CHART_MAX_SLICES: u32 = 5;

const DOCUMENT_HEADERS: [&str; 8] = [
    "Tipo", "Serie-Número", "Fecha", "Cliente", "Subtotal", "IGV", "Total", "Estado",
];
const MONTHLY_HEADERS: [&str; 7] = ["Año", "Mes", "Tipo", "Documentos", "Subtotal", "IGV", "Total"];
const CLIENT_HEADERS: [&str; 5] = [
    "Cliente", "Documento", "Total Compras", "Monto Total", "Última Compra",
];
const PRODUCT_HEADERS: [&str; 4] = ["Producto", "Cantidad Vendida", "Monto Total", "En Documentos"];

/// Entradas del reporte de ventas, ya agregadas por el proveedor de datos
#[derive(Debug, Clone, Copy)]
pub struct SalesReportData<'a> {
    pub business: &'a BusinessIdentity,
    pub documents: &'a [DocumentRecord],
    pub monthly_summary: &'a [MonthlySummaryRow],
    pub top_clients: &'a [ClientRanking],
    pub top_products: &'a [ProductRanking],
    pub analysis: Option<&'a AnalysisPayload>,
}

pub fn build_sales_report(
    data: &SalesReportData<'_>,
    style: &ReportStyle,
    generated_at: NaiveDateTime,
) -> WorkbookLayout {
    let mut layout = WorkbookLayout::new();
    layout.push(build_summary_sheet(data.business, data.analysis, style, generated_at));
    layout.push(build_documents_sheet(data.documents, style));
    layout.push(build_monthly_sheet(data.monthly_summary, style));
    layout.push(build_clients_sheet(data.top_clients, style));
    layout.push(build_products_sheet(data.top_products, style));
    layout
}

pub fn build_summary_sheet(
    business: &BusinessIdentity,
    analysis: Option<&AnalysisPayload>,
    style: &ReportStyle,
    generated_at: NaiveDateTime,
) -> SheetLayout {
    let mut sheet = SheetBuilder::new(SUMMARY_SHEET, style);

    sheet
        .add_title(
            &format!("📊 REPORTE DE VENTAS - {}", business.display_name()),
            Some(6),
        )
        .skip_rows(1);

    let identity = [
        ("RUC:", business.tax_id()),
        ("Razón Social:", business.legal_name()),
        ("Nombre Comercial:", business.trade_name.as_deref().unwrap_or("")),
        ("Dirección:", business.address.as_deref().unwrap_or("")),
        ("Teléfono:", business.phone.as_deref().unwrap_or("")),
        ("Email:", business.email.as_deref().unwrap_or("")),
    ];
    for (label, value) in identity {
        sheet.add_field(label, value.into(), CellStyle::Plain, CellStyle::Plain);
    }
    sheet.add_field(
        "Fecha de Reporte:",
        generated_at.format("%d/%m/%Y %H:%M").to_string().into(),
        CellStyle::Plain,
        CellStyle::Plain,
    );

    // Sin payload la sección de métricas se omite por completo
    if let Some(analysis) = analysis {
        write_analysis(&mut sheet, analysis);
    }

    tracing::debug!(sheet = SUMMARY_SHEET, with_analysis = analysis.is_some(), "hoja construida");
    sheet.finish()
}

fn write_analysis(sheet: &mut SheetBuilder<'_>, analysis: &AnalysisPayload) {
    let summary = &analysis.summary;

    sheet.skip_rows(2).add_section("📈 MÉTRICAS PRINCIPALES").skip_rows(1);
    sheet
        .add_field("Total Ventas", summary.total_sales.into(), CellStyle::Label, CellStyle::Currency)
        .add_field(
            "Promedio Mensual",
            summary.average_monthly_sales.into(),
            CellStyle::Label,
            CellStyle::Currency,
        )
        .add_field(
            "Total Documentos",
            summary.document_count.into(),
            CellStyle::Label,
            CellStyle::Plain,
        )
        .add_field("IGV Acumulado", summary.total_tax.into(), CellStyle::Label, CellStyle::Currency)
        .add_field(
            "Tendencia",
            summary.trend.as_str().into(),
            CellStyle::Label,
            CellStyle::Plain,
        );

    let origin = if analysis.model_generated {
        "Generado por IA"
    } else {
        "Análisis básico (sin IA)"
    };
    sheet
        .skip_rows(2)
        .add_section("🤖 ANÁLISIS INTELIGENTE")
        .add_field("Origen:", origin.into(), CellStyle::Plain, CellStyle::Plain)
        .add_bullets(&analysis.insights);

    sheet
        .skip_rows(1)
        .add_section("💡 RECOMENDACIONES")
        .add_bullets(&analysis.recommendations);

    if !analysis.tax_alerts.is_empty() {
        sheet
            .skip_rows(1)
            .add_section("⚠️ ALERTAS SUNAT")
            .add_bullets(&analysis.tax_alerts);
    }

    if let Some(projection) = analysis.projection.as_deref().filter(|p| !p.trim().is_empty()) {
        sheet
            .skip_rows(1)
            .add_section("🔮 PROYECCIÓN DEL TRIMESTRE")
            .add_line(projection);
    }
}

pub fn build_documents_sheet(documents: &[DocumentRecord], style: &ReportStyle) -> SheetLayout {
    let mut sheet = SheetBuilder::new(DOCUMENTS_SHEET, style);

    let header_row = sheet.add_header_row(&DOCUMENT_HEADERS);
    for doc in documents {
        sheet.add_row(vec![
            doc.kind.to_uppercase().into(),
            doc.reference().into(),
            doc.issue_date.as_str().into(),
            doc.counterparty().into(),
            doc.subtotal.into(),
            doc.tax.into(),
            doc.total.into(),
            doc.status.to_uppercase().into(),
        ]);
    }
    let first_data = header_row + 1;
    let last_data = sheet.current_row().saturating_sub(1);
    for col in [4, 5, 6] {
        sheet.apply_currency_format(col, first_data, last_data);
    }

    // Los totales salen de las filas escritas, nunca de un agregado externo
    let totals = DocumentTotals::of(documents);
    let total_row = sheet.skip_rows(1).current_row();
    sheet
        .write(total_row, 3, "TOTALES:".into(), CellStyle::Bold)
        .write(total_row, 4, totals.subtotal.into(), CellStyle::CurrencyTotal)
        .write(total_row, 5, totals.tax.into(), CellStyle::CurrencyTotal)
        .write(total_row, 6, totals.total.into(), CellStyle::CurrencyTotal)
        .skip_rows(1);

    tracing::debug!(sheet = DOCUMENTS_SHEET, rows = documents.len(), "hoja construida");
    sheet.finish()
}

pub fn build_monthly_sheet(rows: &[MonthlySummaryRow], style: &ReportStyle) -> SheetLayout {
    let mut sheet = SheetBuilder::new(MONTHLY_SHEET, style);

    let header_row = sheet.add_header_row(&MONTHLY_HEADERS);
    // Orden del proveedor: las categorías del gráfico dependen de él
    for row in rows {
        sheet.add_row(vec![
            row.year.into(),
            row.month_label().into(),
            row.kind.to_uppercase().into(),
            row.document_count.into(),
            row.subtotal.into(),
            row.tax.into(),
            row.total.into(),
        ]);
    }
    let first_data = header_row + 1;
    let last_data = sheet.current_row().saturating_sub(1);
    for col in [4, 5, 6] {
        sheet.apply_currency_format(col, first_data, last_data);
    }

    if rows.len() > 1 {
        let chart = ChartSpec::new(
            ChartKind::Column,
            "Ventas por Mes",
            CellRange::column(6, first_data, last_data),
            CellRange::column(1, first_data, last_data),
        )
        .with_series_name(header_row, 6)
        .with_axis_titles("Período", "Total (S/)")
        .anchored_at(1, 8)
        .with_size(567, 378);
        sheet.add_chart(chart);
    }

    tracing::debug!(sheet = MONTHLY_SHEET, rows = rows.len(), "hoja construida");
    sheet.finish()
}

pub fn build_clients_sheet(clients: &[ClientRanking], style: &ReportStyle) -> SheetLayout {
    let mut sheet = SheetBuilder::new(CLIENTS_SHEET, style);

    let header_row = sheet.add_header_row(&CLIENT_HEADERS);
    for client in clients {
        sheet.add_row(vec![
            client.name.as_str().into(),
            client.document_number.as_deref().unwrap_or("").into(),
            client.purchase_count.into(),
            client.total_amount.into(),
            client.last_purchase.as_deref().unwrap_or("").into(),
        ]);
    }
    let last_data = sheet.current_row().saturating_sub(1);
    sheet.apply_currency_format(3, header_row + 1, last_data);

    tracing::debug!(sheet = CLIENTS_SHEET, rows = clients.len(), "hoja construida");
    sheet.finish()
}

pub fn build_products_sheet(products: &[ProductRanking], style: &ReportStyle) -> SheetLayout {
    let mut sheet = SheetBuilder::new(PRODUCTS_SHEET, style);

    let header_row = sheet.add_header_row(&PRODUCT_HEADERS);
    for product in products {
        sheet.add_row(vec![
            product.description.as_str().into(),
            CellValue::Number(product.quantity_sold),
            product.total_amount.into(),
            product.document_count.into(),
        ]);
    }
    let first_data = header_row + 1;
    let last_data = sheet.current_row().saturating_sub(1);
    sheet.apply_currency_format(2, first_data, last_data);

    if products.len() > 1 {
        let last_slice = last_data.min(header_row + PIE_CHART_MAX_SLICES);
        let chart = ChartSpec::new(
            ChartKind::Pie,
            "Productos Más Vendidos",
            CellRange::column(2, first_data, last_slice),
            CellRange::column(0, first_data, last_slice),
        )
        .with_series_name(header_row, 2)
        .anchored_at(1, 5)
        .with_size(454, 378);
        sheet.add_chart(chart);
    }

    tracing::debug!(sheet = PRODUCTS_SHEET, rows = products.len(), "hoja construida");
    sheet.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn doc(kind: &str, number: u32, subtotal: f64) -> DocumentRecord {
        DocumentRecord {
            kind: kind.to_string(),
            series: "B001".to_string(),
            number: number.to_string(),
            issue_date: "2024-04-10".to_string(),
            currency: "PEN".to_string(),
            subtotal,
            tax: subtotal * 0.18,
            total: subtotal * 1.18,
            status: "emitido".to_string(),
            ..Default::default()
        }
    }

    fn product(name: &str, amount: f64) -> ProductRanking {
        ProductRanking {
            description: name.to_string(),
            quantity_sold: 3.0,
            total_amount: amount,
            document_count: 2,
        }
    }

    #[test]
    fn documents_sheet_renders_rows_and_totals() {
        let style = ReportStyle::default();
        let mut docs = vec![doc("boleta", 1, 100.0), doc("factura", 2, 250.5)];
        docs[1].counterparty_name = Some("Comercial Lima SAC".to_string());
        let sheet = build_documents_sheet(&docs, &style);

        assert_eq!(sheet.text(1, 0), Some("BOLETA"));
        assert_eq!(sheet.text(1, 1), Some("B001-1"));
        assert_eq!(sheet.text(1, 3), Some("Cliente General"));
        assert_eq!(sheet.text(2, 3), Some("Comercial Lima SAC"));
        assert_eq!(sheet.text(1, 7), Some("EMITIDO"));
        assert_eq!(sheet.cell(1, 4).unwrap().style, CellStyle::Currency);

        // Fila en blanco y luego totales
        assert!(sheet.cell(3, 4).is_none());
        assert_eq!(sheet.text(4, 3), Some("TOTALES:"));
        assert_eq!(sheet.number(4, 4), Some(100.0 + 250.5));
        assert_eq!(sheet.cell(4, 6).unwrap().style, CellStyle::CurrencyTotal);
    }

    #[test]
    fn empty_documents_still_have_zero_totals() {
        let style = ReportStyle::default();
        let sheet = build_documents_sheet(&[], &style);
        assert_eq!(sheet.text(0, 0), Some("Tipo"));
        assert_eq!(sheet.text(2, 3), Some("TOTALES:"));
        assert_eq!(sheet.number(2, 4), Some(0.0));
        assert_eq!(sheet.number(2, 5), Some(0.0));
        assert_eq!(sheet.number(2, 6), Some(0.0));
    }

    #[test]
    fn summary_without_analysis_omits_metrics() {
        let style = ReportStyle::default();
        let business = BusinessIdentity::default();
        let sheet = build_summary_sheet(&business, None, &style, now());

        assert_eq!(sheet.text(0, 0), Some("📊 REPORTE DE VENTAS - Mi Negocio"));
        assert_eq!(sheet.text(2, 1), Some(""));
        assert!(sheet.find_text("📈 MÉTRICAS PRINCIPALES").is_none());
        assert!(sheet.find_text("Total Ventas").is_none());
        assert!(sheet.find_text("💡 RECOMENDACIONES").is_none());
    }

    #[test]
    fn summary_renders_metrics_then_insights_then_recommendations() {
        let style = ReportStyle::default();
        let business = BusinessIdentity {
            legal_name: Some("Bodega Don Pepe EIRL".to_string()),
            tax_id: Some("20123456789".to_string()),
            ..Default::default()
        };
        let analysis = AnalysisPayload {
            insights: vec!["Ventas estables".to_string(), "Más facturas".to_string()],
            recommendations: vec!["Declarar a tiempo".to_string()],
            model_generated: true,
            ..Default::default()
        };
        let sheet = build_summary_sheet(&business, Some(&analysis), &style, now());

        let (metrics_row, _) = sheet.find_text("📈 MÉTRICAS PRINCIPALES").unwrap();
        let (total_row, _) = sheet.find_text("Total Ventas").unwrap();
        let (trend_row, _) = sheet.find_text("Tendencia").unwrap();
        let (first_insight, _) = sheet.find_text("• Ventas estables").unwrap();
        let (second_insight, _) = sheet.find_text("• Más facturas").unwrap();
        let (rec, _) = sheet.find_text("• Declarar a tiempo").unwrap();

        assert!(metrics_row < total_row);
        assert_eq!(trend_row, total_row + 4);
        assert!(trend_row < first_insight);
        assert_eq!(second_insight, first_insight + 1);
        assert!(second_insight < rec);
        assert_eq!(sheet.cell(total_row, 1).unwrap().style, CellStyle::Currency);
        assert!(sheet.find_text("Generado por IA").is_some());
    }

    #[test]
    fn empty_insight_lists_render_without_rows() {
        let style = ReportStyle::default();
        let analysis = AnalysisPayload::default();
        let sheet =
            build_summary_sheet(&BusinessIdentity::default(), Some(&analysis), &style, now());

        assert!(sheet.find_text("Total Ventas").is_some());
        let (rec_row, _) = sheet.find_text("💡 RECOMENDACIONES").unwrap();
        assert_eq!(sheet.last_row(), Some(rec_row));
        assert!(sheet.find_text("⚠️ ALERTAS SUNAT").is_none());
    }

    #[test]
    fn monthly_chart_spans_every_rendered_row() {
        let style = ReportStyle::default();
        let rows: Vec<MonthlySummaryRow> = (1..=7)
            .rev()
            .map(|month| MonthlySummaryRow {
                year: 2024,
                month,
                kind: "boleta".to_string(),
                document_count: 2,
                subtotal: 100.0,
                tax: 18.0,
                total: 118.0 * f64::from(month),
            })
            .collect();
        let sheet = build_monthly_sheet(&rows, &style);

        let chart = &sheet.charts()[0];
        assert_eq!(chart.kind, ChartKind::Column);
        assert_eq!(chart.categories.row_count(), 7);
        assert_eq!(chart.values.row_count(), 7);
        assert_eq!((chart.categories.first_row, chart.categories.last_row), (1, 7));
        assert_eq!(chart.categories.first_col, 1);
        assert_eq!(chart.values.first_col, 6);
        assert_eq!(chart.series_name, Some((0, 6)));

        // Sin reordenar: julio primero, como vino del proveedor
        assert_eq!(sheet.text(1, 1), Some("07"));
        assert_eq!(sheet.text(7, 1), Some("01"));
    }

    #[test]
    fn single_month_has_no_chart() {
        let style = ReportStyle::default();
        let rows = vec![MonthlySummaryRow {
            year: 2024,
            month: 1,
            kind: "factura".to_string(),
            ..Default::default()
        }];
        assert!(build_monthly_sheet(&rows, &style).charts().is_empty());
        assert!(build_monthly_sheet(&[], &style).charts().is_empty());
    }

    #[test]
    fn pie_chart_is_capped_at_five_rows() {
        let style = ReportStyle::default();
        let products: Vec<ProductRanking> = (0..8u32)
            .map(|i| product(&format!("Producto {}", i), 1000.0 - f64::from(i)))
            .collect();
        let sheet = build_products_sheet(&products, &style);

        assert_eq!(sheet.text(8, 0), Some("Producto 7"));
        let chart = &sheet.charts()[0];
        assert_eq!(chart.kind, ChartKind::Pie);
        assert_eq!((chart.values.first_row, chart.values.last_row), (1, 5));
        assert_eq!((chart.categories.first_row, chart.categories.last_row), (1, 5));
    }

    #[test]
    fn pie_chart_shrinks_with_fewer_rows() {
        let style = ReportStyle::default();
        let products = vec![product("A", 10.0), product("B", 5.0), product("C", 1.0)];
        let sheet = build_products_sheet(&products, &style);
        assert_eq!(sheet.charts()[0].values.last_row, 3);

        let single = build_products_sheet(&products[..1], &style);
        assert!(single.charts().is_empty());
    }

    #[test]
    fn clients_sheet_formats_amount_column() {
        let style = ReportStyle::default();
        let clients = vec![ClientRanking {
            name: "Ferretería Sur".to_string(),
            document_number: Some("20456789123".to_string()),
            purchase_count: 4,
            total_amount: 1520.0,
            last_purchase: Some("2024-04-30".to_string()),
        }];
        let sheet = build_clients_sheet(&clients, &style);
        assert_eq!(sheet.number(1, 2), Some(4.0));
        assert_eq!(sheet.cell(1, 2).unwrap().style, CellStyle::Plain);
        assert_eq!(sheet.cell(1, 3).unwrap().style, CellStyle::Currency);
    }

    #[test]
    fn workbook_has_five_sheets_in_order() {
        let style = ReportStyle::default();
        let business = BusinessIdentity::default();
        let data = SalesReportData {
            business: &business,
            documents: &[],
            monthly_summary: &[],
            top_clients: &[],
            top_products: &[],
            analysis: None,
        };
        let layout = build_sales_report(&data, &style, now());
        assert_eq!(
            layout.sheet_names(),
            vec![SUMMARY_SHEET, DOCUMENTS_SHEET, MONTHLY_SHEET, CLIENTS_SHEET, PRODUCTS_SHEET]
        );
    }
}
