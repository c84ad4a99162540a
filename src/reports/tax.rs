//! Reporte tributario mensual (una hoja) para la declaración del periodo.

use crate::core::{BusinessIdentity, DocumentKind, DocumentRecord, FilingPeriod};
use crate::excel::{CellStyle, ReportStyle, SheetBuilder, SheetLayout, WorkbookLayout};
use super::totals::DocumentTotals;

pub const TAX_SHEET: &str = "Declaración Mensual";
pub const NO_DOCUMENTS_MESSAGE: &str = "No hay documentos emitidos en este período";

/// Tipos con sección propia y su título, en orden de aparición
const SECTIONS: [(DocumentKind, &str); 2] = [
    (DocumentKind::Receipt, "BOLETAS DE VENTA"),
    (DocumentKind::Invoice, "FACTURAS"),
];

/// Documentos cuyo prefijo de fecha coincide con el periodo, en el orden recibido
pub fn filter_period<'a>(
    documents: &'a [DocumentRecord],
    period: &FilingPeriod,
) -> Vec<&'a DocumentRecord> {
    documents.iter().filter(|doc| period.contains(doc)).collect()
}

pub fn build_tax_report(
    business: &BusinessIdentity,
    documents: &[DocumentRecord],
    period: FilingPeriod,
    style: &ReportStyle,
) -> WorkbookLayout {
    let mut layout = WorkbookLayout::new();
    layout.push(build_tax_sheet(business, documents, period, style));
    layout
}

pub fn build_tax_sheet(
    business: &BusinessIdentity,
    documents: &[DocumentRecord],
    period: FilingPeriod,
    style: &ReportStyle,
) -> SheetLayout {
    let in_period = filter_period(documents, &period);
    let mut sheet = SheetBuilder::new(TAX_SHEET, style);

    sheet
        .add_title(
            &format!("REPORTE TRIBUTARIO - {:02}/{}", period.month, period.year),
            Some(5),
        )
        .skip_rows(1)
        .add_field("RUC:", business.tax_id().into(), CellStyle::Plain, CellStyle::Plain)
        .add_field(
            "Razón Social:",
            business.legal_name().into(),
            CellStyle::Plain,
            CellStyle::Plain,
        )
        .skip_rows(2)
        .add_section("RESUMEN DE VENTAS DEL MES")
        .skip_rows(1);

    if in_period.is_empty() {
        sheet.add_line(NO_DOCUMENTS_MESSAGE);
        tracing::debug!(period = %period.key(), "sin documentos en el periodo");
        return sheet.finish();
    }

    let mut first_section = true;
    for (kind, title) in SECTIONS {
        let of_kind: Vec<&DocumentRecord> = in_period
            .iter()
            .copied()
            .filter(|doc| doc.kind() == kind)
            .collect();
        if of_kind.is_empty() {
            continue;
        }
        if !first_section {
            sheet.skip_rows(1);
        }
        first_section = false;
        write_kind_section(&mut sheet, title, &DocumentTotals::of(of_kind));
    }

    // Totales sobre todo el conjunto filtrado: incluye tipos sin sección
    let filing = DocumentTotals::of(in_period.iter().copied());
    sheet
        .skip_rows(2)
        .add_section("TOTALES PARA DECLARACIÓN")
        .add_field(
            "Documentos del Período:",
            filing.count.into(),
            CellStyle::Label,
            CellStyle::Bold,
        )
        .add_field(
            "Base Imponible Total:",
            filing.subtotal.into(),
            CellStyle::Plain,
            CellStyle::CurrencyTotal,
        )
        .add_field(
            "IGV por Pagar:",
            filing.tax.into(),
            CellStyle::Plain,
            CellStyle::CurrencyPayable,
        )
        .add_field(
            "Total Ventas:",
            filing.total.into(),
            CellStyle::Plain,
            CellStyle::CurrencyTotal,
        );

    tracing::debug!(
        period = %period.key(),
        documents = filing.count,
        "hoja tributaria construida"
    );
    sheet.finish()
}

fn write_kind_section(sheet: &mut SheetBuilder<'_>, title: &str, totals: &DocumentTotals) {
    let title_row = sheet.current_row();
    sheet
        .write(title_row, 0, title.into(), CellStyle::Bold)
        .skip_rows(1)
        .add_field("Cantidad:", totals.count.into(), CellStyle::Plain, CellStyle::Plain)
        .add_field(
            "Base Imponible:",
            totals.subtotal.into(),
            CellStyle::Plain,
            CellStyle::Currency,
        )
        .add_field("IGV:", totals.tax.into(), CellStyle::Plain, CellStyle::Currency)
        .add_field("Total:", totals.total.into(), CellStyle::Plain, CellStyle::CurrencyTotal);
}
