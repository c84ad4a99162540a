pub mod sales;
pub mod store;
pub mod tax;
pub mod totals;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::core::{BusinessIdentity, DocumentRecord, FilingPeriod, ReportResult};
use crate::excel::{ExcelGenerator, ReportStyle, WorkbookLayout};

pub use sales::{build_sales_report, SalesReportData};
pub use store::{ArtifactStore, StoredReport};
pub use tax::{build_tax_report, filter_period};
pub use totals::DocumentTotals;

/// Motor de reportes: arma el libro en memoria y escribe un único archivo.
/// No guarda estado entre llamadas aparte del directorio del almacén.
pub struct ReportEngine {
    store: ArtifactStore,
    style: ReportStyle,
}

impl ReportEngine {
    pub fn new(store: ArtifactStore, style: ReportStyle) -> Self {
        ReportEngine { store, style }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn style(&self) -> &ReportStyle {
        &self.style
    }

    /// Genera el reporte de ventas de cinco hojas y devuelve la ruta escrita.
    /// Sin nombre explícito se usa `sales_report_<timestamp>.xlsx`.
    pub fn generate_sales_report(
        &self,
        data: &SalesReportData<'_>,
        filename: Option<&str>,
    ) -> ReportResult<PathBuf> {
        let now = Local::now().naive_local();
        let filename = match filename {
            Some(name) => name.to_string(),
            None => sales_report_filename(now),
        };
        let path = self.store.resolve(&filename)?;

        let layout = build_sales_report(data, &self.style, now);
        self.write(&layout, &path)?;

        tracing::info!(
            path = %path.display(),
            documents = data.documents.len(),
            months = data.monthly_summary.len(),
            with_analysis = data.analysis.is_some(),
            "reporte de ventas generado"
        );
        Ok(path)
    }

    /// Genera el reporte tributario del periodo a partir de todos los documentos.
    /// Sin nombre explícito se usa `tax_report_<año>_<mes>.xlsx`.
    pub fn generate_tax_report(
        &self,
        business: &BusinessIdentity,
        documents: &[DocumentRecord],
        year: i32,
        month: u32,
        filename: Option<&str>,
    ) -> ReportResult<PathBuf> {
        let period = FilingPeriod::new(year, month);
        let filename = match filename {
            Some(name) => name.to_string(),
            None => tax_report_filename(&period),
        };
        let path = self.store.resolve(&filename)?;

        let layout = build_tax_report(business, documents, period, &self.style);
        self.write(&layout, &path)?;

        tracing::info!(
            path = %path.display(),
            period = %period.key(),
            "reporte tributario generado"
        );
        Ok(path)
    }

    fn write(&self, layout: &WorkbookLayout, path: &Path) -> ReportResult<()> {
        ExcelGenerator::new(&self.style).save(layout, path)
    }
}

/// Incluye milisegundos para que dos llamadas seguidas no colisionen
pub fn sales_report_filename(at: NaiveDateTime) -> String {
    format!("sales_report_{}.{}", at.format("%Y%m%d_%H%M%S_%3f"), store::REPORT_EXTENSION)
}

pub fn tax_report_filename(period: &FilingPeriod) -> String {
    format!(
        "tax_report_{}_{:02}.{}",
        period.year,
        period.month,
        store::REPORT_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_filenames() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(8, 5, 7, 42)
            .unwrap();
        assert_eq!(sales_report_filename(at), "sales_report_20240309_080507_042.xlsx");
        assert_eq!(
            tax_report_filename(&FilingPeriod::new(2024, 3)),
            "tax_report_2024_03.xlsx"
        );
    }
}
