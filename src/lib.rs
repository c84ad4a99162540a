pub mod core;
pub mod excel;
pub mod insights;
pub mod provider;
pub mod reports;

// Tipos de uso frecuente
pub use crate::core::{
    AnalysisPayload, BusinessIdentity, ClientRanking, DocumentKind, DocumentRecord, FilingPeriod,
    MonthlySummaryRow, ProductRanking, ReportConfig, ReportError, ReportResult, SummaryMetrics,
};

pub use excel::{ExcelGenerator, ReportStyle, SheetBuilder, WorkbookLayout};
pub use insights::{provider_from_config, InsightProvider};
pub use provider::SqliteProvider;
pub use reports::{ArtifactStore, ReportEngine, SalesReportData};
