pub mod builder;
pub mod chart;
pub mod generator;
pub mod sheet;
pub mod style;

pub use builder::SheetBuilder;
pub use chart::{CellRange, ChartKind, ChartSpec};
pub use generator::ExcelGenerator;
pub use sheet::{Cell, CellValue, SheetLayout, WorkbookLayout};
pub use style::{CellStyle, ReportStyle, CURRENCY_FORMAT};
