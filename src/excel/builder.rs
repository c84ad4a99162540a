use super::chart::{CellRange, ChartSpec};
use super::sheet::{CellValue, SheetLayout};
use super::style::{CellStyle, ReportStyle};

/// Construye una hoja sección por sección con un cursor explícito de
/// "siguiente fila libre". Cada método escribe en el cursor y lo avanza.
pub struct SheetBuilder<'s> {
    style: &'s ReportStyle,
    sheet: SheetLayout,
    current_row: u32,
}

impl<'s> SheetBuilder<'s> {
    pub fn new(name: &str, style: &'s ReportStyle) -> Self {
        SheetBuilder {
            style,
            sheet: SheetLayout::new(name),
            current_row: 0,
        }
    }

    pub fn current_row(&self) -> u32 {
        self.current_row
    }

    /// Título en la fila actual, opcionalmente combinado sobre `merge_cols` columnas
    pub fn add_title(&mut self, title: &str, merge_cols: Option<u16>) -> &mut Self {
        self.sheet
            .set(self.current_row, 0, title.into(), CellStyle::Title);
        if let Some(cols) = merge_cols.filter(|cols| *cols > 1) {
            self.sheet.merge(CellRange {
                first_row: self.current_row,
                first_col: 0,
                last_row: self.current_row,
                last_col: cols - 1,
            });
        }
        self.current_row += 1;
        self
    }

    pub fn add_section(&mut self, text: &str) -> &mut Self {
        self.sheet
            .set(self.current_row, 0, text.into(), CellStyle::Section);
        self.current_row += 1;
        self
    }

    /// Fila "etiqueta | valor"
    pub fn add_field(
        &mut self,
        label: &str,
        value: CellValue,
        label_style: CellStyle,
        value_style: CellStyle,
    ) -> &mut Self {
        self.sheet
            .set(self.current_row, 0, label.into(), label_style);
        self.sheet.set(self.current_row, 1, value, value_style);
        self.current_row += 1;
        self
    }

    /// Fila de texto libre en la primera columna
    pub fn add_line(&mut self, text: &str) -> &mut Self {
        self.sheet
            .set(self.current_row, 0, text.into(), CellStyle::Plain);
        self.current_row += 1;
        self
    }

    pub fn add_bullets(&mut self, items: &[String]) -> &mut Self {
        for item in items {
            self.add_line(&format!("• {}", item));
        }
        self
    }

    /// Escribe encabezados con el estilo de cabecera y devuelve su fila
    pub fn add_header_row(&mut self, headers: &[&str]) -> u32 {
        let row = self.current_row;
        for (col, header) in headers.iter().enumerate() {
            self.sheet
                .set(row, col as u16, (*header).into(), CellStyle::Header);
        }
        self.current_row += 1;
        row
    }

    /// Escribe una fila de datos desde la columna 0 y devuelve su fila
    pub fn add_row(&mut self, values: Vec<CellValue>) -> u32 {
        let row = self.current_row;
        for (col, value) in values.into_iter().enumerate() {
            self.sheet.set(row, col as u16, value, CellStyle::Plain);
        }
        self.current_row += 1;
        row
    }

    /// Escritura puntual; no mueve el cursor
    pub fn write(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) -> &mut Self {
        self.sheet.set(row, col, value, style);
        self
    }

    pub fn apply_currency_format(&mut self, col: u16, first_row: u32, last_row: u32) -> &mut Self {
        self.sheet.apply_currency_format(col, first_row, last_row);
        self
    }

    pub fn add_chart(&mut self, chart: ChartSpec) -> &mut Self {
        self.sheet.add_chart(chart);
        self
    }

    pub fn skip_rows(&mut self, rows: u32) -> &mut Self {
        self.current_row += rows;
        self
    }

    /// Cierra la hoja; el ajuste de columnas corre una sola vez, al final
    pub fn finish(mut self) -> SheetLayout {
        self.sheet.auto_size_columns(self.style);
        self.sheet
    }
}
