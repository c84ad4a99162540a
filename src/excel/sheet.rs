use std::collections::BTreeMap;

use super::chart::{CellRange, ChartSpec};
use super::style::{CellStyle, ReportStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Representación textual usada para calcular el ancho de columna
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{:.0}", n),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// Modelo en memoria de una hoja: celdas, rangos combinados, gráficos y anchos.
/// No toca rust_xlsxwriter; `ExcelGenerator` lo renderiza al final.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    merges: Vec<CellRange>,
    charts: Vec<ChartSpec>,
    column_widths: BTreeMap<u16, f64>,
}

impl SheetLayout {
    pub fn new(name: &str) -> Self {
        SheetLayout {
            name: name.to_string(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            charts: Vec::new(),
            column_widths: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), Cell { value, style });
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn text(&self, row: u32, col: u16) -> Option<&str> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, row: u32, col: u16) -> Option<f64> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u16), &Cell)> {
        self.cells.iter()
    }

    /// Última fila con contenido, si la hay
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().map(|(row, _)| *row).max()
    }

    /// Busca la primera celda de texto con ese contenido exacto
    pub fn find_text(&self, needle: &str) -> Option<(u32, u16)> {
        self.cells
            .iter()
            .find(|(_, cell)| matches!(&cell.value, CellValue::Text(t) if t == needle))
            .map(|(pos, _)| *pos)
    }

    pub fn merge(&mut self, range: CellRange) {
        self.merges.push(range);
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn add_chart(&mut self, chart: ChartSpec) {
        self.charts.push(chart);
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    /// Aplica el formato de moneda a una columna entre dos filas (inclusive).
    /// Solo afecta a celdas numéricas; aplicarlo dos veces no cambia nada.
    pub fn apply_currency_format(&mut self, col: u16, first_row: u32, last_row: u32) {
        if first_row > last_row {
            return;
        }
        let in_range = self.cells.range_mut((first_row, col)..=(last_row, col));
        for ((_, cell_col), cell) in in_range {
            if *cell_col == col && matches!(cell.value, CellValue::Number(_)) {
                cell.style = cell.style.with_currency();
            }
        }
    }

    /// Ancho de cada columna = texto más largo + relleno, con tope máximo.
    /// Solo mira valores de celdas, así que puede correr después de anexar gráficos.
    pub fn auto_size_columns(&mut self, style: &ReportStyle) {
        let mut longest: BTreeMap<u16, usize> = BTreeMap::new();
        for ((_, col), cell) in &self.cells {
            let len = cell.value.display().chars().count();
            let entry = longest.entry(*col).or_insert(0);
            *entry = (*entry).max(len);
        }

        self.column_widths = longest
            .into_iter()
            .map(|(col, len)| {
                let width = (len as f64 + style.column_padding).min(style.max_column_width);
                (col, width)
            })
            .collect();
    }
}

/// Conjunto ordenado de hojas que forman un reporte
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookLayout {
    sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    pub fn new() -> Self {
        WorkbookLayout { sheets: Vec::new() }
    }

    pub fn push(&mut self, sheet: SheetLayout) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[SheetLayout] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_pass_is_idempotent() {
        let style = ReportStyle::default();
        let mut sheet = SheetLayout::new("Prueba");
        sheet.set(0, 0, "Monto".into(), CellStyle::Header);
        sheet.set(1, 0, 1234.5.into(), CellStyle::Plain);
        sheet.set(2, 0, 10.0.into(), CellStyle::Bold);
        sheet.set(3, 0, "nota".into(), CellStyle::Plain);

        sheet.apply_currency_format(0, 1, 3);
        sheet.auto_size_columns(&style);
        let once = sheet.clone();

        sheet.apply_currency_format(0, 1, 3);
        sheet.auto_size_columns(&style);
        assert_eq!(sheet, once);

        assert_eq!(sheet.cell(1, 0).unwrap().style, CellStyle::Currency);
        assert_eq!(sheet.cell(2, 0).unwrap().style, CellStyle::CurrencyTotal);
        assert_eq!(sheet.cell(3, 0).unwrap().style, CellStyle::Plain);
        assert_eq!(sheet.cell(0, 0).unwrap().style, CellStyle::Header);
    }

    #[test]
    fn currency_pass_only_touches_its_column() {
        let mut sheet = SheetLayout::new("Prueba");
        sheet.set(1, 0, 5.0.into(), CellStyle::Plain);
        sheet.set(1, 1, 5.0.into(), CellStyle::Plain);
        sheet.set(2, 0, 5.0.into(), CellStyle::Plain);
        sheet.apply_currency_format(1, 1, 2);
        assert_eq!(sheet.cell(1, 0).unwrap().style, CellStyle::Plain);
        assert_eq!(sheet.cell(1, 1).unwrap().style, CellStyle::Currency);
        assert_eq!(sheet.cell(2, 0).unwrap().style, CellStyle::Plain);
    }

    #[test]
    fn widths_follow_longest_value_and_are_capped() {
        let style = ReportStyle::default();
        let mut sheet = SheetLayout::new("Prueba");
        sheet.set(0, 0, "abc".into(), CellStyle::Plain);
        sheet.set(1, 0, "abcdef".into(), CellStyle::Plain);
        sheet.set(0, 1, "x".repeat(120).into(), CellStyle::Plain);
        sheet.set(0, 2, 1500.0.into(), CellStyle::Plain);
        sheet.auto_size_columns(&style);

        assert_eq!(sheet.column_width(0), Some(8.0));
        assert_eq!(sheet.column_width(1), Some(50.0));
        assert_eq!(sheet.column_width(2), Some(6.0));
        assert_eq!(sheet.column_width(3), None);
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        let style = ReportStyle::default();
        let mut sheet = SheetLayout::new("Prueba");
        sheet.set(0, 0, "Año".into(), CellStyle::Plain);
        sheet.auto_size_columns(&style);
        assert_eq!(sheet.column_width(0), Some(5.0));
    }

    #[test]
    fn numbers_display_without_trailing_zeros() {
        assert_eq!(CellValue::Number(12.0).display(), "12");
        assert_eq!(CellValue::Number(12.5).display(), "12.5");
    }
}
