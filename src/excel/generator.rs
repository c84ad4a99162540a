use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::core::ReportResult;
use super::sheet::{CellValue, SheetLayout, WorkbookLayout};
use super::style::ReportStyle;

/// Renderiza un `WorkbookLayout` con rust_xlsxwriter
pub struct ExcelGenerator<'s> {
    style: &'s ReportStyle,
}

impl<'s> ExcelGenerator<'s> {
    pub fn new(style: &'s ReportStyle) -> Self {
        ExcelGenerator { style }
    }

    pub fn render(&self, layout: &WorkbookLayout) -> ReportResult<Workbook> {
        let mut workbook = Workbook::new();
        for sheet in layout.sheets() {
            let worksheet = self.render_sheet(sheet)?;
            workbook.push_worksheet(worksheet);
        }
        Ok(workbook)
    }

    fn render_sheet(&self, sheet: &SheetLayout) -> ReportResult<Worksheet> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(sheet.name())?;

        // Los rangos combinados van primero; su celda superior izquierda
        // se escribe con merge_range y se omite en el recorrido normal.
        let mut merged_origins = Vec::new();
        for range in sheet.merges() {
            let origin = sheet.cell(range.first_row, range.first_col);
            let text = match origin.map(|cell| &cell.value) {
                Some(CellValue::Text(text)) => text.clone(),
                Some(other) => other.display(),
                None => String::new(),
            };
            let format = origin
                .and_then(|cell| self.style.format_for(cell.style))
                .unwrap_or_else(Format::new);
            worksheet.merge_range(
                range.first_row,
                range.first_col,
                range.last_row,
                range.last_col,
                &text,
                &format,
            )?;
            merged_origins.push((range.first_row, range.first_col));
        }

        for (&(row, col), cell) in sheet.cells() {
            if merged_origins.contains(&(row, col)) {
                continue;
            }
            let format = self.style.format_for(cell.style);
            write_cell(&mut worksheet, row, col, &cell.value, format.as_ref())?;
        }

        for chart in sheet.charts() {
            let (row, col) = chart.anchor;
            worksheet.insert_chart(row, col, &chart.to_chart(sheet.name()))?;
        }

        for (&col, &width) in sheet.column_widths() {
            worksheet.set_column_width(col, width)?;
        }

        Ok(worksheet)
    }

    pub fn save<P: AsRef<Path>>(&self, layout: &WorkbookLayout, path: P) -> ReportResult<()> {
        let mut workbook = self.render(layout)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> ReportResult<()> {
    match (value, format) {
        (CellValue::Text(text), Some(format)) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        (CellValue::Text(text), None) => {
            worksheet.write_string(row, col, text)?;
        }
        (CellValue::Number(number), Some(format)) => {
            worksheet.write_number_with_format(row, col, *number, format)?;
        }
        (CellValue::Number(number), None) => {
            worksheet.write_number(row, col, *number)?;
        }
    }
    Ok(())
}
