use rust_xlsxwriter::{Chart, ChartType};

/// Rango rectangular de celdas, índices base cero e inclusivos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    pub fn column(col: u16, first_row: u32, last_row: u32) -> Self {
        CellRange {
            first_row,
            first_col: col,
            last_row,
            last_col: col,
        }
    }

    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Column,
    Pie,
}

/// Descripción de un gráfico anclado a una hoja. Se convierte a
/// `rust_xlsxwriter::Chart` al renderizar.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    /// Celda con el nombre de la serie (encabezado de la columna de valores)
    pub series_name: Option<(u32, u16)>,
    pub values: CellRange,
    pub categories: CellRange,
    pub anchor: (u32, u16),
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: &str, values: CellRange, categories: CellRange) -> Self {
        ChartSpec {
            kind,
            title: title.to_string(),
            x_axis_title: None,
            y_axis_title: None,
            series_name: None,
            values,
            categories,
            anchor: (1, 8),
            width: 480,
            height: 288,
        }
    }

    pub fn with_axis_titles(mut self, x: &str, y: &str) -> Self {
        self.x_axis_title = Some(x.to_string());
        self.y_axis_title = Some(y.to_string());
        self
    }

    pub fn with_series_name(mut self, row: u32, col: u16) -> Self {
        self.series_name = Some((row, col));
        self
    }

    pub fn anchored_at(mut self, row: u32, col: u16) -> Self {
        self.anchor = (row, col);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn to_chart(&self, sheet_name: &str) -> Chart {
        let chart_type = match self.kind {
            ChartKind::Column => ChartType::Column,
            ChartKind::Pie => ChartType::Pie,
        };
        let mut chart = Chart::new(chart_type);
        chart.title().set_name(self.title.as_str());

        let series = chart.add_series();
        series
            .set_values((
                sheet_name,
                self.values.first_row,
                self.values.first_col,
                self.values.last_row,
                self.values.last_col,
            ))
            .set_categories((
                sheet_name,
                self.categories.first_row,
                self.categories.first_col,
                self.categories.last_row,
                self.categories.last_col,
            ));
        if let Some((row, col)) = self.series_name {
            series.set_name((sheet_name, row, col));
        }

        if let Some(ref x) = self.x_axis_title {
            chart.x_axis().set_name(x.as_str());
        }
        if let Some(ref y) = self.y_axis_title {
            chart.y_axis().set_name(y.as_str());
        }

        chart.set_width(self.width).set_height(self.height);
        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_range_counts_rows() {
        let range = CellRange::column(6, 1, 7);
        assert_eq!(range.row_count(), 7);
        assert_eq!(range.first_col, range.last_col);
    }

    #[test]
    fn builder_sets_anchor_and_names() {
        let spec = ChartSpec::new(
            ChartKind::Pie,
            "Productos",
            CellRange::column(2, 1, 5),
            CellRange::column(0, 1, 5),
        )
        .with_series_name(0, 2)
        .anchored_at(1, 5);
        assert_eq!(spec.anchor, (1, 5));
        assert_eq!(spec.series_name, Some((0, 2)));
        let _chart = spec.to_chart("Top Productos");
    }
}
