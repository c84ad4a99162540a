use crate::core::{MonthlySummaryRow, SummaryMetrics};

const TREND_WINDOW: usize = 3;

impl SummaryMetrics {
    /// Calcula las métricas a partir del resumen mensual en el orden del
    /// proveedor (más reciente primero).
    pub fn from_monthly(rows: &[MonthlySummaryRow]) -> Self {
        let total_sales: f64 = rows.iter().map(|row| row.total).sum();
        let average_monthly_sales = if rows.is_empty() {
            0.0
        } else {
            total_sales / rows.len() as f64
        };

        SummaryMetrics {
            total_sales,
            average_monthly_sales,
            document_count: rows.iter().map(|row| row.document_count).sum(),
            total_tax: rows.iter().map(|row| row.tax).sum(),
            trend: trend_label(rows),
        }
    }
}

/// Variación entre el promedio de las 3 filas más recientes y las 3 más antiguas
pub fn trend_label(rows: &[MonthlySummaryRow]) -> String {
    if rows.len() < 2 {
        return "Datos insuficientes".to_string();
    }

    let window = TREND_WINDOW.min(rows.len());
    let recent = mean(rows[..window].iter().map(|row| row.total));
    let older = mean(rows[rows.len() - window..].iter().map(|row| row.total));
    if older <= 0.0 {
        return "N/A".to_string();
    }

    let pct = (recent - older) / older * 100.0;
    format!("{}{:.1}%", if pct > 0.0 { "+" } else { "" }, pct)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// "S/ 1,234.56": montos para texto libre (las celdas usan el formato numérico)
pub fn format_soles(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (integer, decimal) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in integer.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("S/ {}{}.{}", sign, grouped, decimal)
}
