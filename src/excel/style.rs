use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

/// Formato de moneda compartido por todas las hojas
pub const CURRENCY_FORMAT: &str = "\"S/ \"#,##0.00";

/// Estilo semántico de una celda; el formato concreto lo decide `ReportStyle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Title,
    Section,
    Label,
    Header,
    Currency,
    CurrencyTotal,
    CurrencyPayable,
    Bold,
}

impl CellStyle {
    pub fn is_currency(&self) -> bool {
        matches!(
            self,
            CellStyle::Currency | CellStyle::CurrencyTotal | CellStyle::CurrencyPayable
        )
    }

    /// Variante monetaria del estilo; conserva el énfasis si ya lo tenía
    pub fn with_currency(self) -> Self {
        match self {
            CellStyle::Bold | CellStyle::Label | CellStyle::CurrencyTotal => CellStyle::CurrencyTotal,
            CellStyle::CurrencyPayable => CellStyle::CurrencyPayable,
            _ => CellStyle::Currency,
        }
    }
}

/// Configuración visual inmutable. Se construye una vez por llamada y se
/// pasa por referencia a cada constructor de hoja.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    pub header_fill: u32,
    pub header_font_color: u32,
    pub title_color: u32,
    pub title_font_size: f64,
    pub section_font_size: f64,
    pub payable_color: u32,
    pub currency_format: String,
    pub max_column_width: f64,
    pub column_padding: f64,
}

impl Default for ReportStyle {
    fn default() -> Self {
        ReportStyle {
            header_fill: 0x1E40AF,
            header_font_color: 0xFFFFFF,
            title_color: 0x1E40AF,
            title_font_size: 16.0,
            section_font_size: 12.0,
            payable_color: 0xFF0000,
            currency_format: CURRENCY_FORMAT.to_string(),
            max_column_width: 50.0,
            column_padding: 2.0,
        }
    }
}

impl ReportStyle {
    pub fn header_format(&self) -> Format {
        Format::new()
            .set_bold()
            .set_font_size(11)
            .set_font_color(Color::RGB(self.header_font_color))
            .set_background_color(Color::RGB(self.header_fill))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
    }

    pub fn money_format(&self) -> Format {
        Format::new().set_num_format(&self.currency_format)
    }

    pub fn title_format(&self) -> Format {
        Format::new()
            .set_bold()
            .set_font_size(self.title_font_size)
            .set_font_color(Color::RGB(self.title_color))
            .set_align(FormatAlign::Center)
    }

    pub fn section_format(&self) -> Format {
        Format::new().set_bold().set_font_size(self.section_font_size)
    }

    /// Traduce un estilo semántico al `Format` de rust_xlsxwriter
    pub fn format_for(&self, style: CellStyle) -> Option<Format> {
        match style {
            CellStyle::Plain => None,
            CellStyle::Title => Some(self.title_format()),
            CellStyle::Section => Some(self.section_format()),
            CellStyle::Label | CellStyle::Bold => Some(Format::new().set_bold()),
            CellStyle::Header => Some(self.header_format()),
            CellStyle::Currency => Some(self.money_format()),
            CellStyle::CurrencyTotal => Some(self.money_format().set_bold()),
            CellStyle::CurrencyPayable => Some(
                self.money_format()
                    .set_bold()
                    .set_font_color(Color::RGB(self.payable_color)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_variant_keeps_emphasis() {
        assert_eq!(CellStyle::Plain.with_currency(), CellStyle::Currency);
        assert_eq!(CellStyle::Bold.with_currency(), CellStyle::CurrencyTotal);
        assert_eq!(CellStyle::CurrencyPayable.with_currency(), CellStyle::CurrencyPayable);
        assert_eq!(
            CellStyle::Currency.with_currency().with_currency(),
            CellStyle::Currency
        );
    }

    #[test]
    fn plain_cells_have_no_format() {
        let style = ReportStyle::default();
        assert!(style.format_for(CellStyle::Plain).is_none());
        assert!(style.format_for(CellStyle::CurrencyPayable).is_some());
        assert_eq!(style.currency_format, CURRENCY_FORMAT);
    }
}
