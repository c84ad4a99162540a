use chrono::{Datelike, NaiveDate};

use crate::core::TaxObligation;

/// Recomendaciones fijas de cumplimiento ante SUNAT
pub const COMPLIANCE_TIPS: [&str; 6] = [
    "💡 Emite comprobantes dentro de las 72 horas posteriores a la operación",
    "💡 Guarda tus XML y CDR por 4 años como respaldo legal",
    "💡 Verifica mensualmente que tus comprobantes estén aceptados en SUNAT",
    "💡 Si tus ventas superan los S/8,000 debes emitir factura (no boleta)",
    "💡 Declara incluso si no tuviste ventas (declaración en cero)",
    "💡 El crédito fiscal del IGV solo aplica a facturas, no boletas",
];

/// Obligaciones del mes de `today`. Fechas simplificadas: no dependen del
/// último dígito del RUC.
pub fn tax_calendar(today: NaiveDate) -> Vec<TaxObligation> {
    let due_on = |day: u32| format!("Hasta el {:02}-{:02}-{}", day, today.month(), today.year());

    vec![
        TaxObligation {
            due: due_on(12),
            obligation: "Declaración mensual PDT 621 (IGV-Renta)".to_string(),
            description: "Declaración y pago de IGV y pago a cuenta del Impuesto a la Renta"
                .to_string(),
        },
        TaxObligation {
            due: due_on(15),
            obligation: "Libros Electrónicos".to_string(),
            description: "Envío de Registro de Ventas y Compras electrónico".to_string(),
        },
        TaxObligation {
            due: "Continuo".to_string(),
            obligation: "Emisión de Comprobantes".to_string(),
            description: "Emitir boletas/facturas electrónicas por cada venta".to_string(),
        },
    ]
}
