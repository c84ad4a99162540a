use crate::core::DocumentRecord;

/// Sumas de columnas recalculadas a partir de las filas en memoria
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentTotals {
    pub count: u64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl DocumentTotals {
    pub fn of<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a DocumentRecord>,
    {
        documents
            .into_iter()
            .fold(DocumentTotals::default(), |mut acc, doc| {
                acc.count += 1;
                acc.subtotal += doc.subtotal;
                acc.tax += doc.tax;
                acc.total += doc.total;
                acc
            })
    }
}
