use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de generación: {0}")]
    Generation(String),

    #[error("Nombre de archivo inválido: {0}")]
    InvalidFilename(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de base de datos: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error del proveedor de análisis: {0}")]
    Insight(String),
}

impl From<XlsxError> for ReportError {
    fn from(error: XlsxError) -> Self {
        match error {
            // Los fallos de escritura en disco se reportan como E/S
            XlsxError::IoError(e) => ReportError::Io(e),
            other => ReportError::Generation(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(error: reqwest::Error) -> Self {
        ReportError::Insight(error.to_string())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlsx_io_errors_become_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReportError = XlsxError::IoError(io).into();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn other_xlsx_errors_become_generation() {
        let err: ReportError = XlsxError::ParameterError("fila fuera de rango".to_string()).into();
        assert!(matches!(err, ReportError::Generation(_)));
    }
}
