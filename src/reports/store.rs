use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::{ReportError, ReportResult};

pub const REPORT_EXTENSION: &str = "xlsx";

/// Directorio donde se guardan los reportes generados
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

/// Entrada del listado de reportes
#[derive(Debug, Clone, Serialize)]
pub struct StoredReport {
    pub filename: String,
    pub size_kb: f64,
    pub modified: DateTime<Local>,
    pub path: PathBuf,
}

impl ArtifactStore {
    /// Abre el almacén creando el directorio si no existe
    pub fn open<P: Into<PathBuf>>(dir: P) -> ReportResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(ArtifactStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ruta destino para un nombre de archivo. El nombre debe ser un único
    /// componente normal, sin separadores ni espacios en los extremos.
    pub fn resolve(&self, filename: &str) -> ReportResult<PathBuf> {
        let invalid = || ReportError::InvalidFilename(filename.to_string());
        if filename.is_empty()
            || filename != filename.trim()
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(invalid());
        }

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(filename)),
            _ => Err(invalid()),
        }
    }

    /// Ruta de un reporte existente, si está en el almacén
    pub fn find(&self, filename: &str) -> ReportResult<Option<PathBuf>> {
        let path = self.resolve(filename)?;
        Ok(path.is_file().then_some(path))
    }

    /// Lista los reportes `.xlsx`, del más reciente al más antiguo
    pub fn list(&self) -> ReportResult<Vec<StoredReport>> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_report = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION))
                .unwrap_or(false);
            if !is_report || !path.is_file() {
                continue;
            }

            let metadata = entry.metadata()?;
            let size_kb = (metadata.len() as f64 / 1024.0 * 100.0).round() / 100.0;
            reports.push(StoredReport {
                filename: entry.file_name().to_string_lossy().into_owned(),
                size_kb,
                modified: DateTime::<Local>::from(metadata.modified()?),
                path,
            });
        }

        reports.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.filename.cmp(&b.filename)));
        Ok(reports)
    }
}
