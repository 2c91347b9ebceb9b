pub mod readings;

use crate::models::Alert;
use crate::error::{DashboardError, DashboardResult};
use chrono::NaiveDate;
use std::path::PathBuf;
use log::info;

pub use readings::*;

pub const CSV_HEADER: [&str; 5] = [
    "Fecha/Hora", "Paciente", "Glucosa (mg/dL)", "Contexto", "Severidad"
];

/// Delivers generated bytes as a named file.
pub trait FileSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> DashboardResult<()>;
}

/// Writes delivered files into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> DashboardResult<()> {
        if filename.is_empty() || filename.contains(&['/', '\\'][..]) {
            return Err(DashboardError::Export(
                format!("Invalid export filename: {:?}", filename)
            ));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        std::fs::write(&path, bytes)?;
        info!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Render alerts as CSV text: header plus one line per alert, `\n` separated,
/// no trailing newline. Fields are written unquoted.
pub fn alerts_to_csv(alerts: &[Alert]) -> DashboardResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Write header
    writer.write_record(CSV_HEADER)?;

    // Write data
    for alert in alerts {
        let glucose = alert.glucose_level.to_string();
        writer.write_record([
            alert.timestamp.as_str(),
            alert.patient_id.as_str(),
            glucose.as_str(),
            alert.meal_context.label(),
            alert.severity.label(),
        ])?;
    }

    let bytes = writer.into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| DashboardError::Export(e.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("alertas_glucosa_{}.csv", date.format("%Y-%m-%d"))
}

/// Render `alerts` and hand them to `sink`. Returns the delivered filename.
pub fn export_alerts<F: FileSink + ?Sized>(
    alerts: &[Alert],
    sink: &mut F,
    date: NaiveDate,
) -> DashboardResult<String> {
    let csv = alerts_to_csv(alerts)?;
    let filename = export_filename(date);
    sink.deliver(&filename, csv.as_bytes())?;
    info!("Exported {} alerts as {}", alerts.len(), filename);
    Ok(filename)
}
