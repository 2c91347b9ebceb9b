use crate::models::{Reading, SummaryPayload};
use crate::error::DashboardResult;
use std::fs::File;
use std::path::Path;
use log::info;

pub fn save_readings<P: AsRef<Path>>(readings: &[Reading], path: P) -> DashboardResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    for reading in readings {
        writer.serialize(reading)?;
    }

    writer.flush()?;
    info!("Saved {} readings to {:?}", readings.len(), path.as_ref());
    Ok(())
}

pub fn load_readings<P: AsRef<Path>>(path: P) -> DashboardResult<Vec<Reading>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let readings = reader.deserialize()
        .collect::<Result<Vec<Reading>, csv::Error>>()?;

    info!("Loaded {} readings from {:?}", readings.len(), path.as_ref());
    Ok(readings)
}

pub fn save_summary<P: AsRef<Path>>(payload: &SummaryPayload, path: P) -> DashboardResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealContext;

    #[test]
    fn test_readings_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glucose_data.csv");

        let readings = vec![
            Reading {
                timestamp: "2026-01-01 00:00:00".to_string(),
                patient_id: "P003".to_string(),
                glucose_level: 122.31,
                meal_context: MealContext::BeforeSleep,
            },
            Reading {
                timestamp: "2026-01-01 00:30:00".to_string(),
                patient_id: "P001".to_string(),
                glucose_level: 97.4,
                meal_context: MealContext::PostPrandial,
            },
        ];

        save_readings(&readings, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("timestamp,patient_id,glucose_level,meal_context"));
        assert_eq!(lines.next(), Some("2026-01-01 00:00:00,P003,122.31,Before sleep"));

        assert_eq!(load_readings(&path).unwrap(), readings);
    }

    #[test]
    fn test_missing_readings_file() {
        assert!(load_readings("/nonexistent/glucose_data.csv").is_err());
    }
}
