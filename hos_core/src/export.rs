//! Writing planned trips to disk.
//!
//! JSON output is written atomically (temp file, fsync, rename) so a
//! reader never observes a half-written plan. The CSV output flattens the
//! daily logs into one row per duty-status segment.

use crate::{Error, Result, TripPlan};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the log CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    day: u32,
    date: String,
    status: &'a str,
    start_minute: u32,
    end_minute: u32,
    duration_minutes: u32,
}

/// Write the full plan as pretty-printed JSON
pub fn write_plan_json(plan: &TripPlan, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, plan)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote plan {} to {:?}", plan.id, path);
    Ok(())
}

/// Write one CSV row per log segment, with headers
///
/// Returns the number of rows written.
pub fn write_log_csv(plan: &TripPlan, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;

    for log in &plan.daily_logs {
        let date = log.date.to_string();
        for segment in &log.segments {
            writer.serialize(CsvRow {
                day: log.day,
                date: date.clone(),
                status: segment.status.as_str(),
                start_minute: segment.start_minute,
                end_minute: segment.end_minute,
                duration_minutes: segment.duration_minutes(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    tracing::info!("Wrote {} log rows to {:?}", rows, path);
    Ok(rows)
}
