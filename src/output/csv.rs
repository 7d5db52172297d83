use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::types::ScreeningResult;

pub const CSV_HEADER: [&str; 6] = [
    "Candidate Name",
    "File Name",
    "Match Score",
    "Recommendation",
    "Matched Skills",
    "Missing Skills",
];

/// Every cell is quoted; embedded quotes are doubled.
pub fn results_to_csv(rows: &[&ScreeningResult]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;
    for result in rows {
        writer.write_record([
            result.candidate_name.clone(),
            result.file_name.clone(),
            result
                .match_score
                .map(|s| s.to_string())
                .unwrap_or_default(),
            result.recommendation.to_string(),
            result.matched_skills.join(", "),
            result.missing_skills.join(", "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("screening_results_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the rows to `screening_results_<today>.csv` inside `dir`.
pub fn write_export(dir: &Path, rows: &[&ScreeningResult]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating export directory: {}", dir.display()))?;
    let path = dir.join(export_file_name(Local::now().date_naive()));
    let content = results_to_csv(rows)?;
    fs::write(&path, content)
        .with_context(|| format!("failed writing export: {}", path.display()))?;
    info!("exported {} row(s) to {}", rows.len(), path.display());
    Ok(path)
}
