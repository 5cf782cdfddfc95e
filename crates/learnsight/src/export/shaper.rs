use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::RepositoryError;
use crate::instruments::{Instrument, InstrumentCatalog};

use super::comprehensive::{comprehensive_columns, group_by_respondent};
use super::encode::encode_csv;
use super::fields;
use super::headers::header_row;
use super::row::ExportRow;

/// The five CSV report shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportType {
    Summary,
    VakDetail,
    EiDetail,
    RepDetail,
    Comprehensive,
}

impl ExportType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Summary,
            Self::VakDetail,
            Self::EiDetail,
            Self::RepDetail,
            Self::Comprehensive,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::VakDetail => "vak-detail",
            Self::EiDetail => "ei-detail",
            Self::RepDetail => "rep-detail",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// Instrument whose response rows a detail export lists.
    pub const fn instrument(self) -> Option<Instrument> {
        match self {
            Self::VakDetail => Some(Instrument::LearningStyle),
            Self::EiDetail => Some(Instrument::EmotionalIntelligence),
            Self::RepDetail => Some(Instrument::SensoryPreference),
            Self::Summary | Self::Comprehensive => None,
        }
    }

    pub fn filename(self, today: NaiveDate) -> String {
        format!("{}_export_{}.csv", self.label(), today.format("%Y-%m-%d"))
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportType {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "vak-detail" | "vak" => Ok(Self::VakDetail),
            "ei-detail" | "ei" => Ok(Self::EiDetail),
            "rep-detail" | "rep" => Ok(Self::RepDetail),
            "comprehensive" => Ok(Self::Comprehensive),
            _ => Err(ExportError::UnknownType(value.to_string())),
        }
    }
}

/// CSV bytes ready for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
    pub rows: usize,
}

impl ExportFile {
    /// Write the file into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no {export_type} data to export")]
    Empty { export_type: ExportType },
    #[error("unknown export type '{0}'")]
    UnknownType(String),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load export data: {0}")]
    Repository(#[from] RepositoryError),
}

/// Shape already-filtered wide rows into the requested report.
pub fn export_data(
    export_type: ExportType,
    rows: &[ExportRow],
    catalog: &InstrumentCatalog,
    today: NaiveDate,
) -> Result<ExportFile, ExportError> {
    let (columns, shaped) = match export_type {
        ExportType::Summary => (summary_columns(), summary_rows(rows)),
        ExportType::VakDetail | ExportType::EiDetail | ExportType::RepDetail => {
            let instrument = export_type
                .instrument()
                .unwrap_or(Instrument::LearningStyle);
            (detail_columns(instrument), detail_rows(instrument, rows))
        }
        ExportType::Comprehensive => (
            comprehensive_columns(catalog),
            group_by_respondent(rows)
                .into_iter()
                .map(|group| group.into_row())
                .collect(),
        ),
    };

    if shaped.is_empty() {
        return Err(ExportError::Empty { export_type });
    }

    let headers = header_row(&columns, catalog);
    let rendered: Vec<Vec<Option<String>>> =
        shaped.iter().map(|row| row.render(&columns)).collect();
    let content = encode_csv(&headers, &rendered)?;

    Ok(ExportFile {
        filename: export_type.filename(today),
        content,
        rows: shaped.len(),
    })
}

fn summary_columns() -> Vec<String> {
    fields::RESPONDENT_COLUMNS
        .iter()
        .chain(fields::COMPLETION_COLUMNS.iter())
        .map(|column| column.to_string())
        .collect()
}

fn summary_rows(rows: &[ExportRow]) -> Vec<ExportRow> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| match row.get(fields::USER_ID).render() {
            Some(id) => seen.insert(id),
            None => false,
        })
        .cloned()
        .collect()
}

fn detail_columns(instrument: Instrument) -> Vec<String> {
    fields::RESPONDENT_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(fields::response_columns(instrument))
        .chain(fields::result_columns(instrument))
        .collect()
}

fn detail_rows(instrument: Instrument, rows: &[ExportRow]) -> Vec<ExportRow> {
    let key = fields::key_response_column(instrument);
    rows.iter().filter(|row| row.has(key)).cloned().collect()
}
