use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single cell of a wide export row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    /// Text written to the CSV cell; `None` renders as an empty quoted cell.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(value) => Some(value.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Flag(true) => Some("Yes".to_string()),
            Self::Flag(false) => Some("No".to_string()),
            Self::Timestamp(at) => Some(at.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// Wide, denormalized join of one respondent with its session, results and at most one
/// response fragment. Absent fields read as null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    cells: BTreeMap<String, CellValue>,
}

impl ExportRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> &CellValue {
        self.cells.get(field).unwrap_or(&NULL_CELL)
    }

    /// True when the field is present and not null.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_null()
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            CellValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.get(field) {
            CellValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, field: &str) -> bool {
        matches!(self.get(field), CellValue::Flag(true))
    }

    /// Copy `fields` from `other`, skipping ones that are null there.
    pub fn copy_from<'a>(&mut self, other: &ExportRow, fields: impl IntoIterator<Item = &'a str>) {
        for field in fields {
            let value = other.get(field);
            if !value.is_null() {
                self.cells.insert(field.to_string(), value.clone());
            }
        }
    }

    pub fn render(&self, columns: &[String]) -> Vec<Option<String>> {
        columns
            .iter()
            .map(|column| self.get(column).render())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
