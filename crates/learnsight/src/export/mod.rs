//! Admin-facing reporting: the wide row dataset, dashboard filters and stats, and the
//! five CSV export shapes.

pub mod comprehensive;
pub mod dashboard;
pub mod dataset;
pub mod encode;
pub mod fields;
pub mod headers;
pub mod row;
pub mod shaper;

pub use comprehensive::{comprehensive_columns, group_by_respondent, RespondentAccumulator};
pub use dashboard::{CompletionFilter, DashboardStats, RespondentFilter};
pub use dataset::build_export_rows;
pub use encode::encode_csv;
pub use headers::{default_header, header_row};
pub use row::{CellValue, ExportRow};
pub use shaper::{export_data, ExportError, ExportFile, ExportType};
