use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use super::row::ExportRow;

/// Completion-state filter offered by the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionFilter {
    #[default]
    All,
    Completed,
    Incomplete,
    Partial,
    VakOnly,
}

impl CompletionFilter {
    pub fn matches(self, row: &ExportRow) -> bool {
        let vak = row.flag(fields::VAK_COMPLETED);
        let ei = row.flag(fields::EI_COMPLETED);
        let rep = row.flag(fields::REP_SYSTEM_COMPLETED);
        let all = row.flag(fields::ALL_COMPLETED);

        match self {
            Self::All => true,
            Self::Completed => all,
            Self::Incomplete => !all,
            Self::Partial => (vak || ei || rep) && !all,
            Self::VakOnly => vak && !ei && !rep,
        }
    }
}

impl FromStr for CompletionFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "incomplete" => Ok(Self::Incomplete),
            "partial" => Ok(Self::Partial),
            "vak-only" => Ok(Self::VakOnly),
            other => Err(format!("unknown completion filter '{other}'")),
        }
    }
}

/// Respondent filters applied before stats and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentFilter {
    /// Case-insensitive substring over name, email and course name.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub completion: CompletionFilter,
}

impl RespondentFilter {
    pub fn matches(&self, row: &ExportRow) -> bool {
        if let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            let term = term.to_lowercase();
            let hit = [fields::USER_NAME, fields::USER_EMAIL, fields::USER_COURSE]
                .into_iter()
                .filter_map(|field| row.text(field))
                .any(|value| value.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(course) = self
            .course
            .as_deref()
            .map(str::trim)
            .filter(|course| !course.is_empty() && *course != "all")
        {
            let by_id = row.text(fields::USER_COURSE_ID) == Some(course);
            let by_name = row.text(fields::USER_COURSE) == Some(course);
            if !by_id && !by_name {
                return false;
            }
        }

        if let Some(semester) = self.semester {
            if row.integer(fields::USER_SEMESTER) != Some(i64::from(semester)) {
                return false;
            }
        }

        self.completion.matches(row)
    }

    pub fn apply(&self, rows: Vec<ExportRow>) -> Vec<ExportRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

/// Aggregate counts shown on the dashboard, one per respondent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_respondents: usize,
    pub completed: usize,
    pub vak_completed: usize,
    pub ei_completed: usize,
    pub rep_system_completed: usize,
}

impl DashboardStats {
    pub fn from_rows(rows: &[ExportRow]) -> Self {
        let mut seen = HashSet::new();
        let mut stats = Self::default();

        for row in rows {
            let Some(id) = row.get(fields::USER_ID).render() else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            stats.total_respondents += 1;
            stats.completed += usize::from(row.flag(fields::ALL_COMPLETED));
            stats.vak_completed += usize::from(row.flag(fields::VAK_COMPLETED));
            stats.ei_completed += usize::from(row.flag(fields::EI_COMPLETED));
            stats.rep_system_completed += usize::from(row.flag(fields::REP_SYSTEM_COMPLETED));
        }

        stats
    }
}
