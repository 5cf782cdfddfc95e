//! Column names of the wide export row. Respondent columns carry a `user_` prefix,
//! instrument columns carry the instrument's field prefix.

use crate::instruments::{EiCategory, Instrument, LearningStyle, SensorySystem};

pub const USER_ID: &str = "user_id";
pub const USER_NAME: &str = "user_name";
pub const USER_EMAIL: &str = "user_email";
pub const USER_AGE: &str = "user_age";
pub const USER_GENDER: &str = "user_gender";
pub const USER_CITY: &str = "user_city";
pub const USER_COURSE_ID: &str = "user_course_id";
pub const USER_COURSE: &str = "user_course";
pub const USER_SEMESTER: &str = "user_semester";
pub const USER_REGISTRATION_DATE: &str = "user_registration_date";
pub const SESSION_ID: &str = "session_id";
pub const SESSION_STARTED_AT: &str = "session_started_at";

pub const VAK_COMPLETED: &str = "vak_completed";
pub const EI_COMPLETED: &str = "ei_completed";
pub const REP_SYSTEM_COMPLETED: &str = "rep_system_completed";
pub const ALL_COMPLETED: &str = "all_completed";
pub const SESSION_COMPLETION_DATE: &str = "session_completion_date";

pub const VAK_DOMINANT_STYLE: &str = "vak_dominant_style";
pub const VAK_QUESTION_NUMBER: &str = "vak_question_number";
pub const VAK_QUESTION_TEXT: &str = "vak_question_text";
pub const VAK_SELECTED_OPTION: &str = "vak_selected_option";
pub const VAK_SELECTED_VALUE: &str = "vak_selected_value";

pub const EI_TOTAL_SCORE: &str = "ei_total_score";
pub const EI_STATEMENT_NUMBER: &str = "ei_statement_number";
pub const EI_STATEMENT_TEXT: &str = "ei_statement_text";
pub const EI_RATING: &str = "ei_rating";
pub const EI_CATEGORY: &str = "ei_category";

pub const REP_DOMINANT_SYSTEM: &str = "rep_dominant_system";
pub const REP_QUESTION_NUMBER: &str = "rep_question_number";
pub const REP_QUESTION_TEXT: &str = "rep_question_text";

/// Statement slots carried by the comprehensive export.
pub const COMPREHENSIVE_EI_STATEMENTS: usize = 10;

pub const RESPONDENT_COLUMNS: [&str; 12] = [
    USER_ID,
    USER_NAME,
    USER_EMAIL,
    USER_AGE,
    USER_GENDER,
    USER_CITY,
    USER_COURSE_ID,
    USER_COURSE,
    USER_SEMESTER,
    USER_REGISTRATION_DATE,
    SESSION_ID,
    SESSION_STARTED_AT,
];

pub const COMPLETION_COLUMNS: [&str; 5] = [
    VAK_COMPLETED,
    EI_COMPLETED,
    REP_SYSTEM_COMPLETED,
    ALL_COMPLETED,
    SESSION_COMPLETION_DATE,
];

pub fn vak_score(style: LearningStyle) -> String {
    format!("vak_{}_score", style.field_key())
}

pub fn ei_score(category: EiCategory) -> String {
    format!("ei_{}_score", category.field_key())
}

pub fn ei_classification(category: EiCategory) -> String {
    format!("ei_{}_classification", category.field_key())
}

pub fn rep_score(system: SensorySystem) -> String {
    format!("rep_{}_score", system.field_key())
}

/// Rank a Rep System response row assigned to `system`.
pub fn rep_rank(system: SensorySystem) -> String {
    format!("rep_{}_rank", system.field_key())
}

/// Pivoted answer column for VAK question `number` (1-based).
pub fn vak_answer(number: usize) -> String {
    format!("vak_q{number}_selected_value")
}

/// Pivoted rating column for EI statement `number` (1-based).
pub fn ei_answer(number: usize) -> String {
    format!("ei_s{number}_response_value")
}

/// Pivoted rank column for `system` on Rep System question `number` (1-based).
pub fn rep_answer(number: usize, system: SensorySystem) -> String {
    format!("rep_q{number}_{}_rank", system.field_key())
}

pub fn result_columns(instrument: Instrument) -> Vec<String> {
    match instrument {
        Instrument::LearningStyle => LearningStyle::ordered()
            .into_iter()
            .map(vak_score)
            .chain([VAK_DOMINANT_STYLE.to_string()])
            .collect(),
        Instrument::EmotionalIntelligence => EiCategory::ordered()
            .into_iter()
            .map(ei_score)
            .chain([EI_TOTAL_SCORE.to_string()])
            .chain(EiCategory::ordered().into_iter().map(ei_classification))
            .collect(),
        Instrument::SensoryPreference => SensorySystem::ordered()
            .into_iter()
            .map(rep_score)
            .chain([REP_DOMINANT_SYSTEM.to_string()])
            .collect(),
    }
}

pub fn response_columns(instrument: Instrument) -> Vec<String> {
    match instrument {
        Instrument::LearningStyle => [
            VAK_QUESTION_NUMBER,
            VAK_QUESTION_TEXT,
            VAK_SELECTED_OPTION,
            VAK_SELECTED_VALUE,
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
        Instrument::EmotionalIntelligence => {
            [EI_STATEMENT_NUMBER, EI_STATEMENT_TEXT, EI_RATING, EI_CATEGORY]
                .into_iter()
                .map(str::to_string)
                .collect()
        }
        Instrument::SensoryPreference => [REP_QUESTION_NUMBER, REP_QUESTION_TEXT]
            .into_iter()
            .map(str::to_string)
            .chain(SensorySystem::ordered().into_iter().map(rep_rank))
            .collect(),
    }
}

/// Column whose presence marks a row as carrying a response fragment of `instrument`.
pub const fn key_response_column(instrument: Instrument) -> &'static str {
    match instrument {
        Instrument::LearningStyle => VAK_QUESTION_NUMBER,
        Instrument::EmotionalIntelligence => EI_STATEMENT_NUMBER,
        Instrument::SensoryPreference => REP_QUESTION_NUMBER,
    }
}
