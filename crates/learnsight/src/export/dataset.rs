use crate::assessment::{
    AssessmentRepository, InstrumentResponses, InstrumentResult, Respondent, RepositoryError,
    Session,
};
use crate::instruments::{EiCategory, LearningStyle, SensorySystem};

use super::fields;
use super::row::ExportRow;

/// Join every respondent with its sessions, results and responses into the wide row stream.
/// Each response becomes its own row carrying the respondent's result-level fields; a
/// session without responses still yields one row.
pub fn build_export_rows<R>(repository: &R) -> Result<Vec<ExportRow>, RepositoryError>
where
    R: AssessmentRepository + ?Sized,
{
    let mut respondents = repository.respondents()?;
    respondents.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows = Vec::new();
    for respondent in &respondents {
        let mut sessions = repository.sessions_for(&respondent.id)?;
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));

        if sessions.is_empty() {
            rows.push(respondent_row(respondent));
            continue;
        }

        for session in &sessions {
            let mut base = respondent_row(respondent);
            apply_session(&mut base, session);
            for record in repository.results_for(&session.id)? {
                apply_result(&mut base, &record.result);
            }

            let fragments: Vec<ExportRow> = repository
                .responses_for(&session.id)?
                .iter()
                .flat_map(|batch| fragment_rows(&base, &batch.responses))
                .collect();

            if fragments.is_empty() {
                rows.push(base);
            } else {
                rows.extend(fragments);
            }
        }
    }

    Ok(rows)
}

fn respondent_row(respondent: &Respondent) -> ExportRow {
    let demographics = &respondent.demographics;
    ExportRow::new()
        .with(fields::USER_ID, respondent.id.0.as_str())
        .with(fields::USER_NAME, demographics.name.as_str())
        .with(fields::USER_EMAIL, demographics.email.as_str())
        .with(fields::USER_AGE, demographics.age)
        .with(fields::USER_GENDER, demographics.gender.as_str())
        .with(fields::USER_CITY, demographics.city.as_str())
        .with(fields::USER_COURSE_ID, demographics.course_id.as_str())
        .with(fields::USER_COURSE, demographics.course_name.as_str())
        .with(fields::USER_SEMESTER, demographics.semester)
        .with(fields::USER_REGISTRATION_DATE, respondent.created_at)
}

fn apply_session(row: &mut ExportRow, session: &Session) {
    row.set(fields::SESSION_ID, session.id.0.as_str());
    row.set(fields::SESSION_STARTED_AT, session.started_at);
    row.set(fields::VAK_COMPLETED, session.vak_completed);
    row.set(fields::EI_COMPLETED, session.ei_completed);
    row.set(fields::REP_SYSTEM_COMPLETED, session.rep_system_completed);
    row.set(fields::ALL_COMPLETED, session.all_completed);
    row.set(fields::SESSION_COMPLETION_DATE, session.completed_at);
}

fn apply_result(row: &mut ExportRow, result: &InstrumentResult) {
    match result {
        InstrumentResult::LearningStyle(result) => {
            for style in LearningStyle::ordered() {
                row.set(fields::vak_score(style), result.scores.score(style));
            }
            row.set(fields::VAK_DOMINANT_STYLE, result.dominant_style.label());
        }
        InstrumentResult::EmotionalIntelligence(result) => {
            for category in EiCategory::ordered() {
                row.set(fields::ei_score(category), result.scores.score(category));
                let tier = result
                    .classifications
                    .get(&category)
                    .copied()
                    .unwrap_or_else(|| result.scores.classification(category));
                row.set(fields::ei_classification(category), tier.label());
            }
            row.set(fields::EI_TOTAL_SCORE, result.scores.total);
        }
        InstrumentResult::SensoryPreference(result) => {
            for system in SensorySystem::ordered() {
                row.set(fields::rep_score(system), result.scores.score(system));
            }
            row.set(fields::REP_DOMINANT_SYSTEM, result.dominant_system.label());
        }
    }
}

fn fragment_rows(base: &ExportRow, responses: &InstrumentResponses) -> Vec<ExportRow> {
    match responses {
        InstrumentResponses::LearningStyle(responses) => responses
            .iter()
            .map(|response| {
                base.clone()
                    .with(fields::VAK_QUESTION_NUMBER, response.question_number)
                    .with(fields::VAK_QUESTION_TEXT, response.question_text.as_str())
                    .with(fields::VAK_SELECTED_OPTION, response.option_text.as_str())
                    .with(fields::VAK_SELECTED_VALUE, response.selected_value.code())
            })
            .collect(),
        InstrumentResponses::EmotionalIntelligence(responses) => responses
            .iter()
            .map(|response| {
                base.clone()
                    .with(fields::EI_STATEMENT_NUMBER, response.statement_number)
                    .with(fields::EI_STATEMENT_TEXT, response.statement_text.as_str())
                    .with(fields::EI_RATING, response.rating)
                    .with(fields::EI_CATEGORY, response.category.label())
            })
            .collect(),
        InstrumentResponses::SensoryPreference(responses) => responses
            .iter()
            .map(|response| {
                let mut row = base
                    .clone()
                    .with(fields::REP_QUESTION_NUMBER, response.question_number)
                    .with(fields::REP_QUESTION_TEXT, response.question_text.as_str());
                for system in SensorySystem::ordered() {
                    row.set(fields::rep_rank(system), response.rank_for(system));
                }
                row
            })
            .collect(),
    }
}
