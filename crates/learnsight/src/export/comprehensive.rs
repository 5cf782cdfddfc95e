use std::collections::HashMap;

use crate::instruments::{Instrument, InstrumentCatalog, SensorySystem};

use super::fields;
use super::row::{CellValue, ExportRow};

/// Respondent-level state folded out of the wide row stream.
#[derive(Debug, Clone, Default)]
pub struct RespondentAccumulator {
    base: ExportRow,
    learning_style: Vec<(usize, CellValue)>,
    emotional_intelligence: Vec<(usize, CellValue)>,
    sensory_preference: Vec<(usize, SensorySystem, CellValue)>,
}

impl RespondentAccumulator {
    fn from_first_row(row: &ExportRow) -> Self {
        let mut base = ExportRow::new();
        base.copy_from(row, fields::RESPONDENT_COLUMNS);
        for instrument in Instrument::ordered() {
            let columns = fields::result_columns(instrument);
            base.copy_from(row, columns.iter().map(String::as_str));
        }
        base.copy_from(row, fields::COMPLETION_COLUMNS);

        Self {
            base,
            ..Self::default()
        }
    }

    fn absorb(&mut self, row: &ExportRow) {
        if let Some(number) = question_number(row, fields::VAK_QUESTION_NUMBER) {
            self.learning_style
                .push((number, row.get(fields::VAK_SELECTED_VALUE).clone()));
        }
        if let Some(number) = question_number(row, fields::EI_STATEMENT_NUMBER) {
            self.emotional_intelligence
                .push((number, row.get(fields::EI_RATING).clone()));
        }
        if let Some(number) = question_number(row, fields::REP_QUESTION_NUMBER) {
            for system in SensorySystem::ordered() {
                self.sensory_preference.push((
                    number,
                    system,
                    row.get(&fields::rep_rank(system)).clone(),
                ));
            }
        }
    }

    pub fn learning_style_answers(&self) -> usize {
        self.learning_style.len()
    }

    pub fn emotional_intelligence_answers(&self) -> usize {
        self.emotional_intelligence.len()
    }

    /// Flatten into one row with pivoted per-question columns.
    pub fn into_row(self) -> ExportRow {
        let mut row = self.base;
        for (number, value) in self.learning_style {
            row.set(fields::vak_answer(number), value);
        }
        for (number, value) in self.emotional_intelligence {
            row.set(fields::ei_answer(number), value);
        }
        for (number, system, value) in self.sensory_preference {
            row.set(fields::rep_answer(number, system), value);
        }
        row
    }
}

fn question_number(row: &ExportRow, field: &str) -> Option<usize> {
    row.integer(field)
        .and_then(|number| usize::try_from(number).ok())
        .filter(|number| *number > 0)
}

/// Fold rows into one accumulator per respondent id, in first-encounter order. The first
/// row seen for a respondent seeds its result-level fields; every row carrying a response
/// fragment appends that fragment.
pub fn group_by_respondent(rows: &[ExportRow]) -> Vec<RespondentAccumulator> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<RespondentAccumulator> = Vec::new();

    for row in rows {
        let Some(respondent_id) = row.get(fields::USER_ID).render() else {
            continue;
        };
        let position = *positions.entry(respondent_id).or_insert_with(|| {
            grouped.push(RespondentAccumulator::from_first_row(row));
            grouped.len() - 1
        });
        grouped[position].absorb(row);
    }

    grouped
}

/// Fixed-width column set: every VAK question, the leading EI statements, and four rank
/// columns per Rep System question, whatever the respondent actually answered.
pub fn comprehensive_columns(catalog: &InstrumentCatalog) -> Vec<String> {
    let mut columns: Vec<String> = fields::RESPONDENT_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .collect();

    columns.extend(fields::result_columns(Instrument::LearningStyle));
    columns.extend((1..=catalog.learning_style().len()).map(fields::vak_answer));

    columns.extend(fields::result_columns(Instrument::EmotionalIntelligence));
    let statements = catalog
        .emotional_intelligence()
        .len()
        .min(fields::COMPREHENSIVE_EI_STATEMENTS);
    columns.extend((1..=statements).map(fields::ei_answer));

    columns.extend(fields::result_columns(Instrument::SensoryPreference));
    for number in 1..=catalog.sensory_preference().len() {
        columns.extend(
            SensorySystem::ordered()
                .into_iter()
                .map(|system| fields::rep_answer(number, system)),
        );
    }

    columns.extend(
        fields::COMPLETION_COLUMNS
            .iter()
            .map(|column| column.to_string()),
    );
    columns
}
