use std::collections::HashMap;

use crate::instruments::{InstrumentCatalog, SensorySystem};

use super::fields;

/// `user_course_id` becomes `User Course Id`.
pub fn default_header(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Human-readable headers for the selected columns. Pivoted catalog columns show the
/// question or statement text; Rep System rank columns add the system they rank.
pub fn header_row(columns: &[String], catalog: &InstrumentCatalog) -> Vec<String> {
    let overrides = catalog_overrides(catalog);
    columns
        .iter()
        .map(|column| {
            overrides
                .get(column.as_str())
                .cloned()
                .unwrap_or_else(|| default_header(column))
        })
        .collect()
}

fn catalog_overrides(catalog: &InstrumentCatalog) -> HashMap<String, String> {
    let mut overrides = HashMap::new();

    for (index, question) in catalog.learning_style().iter().enumerate() {
        overrides.insert(fields::vak_answer(index + 1), question.text.to_string());
    }
    for (index, statement) in catalog.emotional_intelligence().iter().enumerate() {
        overrides.insert(fields::ei_answer(index + 1), statement.text.to_string());
    }
    for (index, question) in catalog.sensory_preference().iter().enumerate() {
        for system in SensorySystem::ordered() {
            overrides.insert(
                fields::rep_answer(index + 1, system),
                format!("{} - ({} Rank)", question.text, system.label()),
            );
        }
    }

    overrides
}
