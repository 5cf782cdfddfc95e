use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{Instrument, LearningStyle};

/// Raw learning-style answers keyed by zero-based question index (`"V"`, `"A"` or `"K"`).
pub type LearningStyleDraft = BTreeMap<usize, String>;
/// Raw emotional-intelligence ratings keyed by zero-based statement index.
pub type EmotionalIntelligenceDraft = BTreeMap<usize, i32>;
/// Raw rankings keyed by zero-based question index, then zero-based option index.
pub type SensoryPreferenceDraft = BTreeMap<usize, BTreeMap<usize, i32>>;

pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;
pub const OPTIONS_PER_RANKED_QUESTION: usize = 4;

/// Reasons an answer set cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("{instrument} is incomplete: {answered} of {expected} answered")]
    Incomplete {
        instrument: Instrument,
        answered: usize,
        expected: usize,
    },
    #[error("{instrument} has no item at index {index}")]
    UnknownItem { instrument: Instrument, index: usize },
    #[error("{instrument} item {index} has an invalid answer '{value}'")]
    InvalidAnswer {
        instrument: Instrument,
        index: usize,
        value: String,
    },
    #[error("question {question} must assign ranks 1 to 4 exactly once across its options")]
    InvalidRanking { question: usize },
}

impl ValidationFailure {
    pub fn instrument(&self) -> Instrument {
        match self {
            Self::Incomplete { instrument, .. }
            | Self::UnknownItem { instrument, .. }
            | Self::InvalidAnswer { instrument, .. } => *instrument,
            Self::InvalidRanking { .. } => Instrument::SensoryPreference,
        }
    }
}

/// Complete learning-style answers, one style per question in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStyleAnswers(Vec<LearningStyle>);

impl LearningStyleAnswers {
    pub fn as_slice(&self) -> &[LearningStyle] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Complete ratings (1-5), one per statement in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalIntelligenceAnswers(Vec<u8>);

impl EmotionalIntelligenceAnswers {
    pub fn rating(&self, statement_index: usize) -> Option<u8> {
        self.0.get(statement_index).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Complete rankings. `ranks[q][o]` is the rank (1 = most descriptive) of option `o`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryPreferenceAnswers(Vec<[u8; OPTIONS_PER_RANKED_QUESTION]>);

impl SensoryPreferenceAnswers {
    pub fn question_ranks(&self) -> &[[u8; OPTIONS_PER_RANKED_QUESTION]] {
        &self.0
    }
}

pub fn validate_learning_style(
    draft: &LearningStyleDraft,
    total_questions: usize,
) -> Result<LearningStyleAnswers, ValidationFailure> {
    let instrument = Instrument::LearningStyle;
    ensure_complete(instrument, draft.len(), total_questions)?;

    let mut styles = Vec::with_capacity(total_questions);
    for (&index, value) in draft {
        ensure_in_range(instrument, index, total_questions)?;
        let style =
            LearningStyle::from_code(value).ok_or_else(|| ValidationFailure::InvalidAnswer {
                instrument,
                index,
                value: value.clone(),
            })?;
        styles.push(style);
    }

    Ok(LearningStyleAnswers(styles))
}

pub fn validate_emotional_intelligence(
    draft: &EmotionalIntelligenceDraft,
    total_statements: usize,
) -> Result<EmotionalIntelligenceAnswers, ValidationFailure> {
    let instrument = Instrument::EmotionalIntelligence;
    ensure_complete(instrument, draft.len(), total_statements)?;

    let mut ratings = Vec::with_capacity(total_statements);
    for (&index, &rating) in draft {
        ensure_in_range(instrument, index, total_statements)?;
        if !RATING_RANGE.contains(&rating) {
            return Err(ValidationFailure::InvalidAnswer {
                instrument,
                index,
                value: rating.to_string(),
            });
        }
        ratings.push(rating as u8);
    }

    Ok(EmotionalIntelligenceAnswers(ratings))
}

pub fn validate_sensory_preference(
    draft: &SensoryPreferenceDraft,
    total_questions: usize,
) -> Result<SensoryPreferenceAnswers, ValidationFailure> {
    let instrument = Instrument::SensoryPreference;
    ensure_complete(instrument, draft.len(), total_questions)?;

    let required: BTreeSet<i32> = (1..=OPTIONS_PER_RANKED_QUESTION as i32).collect();
    let mut questions = Vec::with_capacity(total_questions);

    for (&question, rankings) in draft {
        ensure_in_range(instrument, question, total_questions)?;

        let used: BTreeSet<i32> = rankings.values().copied().collect();
        let options_in_range = rankings
            .keys()
            .all(|&option| option < OPTIONS_PER_RANKED_QUESTION);
        if rankings.len() != OPTIONS_PER_RANKED_QUESTION || !options_in_range || used != required
        {
            return Err(ValidationFailure::InvalidRanking { question });
        }

        let mut ranks = [0u8; OPTIONS_PER_RANKED_QUESTION];
        for (&option, &rank) in rankings {
            ranks[option] = rank as u8;
        }
        questions.push(ranks);
    }

    Ok(SensoryPreferenceAnswers(questions))
}

pub fn is_valid_learning_style(draft: &LearningStyleDraft, total_questions: usize) -> bool {
    validate_learning_style(draft, total_questions).is_ok()
}

pub fn is_valid_emotional_intelligence(
    draft: &EmotionalIntelligenceDraft,
    total_statements: usize,
) -> bool {
    validate_emotional_intelligence(draft, total_statements).is_ok()
}

pub fn is_valid_sensory_preference(draft: &SensoryPreferenceDraft, total_questions: usize) -> bool {
    validate_sensory_preference(draft, total_questions).is_ok()
}

fn ensure_complete(
    instrument: Instrument,
    answered: usize,
    expected: usize,
) -> Result<(), ValidationFailure> {
    if answered == expected {
        Ok(())
    } else {
        Err(ValidationFailure::Incomplete {
            instrument,
            answered,
            expected,
        })
    }
}

fn ensure_in_range(
    instrument: Instrument,
    index: usize,
    total: usize,
) -> Result<(), ValidationFailure> {
    if index < total {
        Ok(())
    } else {
        Err(ValidationFailure::UnknownItem { instrument, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(ranks: [i32; 4]) -> BTreeMap<usize, i32> {
        ranks.into_iter().enumerate().collect()
    }

    #[test]
    fn learning_style_requires_every_question() {
        let mut draft: LearningStyleDraft = BTreeMap::new();
        draft.insert(0, "V".to_string());
        draft.insert(1, "A".to_string());

        match validate_learning_style(&draft, 3) {
            Err(ValidationFailure::Incomplete {
                answered: 2,
                expected: 3,
                ..
            }) => {}
            other => panic!("expected incomplete, got {other:?}"),
        }

        draft.insert(2, "K".to_string());
        let answers = validate_learning_style(&draft, 3).expect("complete answers");
        assert_eq!(
            answers.as_slice(),
            &[
                LearningStyle::Visual,
                LearningStyle::Auditory,
                LearningStyle::Kinesthetic
            ]
        );
    }

    #[test]
    fn learning_style_rejects_unknown_codes_and_indices() {
        let draft: LearningStyleDraft = [(0, "V".to_string()), (1, "X".to_string())].into();
        assert!(matches!(
            validate_learning_style(&draft, 2),
            Err(ValidationFailure::InvalidAnswer { index: 1, .. })
        ));

        let draft: LearningStyleDraft = [(0, "V".to_string()), (5, "A".to_string())].into();
        assert!(matches!(
            validate_learning_style(&draft, 2),
            Err(ValidationFailure::UnknownItem { index: 5, .. })
        ));
    }

    #[test]
    fn emotional_intelligence_ratings_must_be_between_one_and_five() {
        let valid: EmotionalIntelligenceDraft = [(0, 1), (1, 5), (2, 3)].into();
        assert!(is_valid_emotional_intelligence(&valid, 3));

        for bad in [0, 6, -1] {
            let draft: EmotionalIntelligenceDraft = [(0, 1), (1, bad), (2, 3)].into();
            assert!(!is_valid_emotional_intelligence(&draft, 3), "rating {bad}");
        }

        let short: EmotionalIntelligenceDraft = [(0, 1)].into();
        assert!(!is_valid_emotional_intelligence(&short, 3));
    }

    #[test]
    fn sensory_preference_rejects_duplicate_ranks() {
        let draft: SensoryPreferenceDraft =
            [(0, ranking([1, 2, 3, 4])), (1, ranking([1, 2, 2, 4]))].into();

        assert_eq!(
            validate_sensory_preference(&draft, 2),
            Err(ValidationFailure::InvalidRanking { question: 1 })
        );
    }

    #[test]
    fn sensory_preference_accepts_any_permutation() {
        for ranks in [[1, 2, 3, 4], [4, 3, 2, 1], [2, 4, 1, 3], [3, 1, 4, 2]] {
            let draft: SensoryPreferenceDraft = [(0, ranking(ranks))].into();
            let answers = validate_sensory_preference(&draft, 1).expect("permutation is valid");
            assert_eq!(
                answers.question_ranks()[0],
                ranks.map(|rank| rank as u8)
            );
        }
    }

    #[test]
    fn sensory_preference_rejects_partial_or_out_of_range_rankings() {
        let partial: SensoryPreferenceDraft =
            [(0, [(0, 1), (1, 2), (2, 3)].into_iter().collect())].into();
        assert!(!is_valid_sensory_preference(&partial, 1));

        let out_of_range: SensoryPreferenceDraft = [(0, ranking([1, 2, 3, 5]))].into();
        assert!(!is_valid_sensory_preference(&out_of_range, 1));

        let bad_option: SensoryPreferenceDraft =
            [(0, [(0, 1), (1, 2), (2, 3), (7, 4)].into_iter().collect())].into();
        assert!(!is_valid_sensory_preference(&bad_option, 1));

        let missing_question: SensoryPreferenceDraft = [(0, ranking([1, 2, 3, 4]))].into();
        assert!(matches!(
            validate_sensory_preference(&missing_question, 2),
            Err(ValidationFailure::Incomplete { .. })
        ));
    }

    #[test]
    fn failures_report_their_instrument() {
        let failure = ValidationFailure::InvalidRanking { question: 0 };
        assert_eq!(failure.instrument(), Instrument::SensoryPreference);
        let failure = ValidationFailure::Incomplete {
            instrument: Instrument::EmotionalIntelligence,
            answered: 1,
            expected: 50,
        };
        assert!(failure.to_string().contains("Emotional Intelligence"));
    }
}
