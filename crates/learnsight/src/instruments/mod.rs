//! Instrument catalogs plus the validate -> score -> classify pipeline for each of the
//! three assessments.

pub mod catalog;
pub mod classify;
pub mod domain;
pub mod scoring;
pub mod validation;

pub use catalog::{
    EiStatement, InstrumentCatalog, LearningStyleOption, LearningStyleQuestion, SensoryOption,
    SensoryQuestion,
};
pub use classify::{classify_ei_score, dominant_category};
pub use domain::{EiCategory, EiTier, Instrument, LearningStyle, SensorySystem};
pub use scoring::{
    rank_points, score_emotional_intelligence, score_learning_style, score_sensory_preference,
    EmotionalIntelligenceScores, LearningStyleScores, SensoryPreferenceScores,
};
pub use validation::{
    is_valid_emotional_intelligence, is_valid_learning_style, is_valid_sensory_preference,
    validate_emotional_intelligence, validate_learning_style, validate_sensory_preference,
    EmotionalIntelligenceAnswers, EmotionalIntelligenceDraft, LearningStyleAnswers,
    LearningStyleDraft, SensoryPreferenceAnswers, SensoryPreferenceDraft, ValidationFailure,
};
