//! Respondent registration, instrument submission, completion tracking and saved progress.

pub mod domain;
pub mod progress;
pub mod registration;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Demographics, EmotionalIntelligenceResponse, EmotionalIntelligenceResult,
    InstrumentResponses, InstrumentResult, LearningStyleResponse, LearningStyleResult,
    QuizCompletion, Respondent, RespondentId, ResponseBatch, ResultRecord,
    SensoryPreferenceResponse, SensoryPreferenceResult, Session, SessionId,
};
pub use progress::{
    FileProgressStore, InProgressAttempt, ProgressError, ProgressStore, QuestionProgress,
};
pub use registration::{
    is_valid_email, session_token, standard_courses, validate_registration, Course,
    RegistrationError, RegistrationForm,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError, Registration};

#[cfg(test)]
mod tests;
