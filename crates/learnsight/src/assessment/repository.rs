use crate::instruments::Instrument;

use super::domain::{Respondent, RespondentId, ResponseBatch, ResultRecord, Session, SessionId};

/// Storage abstraction over respondents, sessions, responses and results.
pub trait AssessmentRepository: Send + Sync {
    fn insert_respondent(&self, respondent: Respondent) -> Result<Respondent, RepositoryError>;
    fn insert_session(&self, session: Session) -> Result<Session, RepositoryError>;
    /// Store the back-reference from a respondent to its session.
    fn link_session(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError>;
    fn fetch_respondent(&self, id: &RespondentId) -> Result<Option<Respondent>, RepositoryError>;
    fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError>;
    /// Replace an existing session; `NotFound` when the id is unknown.
    fn update_session(&self, session: Session) -> Result<(), RepositoryError>;
    fn append_responses(&self, batch: ResponseBatch) -> Result<(), RepositoryError>;
    /// Insert a result; `Conflict` when one already exists for the session and instrument.
    fn insert_result(&self, record: ResultRecord) -> Result<(), RepositoryError>;
    fn fetch_result(
        &self,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<Option<ResultRecord>, RepositoryError>;
    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError>;
    fn sessions_for(&self, respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError>;
    fn responses_for(&self, session_id: &SessionId) -> Result<Vec<ResponseBatch>, RepositoryError>;
    fn results_for(&self, session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
