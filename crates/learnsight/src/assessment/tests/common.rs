use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{
    Respondent, RespondentId, ResponseBatch, ResultRecord, Session, SessionId,
};
use crate::assessment::progress::{InProgressAttempt, ProgressError, ProgressStore};
use crate::assessment::registration::RegistrationForm;
use crate::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::assessment::service::{AssessmentService, Registration};
use crate::instruments::{
    EmotionalIntelligenceDraft, Instrument, InstrumentCatalog, LearningStyleDraft,
    SensoryPreferenceDraft,
};

pub(super) fn registration_form() -> RegistrationForm {
    RegistrationForm {
        name: "Asha Rao".to_string(),
        email: "asha.rao@example.edu".to_string(),
        age: Some(20),
        gender: "Female".to_string(),
        city: "Pune".to_string(),
        course_id: "bsc-psychology".to_string(),
        semester: Some(4),
    }
}

/// One code per VAK question, cycling through `codes`.
pub(super) fn learning_style_answers(codes: &[&str]) -> LearningStyleDraft {
    let total = InstrumentCatalog::standard().learning_style().len();
    (0..total)
        .map(|index| (index, codes[index % codes.len()].to_string()))
        .collect()
}

pub(super) fn emotional_intelligence_answers(rating: i32) -> EmotionalIntelligenceDraft {
    let total = InstrumentCatalog::standard().emotional_intelligence().len();
    (0..total).map(|index| (index, rating)).collect()
}

/// Every question ranked in option order: first option 1, last option 4.
pub(super) fn sensory_preference_answers() -> SensoryPreferenceDraft {
    let total = InstrumentCatalog::standard().sensory_preference().len();
    (0..total)
        .map(|question| {
            let ranks: BTreeMap<usize, i32> =
                (0..4).map(|option| (option, option as i32 + 1)).collect();
            (question, ranks)
        })
        .collect()
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryProgress>,
    Arc<MemoryRepository>,
    Arc<MemoryProgress>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let progress = Arc::new(MemoryProgress::default());
    let service = AssessmentService::new(repository.clone(), progress.clone());
    (service, repository, progress)
}

pub(super) fn register<R, P>(service: &AssessmentService<R, P>) -> Registration
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    service
        .register(registration_form())
        .expect("registration succeeds")
}

pub(super) fn complete_all<R, P>(service: &AssessmentService<R, P>, registration: &Registration)
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    let respondent_id = &registration.respondent.id;
    let session_id = &registration.session.id;
    service
        .submit_learning_style(respondent_id, session_id, &learning_style_answers(&["V", "A"]))
        .expect("vak submits");
    service
        .submit_emotional_intelligence(
            respondent_id,
            session_id,
            &emotional_intelligence_answers(4),
        )
        .expect("ei submits");
    service
        .submit_sensory_preference(respondent_id, session_id, &sensory_preference_answers())
        .expect("rep submits");
}

#[derive(Default)]
pub(super) struct MemoryState {
    pub(super) respondents: HashMap<RespondentId, Respondent>,
    pub(super) sessions: HashMap<SessionId, Session>,
    pub(super) responses: Vec<ResponseBatch>,
    pub(super) results: Vec<ResultRecord>,
    pub(super) session_updates: usize,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn session(&self, id: &SessionId) -> Session {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .sessions
            .get(id)
            .cloned()
            .expect("session stored")
    }

    pub(super) fn session_updates(&self) -> usize {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .session_updates
    }

    pub(super) fn response_batches(&self) -> usize {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .responses
            .len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert_respondent(&self, respondent: Respondent) -> Result<Respondent, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if guard.respondents.contains_key(&respondent.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .respondents
            .insert(respondent.id.clone(), respondent.clone());
        Ok(respondent)
    }

    fn insert_session(&self, session: Session) -> Result<Session, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if guard.sessions.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn link_session(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let respondent = guard
            .respondents
            .get_mut(respondent_id)
            .ok_or(RepositoryError::NotFound)?;
        respondent.session_id = Some(session_id.clone());
        Ok(())
    }

    fn fetch_respondent(&self, id: &RespondentId) -> Result<Option<Respondent>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.respondents.get(id).cloned())
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.sessions.get(id).cloned())
    }

    fn update_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if !guard.sessions.contains_key(&session.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.session_updates += 1;
        guard.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    fn append_responses(&self, batch: ResponseBatch) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.responses.push(batch);
        Ok(())
    }

    fn insert_result(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let instrument = record.result.instrument();
        if guard
            .results
            .iter()
            .any(|existing| {
                existing.session_id == record.session_id
                    && existing.result.instrument() == instrument
            })
        {
            return Err(RepositoryError::Conflict);
        }
        guard.results.push(record);
        Ok(())
    }

    fn fetch_result(
        &self,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .results
            .iter()
            .find(|record| {
                &record.session_id == session_id && record.result.instrument() == instrument
            })
            .cloned())
    }

    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.respondents.values().cloned().collect())
    }

    fn sessions_for(&self, respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .sessions
            .values()
            .filter(|session| &session.respondent_id == respondent_id)
            .cloned()
            .collect())
    }

    fn responses_for(&self, session_id: &SessionId) -> Result<Vec<ResponseBatch>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .responses
            .iter()
            .filter(|batch| &batch.session_id == session_id)
            .cloned()
            .collect())
    }

    fn results_for(&self, session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .results
            .iter()
            .filter(|record| &record.session_id == session_id)
            .cloned()
            .collect())
    }
}

/// Delegates to a memory repository but refuses every result insert.
#[derive(Default, Clone)]
pub(super) struct ResultWriteFailure {
    pub(super) inner: MemoryRepository,
}

impl AssessmentRepository for ResultWriteFailure {
    fn insert_respondent(&self, respondent: Respondent) -> Result<Respondent, RepositoryError> {
        self.inner.insert_respondent(respondent)
    }

    fn insert_session(&self, session: Session) -> Result<Session, RepositoryError> {
        self.inner.insert_session(session)
    }

    fn link_session(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        self.inner.link_session(respondent_id, session_id)
    }

    fn fetch_respondent(&self, id: &RespondentId) -> Result<Option<Respondent>, RepositoryError> {
        self.inner.fetch_respondent(id)
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        self.inner.fetch_session(id)
    }

    fn update_session(&self, session: Session) -> Result<(), RepositoryError> {
        self.inner.update_session(session)
    }

    fn append_responses(&self, batch: ResponseBatch) -> Result<(), RepositoryError> {
        self.inner.append_responses(batch)
    }

    fn insert_result(&self, _record: ResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("results table offline".to_string()))
    }

    fn fetch_result(
        &self,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<Option<ResultRecord>, RepositoryError> {
        self.inner.fetch_result(session_id, instrument)
    }

    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError> {
        self.inner.respondents()
    }

    fn sessions_for(&self, respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError> {
        self.inner.sessions_for(respondent_id)
    }

    fn responses_for(&self, session_id: &SessionId) -> Result<Vec<ResponseBatch>, RepositoryError> {
        self.inner.responses_for(session_id)
    }

    fn results_for(&self, session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError> {
        self.inner.results_for(session_id)
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert_respondent(&self, _respondent: Respondent) -> Result<Respondent, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_session(&self, _session: Session) -> Result<Session, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn link_session(
        &self,
        _respondent_id: &RespondentId,
        _session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_respondent(&self, _id: &RespondentId) -> Result<Option<Respondent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_session(&self, _id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_session(&self, _session: Session) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_responses(&self, _batch: ResponseBatch) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_result(&self, _record: ResultRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_result(
        &self,
        _session_id: &SessionId,
        _instrument: Instrument,
    ) -> Result<Option<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn sessions_for(&self, _respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn responses_for(
        &self,
        _session_id: &SessionId,
    ) -> Result<Vec<ResponseBatch>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn results_for(&self, _session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProgress {
    attempts: Arc<Mutex<HashMap<SessionId, InProgressAttempt>>>,
}

impl MemoryProgress {
    pub(super) fn contains(&self, session_id: &SessionId) -> bool {
        self.attempts
            .lock()
            .expect("progress mutex poisoned")
            .contains_key(session_id)
    }
}

impl ProgressStore for MemoryProgress {
    fn save(
        &self,
        session_id: &SessionId,
        attempt: &InProgressAttempt,
    ) -> Result<(), ProgressError> {
        self.attempts
            .lock()
            .expect("progress mutex poisoned")
            .insert(session_id.clone(), attempt.clone());
        Ok(())
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<InProgressAttempt>, ProgressError> {
        Ok(self
            .attempts
            .lock()
            .expect("progress mutex poisoned")
            .get(session_id)
            .cloned())
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), ProgressError> {
        self.attempts
            .lock()
            .expect("progress mutex poisoned")
            .remove(session_id);
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
