//! Shared fixtures for the integration suites: an in-memory repository and answer builders
//! that only touch the public crate surface.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use learnsight::assessment::{
    AssessmentRepository, AssessmentService, FileProgressStore, RegistrationForm, RepositoryError,
    Respondent, RespondentId, ResponseBatch, ResultRecord, Session, SessionId,
};
use learnsight::instruments::{
    EmotionalIntelligenceDraft, Instrument, InstrumentCatalog, LearningStyleDraft,
    SensoryPreferenceDraft,
};

pub type Service = AssessmentService<MemoryRepository, FileProgressStore>;

#[derive(Default)]
struct Tables {
    respondents: HashMap<RespondentId, Respondent>,
    sessions: HashMap<SessionId, Session>,
    responses: Vec<ResponseBatch>,
    results: Vec<ResultRecord>,
}

#[derive(Default, Clone)]
pub struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert_respondent(&self, respondent: Respondent) -> Result<Respondent, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard
            .respondents
            .insert(respondent.id.clone(), respondent.clone());
        Ok(respondent)
    }

    fn insert_session(&self, session: Session) -> Result<Session, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn link_session(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        let respondent = guard
            .respondents
            .get_mut(respondent_id)
            .ok_or(RepositoryError::NotFound)?;
        respondent.session_id = Some(session_id.clone());
        Ok(())
    }

    fn fetch_respondent(&self, id: &RespondentId) -> Result<Option<Respondent>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.respondents.get(id).cloned())
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.sessions.get(id).cloned())
    }

    fn update_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        match guard.sessions.get_mut(&session.id) {
            Some(existing) => {
                *existing = session;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn append_responses(&self, batch: ResponseBatch) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.responses.push(batch);
        Ok(())
    }

    fn insert_result(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.results.push(record);
        Ok(())
    }

    fn fetch_result(
        &self,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .results
            .iter()
            .find(|record| {
                &record.session_id == session_id && record.result.instrument() == instrument
            })
            .cloned())
    }

    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.respondents.values().cloned().collect())
    }

    fn sessions_for(&self, respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .sessions
            .values()
            .filter(|session| &session.respondent_id == respondent_id)
            .cloned()
            .collect())
    }

    fn responses_for(&self, session_id: &SessionId) -> Result<Vec<ResponseBatch>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .responses
            .iter()
            .filter(|batch| &batch.session_id == session_id)
            .cloned()
            .collect())
    }

    fn results_for(&self, session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .results
            .iter()
            .filter(|record| &record.session_id == session_id)
            .cloned()
            .collect())
    }
}

/// Service backed by memory tables and a file progress store rooted in `dir`.
pub fn service(dir: &std::path::Path) -> Service {
    let progress = FileProgressStore::new(dir.join("progress")).expect("progress dir created");
    AssessmentService::new(Arc::new(MemoryRepository::default()), Arc::new(progress))
}

pub fn form(name: &str, email: &str, course_id: &str, semester: i32) -> RegistrationForm {
    RegistrationForm {
        name: name.to_string(),
        email: email.to_string(),
        age: Some(21),
        gender: "Female".to_string(),
        city: "Bengaluru".to_string(),
        course_id: course_id.to_string(),
        semester: Some(semester),
    }
}

pub fn learning_style(codes: &[&str]) -> LearningStyleDraft {
    let total = InstrumentCatalog::standard().learning_style().len();
    (0..total)
        .map(|index| (index, codes[index % codes.len()].to_string()))
        .collect()
}

pub fn emotional_intelligence(rating: impl Fn(usize) -> i32) -> EmotionalIntelligenceDraft {
    let total = InstrumentCatalog::standard().emotional_intelligence().len();
    (0..total).map(|index| (index, rating(index))).collect()
}

/// Ranks every question's options 4, 3, 2, 1 in option order.
pub fn sensory_preference_descending() -> SensoryPreferenceDraft {
    let total = InstrumentCatalog::standard().sensory_preference().len();
    (0..total)
        .map(|question| {
            let ranks: BTreeMap<usize, i32> =
                (0..4).map(|option| (option, 4 - option as i32)).collect();
            (question, ranks)
        })
        .collect()
}
