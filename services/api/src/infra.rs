use chrono::NaiveDate;
use learnsight::assessment::{
    AssessmentRepository, FileProgressStore, InProgressAttempt, ProgressError, ProgressStore,
    RepositoryError, Respondent, RespondentId, ResponseBatch, ResultRecord, Session, SessionId,
};
use learnsight::instruments::Instrument;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct AssessmentTables {
    respondents: HashMap<RespondentId, Respondent>,
    sessions: HashMap<SessionId, Session>,
    responses: Vec<ResponseBatch>,
    results: Vec<ResultRecord>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    tables: Arc<Mutex<AssessmentTables>>,
}

impl InMemoryAssessmentRepository {
    fn lock(&self) -> Result<MutexGuard<'_, AssessmentTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert_respondent(&self, respondent: Respondent) -> Result<Respondent, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.respondents.contains_key(&respondent.id) {
            return Err(RepositoryError::Conflict);
        }
        guard
            .respondents
            .insert(respondent.id.clone(), respondent.clone());
        Ok(respondent)
    }

    fn insert_session(&self, session: Session) -> Result<Session, RepositoryError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
        match guard.respondents.get_mut(respondent_id) {
            Some(respondent) => {
                respondent.session_id = Some(session_id.clone());
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_respondent(&self, id: &RespondentId) -> Result<Option<Respondent>, RepositoryError> {
        Ok(self.lock()?.respondents.get(id).cloned())
    }

    fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Ok(self.lock()?.sessions.get(id).cloned())
    }

    fn update_session(&self, session: Session) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.sessions.contains_key(&session.id) {
            guard.sessions.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn append_responses(&self, batch: ResponseBatch) -> Result<(), RepositoryError> {
        self.lock()?.responses.push(batch);
        Ok(())
    }

    fn insert_result(&self, record: ResultRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let instrument = record.result.instrument();
        let exists = guard.results.iter().any(|existing| {
            existing.session_id == record.session_id && existing.result.instrument() == instrument
        });
        if exists {
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
        Ok(self
            .lock()?
            .results
            .iter()
            .find(|record| {
                &record.session_id == session_id && record.result.instrument() == instrument
            })
            .cloned())
    }

    fn respondents(&self) -> Result<Vec<Respondent>, RepositoryError> {
        Ok(self.lock()?.respondents.values().cloned().collect())
    }

    fn sessions_for(&self, respondent_id: &RespondentId) -> Result<Vec<Session>, RepositoryError> {
        Ok(self
            .lock()?
            .sessions
            .values()
            .filter(|session| &session.respondent_id == respondent_id)
            .cloned()
            .collect())
    }

    fn responses_for(&self, session_id: &SessionId) -> Result<Vec<ResponseBatch>, RepositoryError> {
        Ok(self
            .lock()?
            .responses
            .iter()
            .filter(|batch| &batch.session_id == session_id)
            .cloned()
            .collect())
    }

    fn results_for(&self, session_id: &SessionId) -> Result<Vec<ResultRecord>, RepositoryError> {
        Ok(self
            .lock()?
            .results
            .iter()
            .filter(|record| &record.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressStore {
    attempts: Arc<Mutex<HashMap<SessionId, InProgressAttempt>>>,
}

impl InMemoryProgressStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, InProgressAttempt>>, ProgressError> {
        self.attempts
            .lock()
            .map_err(|_| ProgressError::Unavailable("progress mutex poisoned".to_string()))
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn save(
        &self,
        session_id: &SessionId,
        attempt: &InProgressAttempt,
    ) -> Result<(), ProgressError> {
        self.lock()?.insert(session_id.clone(), attempt.clone());
        Ok(())
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<InProgressAttempt>, ProgressError> {
        Ok(self.lock()?.get(session_id).cloned())
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), ProgressError> {
        self.lock()?.remove(session_id);
        Ok(())
    }
}

/// Progress backend picked from `APP_PROGRESS_DIR`: files when set, memory otherwise.
#[derive(Clone)]
pub(crate) enum ConfiguredProgressStore {
    Memory(InMemoryProgressStore),
    File(FileProgressStore),
}

impl ConfiguredProgressStore {
    pub(crate) fn from_dir(dir: Option<PathBuf>) -> Result<Self, ProgressError> {
        match dir {
            Some(dir) => Ok(Self::File(FileProgressStore::new(dir)?)),
            None => Ok(Self::Memory(InMemoryProgressStore::default())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => store.root().display().to_string(),
        }
    }
}

impl ProgressStore for ConfiguredProgressStore {
    fn save(
        &self,
        session_id: &SessionId,
        attempt: &InProgressAttempt,
    ) -> Result<(), ProgressError> {
        match self {
            Self::Memory(store) => store.save(session_id, attempt),
            Self::File(store) => store.save(session_id, attempt),
        }
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<InProgressAttempt>, ProgressError> {
        match self {
            Self::Memory(store) => store.load(session_id),
            Self::File(store) => store.load(session_id),
        }
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), ProgressError> {
        match self {
            Self::Memory(store) => store.clear(session_id),
            Self::File(store) => store.clear(session_id),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_rejects_other_formats() {
        assert_eq!(
            parse_date(" 2025-03-14 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"))
        );
        assert!(parse_date("14/03/2025").is_err());
    }

    #[test]
    fn configured_store_uses_files_when_dir_given() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfiguredProgressStore::from_dir(Some(dir.path().join("progress")))
            .expect("file store opens");
        assert!(matches!(store, ConfiguredProgressStore::File(_)));

        let session_id = SessionId("session-1".to_string());
        let mut attempt = InProgressAttempt::default();
        attempt.rate_statement(0, 4);
        store.save(&session_id, &attempt).expect("saves");
        assert_eq!(store.load(&session_id).expect("loads"), Some(attempt));
        store.clear(&session_id).expect("clears");
        assert_eq!(store.load(&session_id).expect("loads"), None);
    }

    #[test]
    fn configured_store_defaults_to_memory() {
        let store = ConfiguredProgressStore::from_dir(None).expect("memory store");
        assert_eq!(store.describe(), "memory");
        let session_id = SessionId("session-2".to_string());
        assert_eq!(store.load(&session_id).expect("loads"), None);
    }
}
