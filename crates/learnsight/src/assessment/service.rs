use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::export::{
    build_export_rows, export_data, DashboardStats, ExportError, ExportFile, ExportRow,
    ExportType, RespondentFilter,
};
use crate::instruments::{
    score_emotional_intelligence, score_learning_style, score_sensory_preference,
    validate_emotional_intelligence, validate_learning_style, validate_sensory_preference,
    EmotionalIntelligenceDraft, Instrument, InstrumentCatalog, LearningStyleDraft, SensorySystem,
    SensoryPreferenceDraft, ValidationFailure,
};

use super::domain::{
    EmotionalIntelligenceResponse, EmotionalIntelligenceResult, InstrumentResponses,
    InstrumentResult, LearningStyleResponse, LearningStyleResult, QuizCompletion, Respondent,
    RespondentId, ResponseBatch, ResultRecord, SensoryPreferenceResponse,
    SensoryPreferenceResult, Session, SessionId,
};
use super::progress::{InProgressAttempt, ProgressError, ProgressStore};
use super::registration::{
    session_token, standard_courses, validate_registration, Course, RegistrationError,
    RegistrationForm,
};
use super::repository::{AssessmentRepository, RepositoryError};

/// Respondent and session created by a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub respondent: Respondent,
    pub session: Session,
}

/// Service composing the instrument catalog, repository, and progress store.
///
/// Submissions run as independent steps (responses, result, completion flag, overall
/// completion). A failure partway leaves the earlier steps committed.
pub struct AssessmentService<R, P> {
    catalog: Arc<InstrumentCatalog>,
    courses: Arc<Vec<Course>>,
    repository: Arc<R>,
    progress: Arc<P>,
}

impl<R, P> AssessmentService<R, P>
where
    R: AssessmentRepository + 'static,
    P: ProgressStore + 'static,
{
    pub fn new(repository: Arc<R>, progress: Arc<P>) -> Self {
        Self::with_catalog(
            InstrumentCatalog::standard(),
            standard_courses(),
            repository,
            progress,
        )
    }

    pub fn with_catalog(
        catalog: InstrumentCatalog,
        courses: Vec<Course>,
        repository: Arc<R>,
        progress: Arc<P>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            courses: Arc::new(courses),
            repository,
            progress,
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Validate the demographic form, then create the respondent and its session.
    pub fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<Registration, AssessmentServiceError> {
        let demographics = validate_registration(&form, &self.courses)?;
        let now = Utc::now();

        let respondent = self.repository.insert_respondent(Respondent {
            id: RespondentId::generate(),
            demographics,
            created_at: now,
            session_id: None,
        })?;
        let session = self.repository.insert_session(Session::start(
            respondent.id.clone(),
            session_token(now),
            now,
        ))?;
        self.repository.link_session(&respondent.id, &session.id)?;

        let respondent = Respondent {
            session_id: Some(session.id.clone()),
            ..respondent
        };
        info!(respondent_id = %respondent.id, session_id = %session.id, "respondent registered");

        Ok(Registration {
            respondent,
            session,
        })
    }

    pub fn submit_learning_style(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
        draft: &LearningStyleDraft,
    ) -> Result<LearningStyleResult, AssessmentServiceError> {
        let session = self.open_session(respondent_id, session_id, Instrument::LearningStyle)?;
        let questions = self.catalog.learning_style();
        let answers = validate_learning_style(draft, questions.len())?;

        let scores = score_learning_style(&answers);
        let result = LearningStyleResult {
            scores,
            dominant_style: scores.dominant(),
        };

        let responses = questions
            .iter()
            .zip(answers.as_slice())
            .enumerate()
            .map(|(index, (question, &style))| LearningStyleResponse {
                question_number: index + 1,
                question_text: question.text.to_string(),
                option_text: question
                    .option_for(style)
                    .map(|option| option.label.to_string())
                    .unwrap_or_default(),
                selected_value: style,
            })
            .collect();

        self.record_submission(
            session,
            InstrumentResponses::LearningStyle(responses),
            InstrumentResult::LearningStyle(result.clone()),
        )?;
        Ok(result)
    }

    pub fn submit_emotional_intelligence(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
        draft: &EmotionalIntelligenceDraft,
    ) -> Result<EmotionalIntelligenceResult, AssessmentServiceError> {
        let session =
            self.open_session(respondent_id, session_id, Instrument::EmotionalIntelligence)?;
        let statements = self.catalog.emotional_intelligence();
        let answers = validate_emotional_intelligence(draft, statements.len())?;

        let scores = score_emotional_intelligence(&answers, &self.catalog);
        let result = EmotionalIntelligenceResult {
            classifications: scores.classifications(),
            scores,
        };

        let responses = statements
            .iter()
            .zip(answers.as_slice())
            .enumerate()
            .map(|(index, (statement, &rating))| EmotionalIntelligenceResponse {
                statement_number: index + 1,
                statement_text: statement.text.to_string(),
                rating,
                category: statement.category,
            })
            .collect();

        self.record_submission(
            session,
            InstrumentResponses::EmotionalIntelligence(responses),
            InstrumentResult::EmotionalIntelligence(result.clone()),
        )?;
        Ok(result)
    }

    pub fn submit_sensory_preference(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
        draft: &SensoryPreferenceDraft,
    ) -> Result<SensoryPreferenceResult, AssessmentServiceError> {
        let session =
            self.open_session(respondent_id, session_id, Instrument::SensoryPreference)?;
        let questions = self.catalog.sensory_preference();
        let answers = validate_sensory_preference(draft, questions.len())?;

        let scores = score_sensory_preference(&answers, &self.catalog);
        let result = SensoryPreferenceResult {
            scores,
            dominant_system: scores.dominant(),
        };

        let responses = questions
            .iter()
            .zip(answers.question_ranks())
            .enumerate()
            .map(|(index, (question, ranks))| {
                let rank_of = |system: SensorySystem| {
                    question
                        .option_index_for(system)
                        .map_or(0, |option| ranks[option])
                };
                SensoryPreferenceResponse {
                    question_number: index + 1,
                    question_text: question.text.to_string(),
                    visual_rank: rank_of(SensorySystem::Visual),
                    auditory_rank: rank_of(SensorySystem::Auditory),
                    kinesthetic_rank: rank_of(SensorySystem::Kinesthetic),
                    auditory_digital_rank: rank_of(SensorySystem::AuditoryDigital),
                }
            })
            .collect();

        self.record_submission(
            session,
            InstrumentResponses::SensoryPreference(responses),
            InstrumentResult::SensoryPreference(result.clone()),
        )?;
        Ok(result)
    }

    /// Set `all_completed` once every instrument flag is true. The completion timestamp is
    /// stamped on the first transition only; later calls leave the session untouched.
    pub fn update_overall_completion(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<QuizCompletion, AssessmentServiceError> {
        let mut session = self.session_for(respondent_id, session_id)?;

        if session.all_completed {
            debug!(session_id = %session.id, "session already marked all_completed");
            return Ok(session.completion());
        }
        if !session.instruments_completed() {
            debug!(session_id = %session.id, "session not yet all_completed");
            return Ok(session.completion());
        }

        session.all_completed = true;
        session.completed_at = Some(Utc::now());
        self.repository.update_session(session.clone())?;
        info!(session_id = %session.id, "session marked all_completed");

        Ok(session.completion())
    }

    pub fn completion(
        &self,
        session_id: &SessionId,
    ) -> Result<QuizCompletion, AssessmentServiceError> {
        let session = self
            .repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session.completion())
    }

    /// Stored results for a session, in instrument order.
    pub fn results(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<InstrumentResult>, AssessmentServiceError> {
        self.repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        let mut records = self.repository.results_for(session_id)?;
        records.sort_by_key(|record| record.result.instrument());
        Ok(records.into_iter().map(|record| record.result).collect())
    }

    pub fn save_progress(
        &self,
        session_id: &SessionId,
        attempt: &InProgressAttempt,
    ) -> Result<(), AssessmentServiceError> {
        self.repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        self.progress.save(session_id, attempt)?;
        Ok(())
    }

    pub fn load_progress(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<InProgressAttempt>, AssessmentServiceError> {
        self.repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.progress.load(session_id)?)
    }

    pub fn clear_progress(&self, session_id: &SessionId) -> Result<(), AssessmentServiceError> {
        self.repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.progress.clear(session_id)?)
    }

    /// Wide respondent rows joined across every instrument.
    pub fn export_rows(&self) -> Result<Vec<ExportRow>, AssessmentServiceError> {
        Ok(build_export_rows(self.repository.as_ref())?)
    }

    pub fn export(
        &self,
        export_type: ExportType,
        filter: &RespondentFilter,
        today: NaiveDate,
    ) -> Result<ExportFile, AssessmentServiceError> {
        let rows = filter.apply(self.export_rows()?);
        let file = export_data(export_type, &rows, &self.catalog, today)?;
        info!(
            export_type = export_type.label(),
            rows = rows.len(),
            filename = %file.filename,
            "export generated"
        );
        Ok(file)
    }

    pub fn dashboard_stats(
        &self,
        filter: &RespondentFilter,
    ) -> Result<DashboardStats, AssessmentServiceError> {
        let rows = filter.apply(self.export_rows()?);
        Ok(DashboardStats::from_rows(&rows))
    }

    fn session_for(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
    ) -> Result<Session, AssessmentServiceError> {
        let session = self
            .repository
            .fetch_session(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        if &session.respondent_id != respondent_id {
            return Err(AssessmentServiceError::SessionMismatch);
        }
        Ok(session)
    }

    fn open_session(
        &self,
        respondent_id: &RespondentId,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<Session, AssessmentServiceError> {
        let session = self.session_for(respondent_id, session_id)?;
        if session.is_completed(instrument)
            || self
                .repository
                .fetch_result(session_id, instrument)?
                .is_some()
        {
            warn!(%session_id, %instrument, "rejected duplicate submission");
            return Err(AssessmentServiceError::AlreadySubmitted { instrument });
        }
        Ok(session)
    }

    /// Remove the submitted instrument's draft; drop the snapshot once nothing is left.
    fn settle_progress(
        &self,
        session_id: &SessionId,
        instrument: Instrument,
    ) -> Result<(), ProgressError> {
        let Some(mut attempt) = self.progress.load(session_id)? else {
            return Ok(());
        };
        attempt.discard(instrument);
        if attempt.is_empty() {
            self.progress.clear(session_id)
        } else {
            self.progress.save(session_id, &attempt)
        }
    }

    fn record_submission(
        &self,
        mut session: Session,
        responses: InstrumentResponses,
        result: InstrumentResult,
    ) -> Result<(), AssessmentServiceError> {
        let instrument = result.instrument();

        self.repository.append_responses(ResponseBatch {
            respondent_id: session.respondent_id.clone(),
            session_id: session.id.clone(),
            responses,
        })?;
        self.repository.insert_result(ResultRecord {
            respondent_id: session.respondent_id.clone(),
            session_id: session.id.clone(),
            recorded_at: Utc::now(),
            result,
        })?;

        session.mark_completed(instrument);
        self.repository.update_session(session.clone())?;
        self.update_overall_completion(&session.respondent_id, &session.id)?;

        if let Err(err) = self.settle_progress(&session.id, instrument) {
            warn!(session_id = %session.id, error = %err, "failed to update saved progress");
        }

        info!(
            respondent_id = %session.respondent_id,
            session_id = %session.id,
            %instrument,
            "instrument submitted"
        );
        Ok(())
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("{instrument} has already been submitted for this session")]
    AlreadySubmitted { instrument: Instrument },
    #[error("session does not belong to this respondent")]
    SessionMismatch,
}
