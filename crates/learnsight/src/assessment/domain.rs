use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::instruments::{
    EiCategory, EiTier, EmotionalIntelligenceScores, Instrument, LearningStyle,
    LearningStyleScores, SensoryPreferenceScores, SensorySystem,
};

/// Identifier wrapper for registered respondents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RespondentId(pub String);

impl RespondentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a single assessment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated registration details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub name: String,
    pub email: String,
    pub age: u8,
    pub gender: String,
    pub city: String,
    pub course_id: String,
    pub course_name: String,
    pub semester: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: RespondentId,
    pub demographics: Demographics,
    pub created_at: DateTime<Utc>,
    pub session_id: Option<SessionId>,
}

/// Completion tracking for one attempt. Flags only ever move from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub respondent_id: RespondentId,
    pub token: String,
    pub vak_completed: bool,
    pub ei_completed: bool,
    pub rep_system_completed: bool,
    pub all_completed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn start(respondent_id: RespondentId, token: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            respondent_id,
            token,
            vak_completed: false,
            ei_completed: false,
            rep_system_completed: false,
            all_completed: false,
            started_at,
            completed_at: None,
        }
    }

    pub fn is_completed(&self, instrument: Instrument) -> bool {
        match instrument {
            Instrument::LearningStyle => self.vak_completed,
            Instrument::EmotionalIntelligence => self.ei_completed,
            Instrument::SensoryPreference => self.rep_system_completed,
        }
    }

    pub fn mark_completed(&mut self, instrument: Instrument) {
        match instrument {
            Instrument::LearningStyle => self.vak_completed = true,
            Instrument::EmotionalIntelligence => self.ei_completed = true,
            Instrument::SensoryPreference => self.rep_system_completed = true,
        }
    }

    pub fn instruments_completed(&self) -> bool {
        Instrument::ordered()
            .into_iter()
            .all(|instrument| self.is_completed(instrument))
    }

    pub fn completion(&self) -> QuizCompletion {
        QuizCompletion {
            vak_completed: self.vak_completed,
            ei_completed: self.ei_completed,
            rep_system_completed: self.rep_system_completed,
            all_completed: self.all_completed,
            completed_at: self.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCompletion {
    pub vak_completed: bool,
    pub ei_completed: bool,
    pub rep_system_completed: bool,
    pub all_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStyleResponse {
    pub question_number: usize,
    pub question_text: String,
    pub option_text: String,
    pub selected_value: LearningStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalIntelligenceResponse {
    pub statement_number: usize,
    pub statement_text: String,
    pub rating: u8,
    pub category: EiCategory,
}

/// One ranked question, pivoted so each representational system carries its rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryPreferenceResponse {
    pub question_number: usize,
    pub question_text: String,
    pub visual_rank: u8,
    pub auditory_rank: u8,
    pub kinesthetic_rank: u8,
    pub auditory_digital_rank: u8,
}

impl SensoryPreferenceResponse {
    pub fn rank_for(&self, system: SensorySystem) -> u8 {
        match system {
            SensorySystem::Visual => self.visual_rank,
            SensorySystem::Auditory => self.auditory_rank,
            SensorySystem::Kinesthetic => self.kinesthetic_rank,
            SensorySystem::AuditoryDigital => self.auditory_digital_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instrument", content = "responses", rename_all = "snake_case")]
pub enum InstrumentResponses {
    LearningStyle(Vec<LearningStyleResponse>),
    EmotionalIntelligence(Vec<EmotionalIntelligenceResponse>),
    SensoryPreference(Vec<SensoryPreferenceResponse>),
}

impl InstrumentResponses {
    pub fn instrument(&self) -> Instrument {
        match self {
            Self::LearningStyle(_) => Instrument::LearningStyle,
            Self::EmotionalIntelligence(_) => Instrument::EmotionalIntelligence,
            Self::SensoryPreference(_) => Instrument::SensoryPreference,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::LearningStyle(responses) => responses.len(),
            Self::EmotionalIntelligence(responses) => responses.len(),
            Self::SensoryPreference(responses) => responses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response rows appended for one instrument submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBatch {
    pub respondent_id: RespondentId,
    pub session_id: SessionId,
    pub responses: InstrumentResponses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStyleResult {
    pub scores: LearningStyleScores,
    pub dominant_style: LearningStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalIntelligenceResult {
    pub scores: EmotionalIntelligenceScores,
    pub classifications: BTreeMap<EiCategory, EiTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensoryPreferenceResult {
    pub scores: SensoryPreferenceScores,
    pub dominant_system: SensorySystem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instrument", rename_all = "snake_case")]
pub enum InstrumentResult {
    LearningStyle(LearningStyleResult),
    EmotionalIntelligence(EmotionalIntelligenceResult),
    SensoryPreference(SensoryPreferenceResult),
}

impl InstrumentResult {
    pub fn instrument(&self) -> Instrument {
        match self {
            Self::LearningStyle(_) => Instrument::LearningStyle,
            Self::EmotionalIntelligence(_) => Instrument::EmotionalIntelligence,
            Self::SensoryPreference(_) => Instrument::SensoryPreference,
        }
    }
}

/// Result row written once per respondent, session and instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub respondent_id: RespondentId,
    pub session_id: SessionId,
    pub recorded_at: DateTime<Utc>,
    pub result: InstrumentResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_flags_track_each_instrument() {
        let mut session = Session::start(
            RespondentId("r-1".to_string()),
            "session_1".to_string(),
            Utc::now(),
        );
        assert!(!session.instruments_completed());

        session.mark_completed(Instrument::LearningStyle);
        session.mark_completed(Instrument::EmotionalIntelligence);
        assert!(session.is_completed(Instrument::LearningStyle));
        assert!(!session.instruments_completed());

        session.mark_completed(Instrument::SensoryPreference);
        assert!(session.instruments_completed());
        assert!(!session.completion().all_completed);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(RespondentId::generate(), RespondentId::generate());
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
