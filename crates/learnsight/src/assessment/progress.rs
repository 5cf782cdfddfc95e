use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::instruments::{
    EmotionalIntelligenceDraft, Instrument, LearningStyleDraft, SensoryPreferenceDraft,
};

use super::domain::SessionId;

/// Cursor plus answers for one instrument that is still being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionProgress<A> {
    pub position: usize,
    pub answers: A,
}

impl<A> QuestionProgress<A> {
    pub fn advance(&mut self, total: usize) {
        if self.position + 1 < total {
            self.position += 1;
        }
    }

    pub fn back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }
}

/// Serializable snapshot of everything a respondent has answered but not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InProgressAttempt {
    #[serde(default)]
    pub learning_style: QuestionProgress<LearningStyleDraft>,
    #[serde(default)]
    pub emotional_intelligence: QuestionProgress<EmotionalIntelligenceDraft>,
    #[serde(default)]
    pub sensory_preference: QuestionProgress<SensoryPreferenceDraft>,
}

impl InProgressAttempt {
    pub fn select_style(&mut self, question: usize, code: impl Into<String>) {
        self.learning_style.answers.insert(question, code.into());
    }

    pub fn rate_statement(&mut self, statement: usize, rating: i32) {
        self.emotional_intelligence
            .answers
            .insert(statement, rating);
    }

    /// Give `option` the `rank` on `question`. Any other option already holding that rank
    /// on the same question loses it, so a question never carries duplicate ranks.
    pub fn assign_rank(&mut self, question: usize, option: usize, rank: i32) {
        let rankings: &mut BTreeMap<usize, i32> = self
            .sensory_preference
            .answers
            .entry(question)
            .or_default();
        rankings.retain(|&other, &mut held| other == option || held != rank);
        rankings.insert(option, rank);
    }

    /// Drop the draft for one instrument, leaving the others untouched.
    pub fn discard(&mut self, instrument: Instrument) {
        match instrument {
            Instrument::LearningStyle => self.learning_style = QuestionProgress::default(),
            Instrument::EmotionalIntelligence => {
                self.emotional_intelligence = QuestionProgress::default()
            }
            Instrument::SensoryPreference => {
                self.sensory_preference = QuestionProgress::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.learning_style.answers.is_empty()
            && self.emotional_intelligence.answers.is_empty()
            && self.sensory_preference.answers.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("progress key '{0}' contains unsupported characters")]
    InvalidKey(String),
    #[error("progress storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress snapshot is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("progress store unavailable: {0}")]
    Unavailable(String),
}

/// Explicit save/load of in-progress attempts keyed by session id.
pub trait ProgressStore: Send + Sync {
    fn save(&self, session_id: &SessionId, attempt: &InProgressAttempt)
        -> Result<(), ProgressError>;
    fn load(&self, session_id: &SessionId) -> Result<Option<InProgressAttempt>, ProgressError>;
    fn clear(&self, session_id: &SessionId) -> Result<(), ProgressError>;
}

/// Stores one JSON document per session under a root directory.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    root: PathBuf,
}

impl FileProgressStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ProgressError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, session_id: &SessionId) -> Result<PathBuf, ProgressError> {
        let key = session_id.0.as_str();
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(ProgressError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("progress_{key}.json")))
    }
}

impl ProgressStore for FileProgressStore {
    fn save(
        &self,
        session_id: &SessionId,
        attempt: &InProgressAttempt,
    ) -> Result<(), ProgressError> {
        let path = self.path_for(session_id)?;
        let payload = serde_json::to_vec_pretty(attempt)?;
        fs::write(path, payload)?;
        Ok(())
    }

    fn load(&self, session_id: &SessionId) -> Result<Option<InProgressAttempt>, ProgressError> {
        let path = self.path_for(session_id)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self, session_id: &SessionId) -> Result<(), ProgressError> {
        let path = self.path_for(session_id)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionId {
        SessionId("0b6f3c52-4f4e-4a57-9f0e-3b2d1c0a9e88".to_string())
    }

    #[test]
    fn assigning_a_held_rank_clears_the_previous_holder() {
        let mut attempt = InProgressAttempt::default();
        attempt.assign_rank(0, 0, 1);
        attempt.assign_rank(0, 1, 2);
        attempt.assign_rank(0, 2, 1);

        let rankings = &attempt.sensory_preference.answers[&0];
        assert_eq!(rankings.get(&0), None);
        assert_eq!(rankings.get(&1), Some(&2));
        assert_eq!(rankings.get(&2), Some(&1));
    }

    #[test]
    fn reassigning_an_option_replaces_its_rank() {
        let mut attempt = InProgressAttempt::default();
        attempt.assign_rank(1, 3, 4);
        attempt.assign_rank(1, 3, 2);
        assert_eq!(attempt.sensory_preference.answers[&1].len(), 1);
        assert_eq!(attempt.sensory_preference.answers[&1][&3], 2);
    }

    #[test]
    fn discarding_one_instrument_keeps_the_others() {
        let mut attempt = InProgressAttempt::default();
        attempt.select_style(1, "A");
        attempt.rate_statement(0, 2);
        attempt.discard(Instrument::LearningStyle);

        assert!(attempt.learning_style.answers.is_empty());
        assert_eq!(attempt.emotional_intelligence.answers.get(&0), Some(&2));
        assert!(!attempt.is_empty());

        attempt.discard(Instrument::EmotionalIntelligence);
        assert!(attempt.is_empty());
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut progress = QuestionProgress::<LearningStyleDraft>::default();
        progress.back();
        assert_eq!(progress.position, 0);
        progress.advance(2);
        progress.advance(2);
        assert_eq!(progress.position, 1);
    }

    #[test]
    fn file_store_round_trips_attempts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileProgressStore::new(dir.path().join("progress")).expect("store");

        assert!(store.load(&session()).expect("load").is_none());

        let mut attempt = InProgressAttempt::default();
        attempt.select_style(0, "V");
        attempt.rate_statement(4, 5);
        attempt.assign_rank(2, 1, 3);
        attempt.sensory_preference.position = 2;
        store.save(&session(), &attempt).expect("save");

        let loaded = store.load(&session()).expect("load").expect("present");
        assert_eq!(loaded, attempt);

        store.clear(&session()).expect("clear");
        assert!(store.load(&session()).expect("load").is_none());
        store.clear(&session()).expect("clearing twice is fine");
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileProgressStore::new(dir.path()).expect("store");
        let result = store.save(
            &SessionId("../escape".to_string()),
            &InProgressAttempt::default(),
        );
        assert!(matches!(result, Err(ProgressError::InvalidKey(_))));
    }
}
