use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::InstrumentCatalog;
use super::classify::{classify_ei_score, dominant_category};
use super::domain::{EiCategory, EiTier, LearningStyle, SensorySystem};
use super::validation::{
    EmotionalIntelligenceAnswers, LearningStyleAnswers, SensoryPreferenceAnswers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LearningStyleScores {
    pub visual: u32,
    pub auditory: u32,
    pub kinesthetic: u32,
}

impl LearningStyleScores {
    pub fn score(&self, style: LearningStyle) -> u32 {
        match style {
            LearningStyle::Visual => self.visual,
            LearningStyle::Auditory => self.auditory,
            LearningStyle::Kinesthetic => self.kinesthetic,
        }
    }

    fn score_mut(&mut self, style: LearningStyle) -> &mut u32 {
        match style {
            LearningStyle::Visual => &mut self.visual,
            LearningStyle::Auditory => &mut self.auditory,
            LearningStyle::Kinesthetic => &mut self.kinesthetic,
        }
    }

    pub fn entries(&self) -> [(LearningStyle, u32); 3] {
        LearningStyle::ordered().map(|style| (style, self.score(style)))
    }

    pub fn total(&self) -> u32 {
        self.visual + self.auditory + self.kinesthetic
    }

    pub fn dominant(&self) -> LearningStyle {
        dominant_category(self.entries()).unwrap_or(LearningStyle::Visual)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionalIntelligenceScores {
    pub categories: BTreeMap<EiCategory, u32>,
    pub total: u32,
}

impl EmotionalIntelligenceScores {
    pub fn score(&self, category: EiCategory) -> u32 {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn classification(&self, category: EiCategory) -> EiTier {
        classify_ei_score(self.score(category))
    }

    pub fn classifications(&self) -> BTreeMap<EiCategory, EiTier> {
        EiCategory::ordered()
            .into_iter()
            .map(|category| (category, self.classification(category)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensoryPreferenceScores {
    pub visual: u32,
    pub auditory: u32,
    pub kinesthetic: u32,
    pub auditory_digital: u32,
}

impl SensoryPreferenceScores {
    pub fn score(&self, system: SensorySystem) -> u32 {
        match system {
            SensorySystem::Visual => self.visual,
            SensorySystem::Auditory => self.auditory,
            SensorySystem::Kinesthetic => self.kinesthetic,
            SensorySystem::AuditoryDigital => self.auditory_digital,
        }
    }

    fn score_mut(&mut self, system: SensorySystem) -> &mut u32 {
        match system {
            SensorySystem::Visual => &mut self.visual,
            SensorySystem::Auditory => &mut self.auditory,
            SensorySystem::Kinesthetic => &mut self.kinesthetic,
            SensorySystem::AuditoryDigital => &mut self.auditory_digital,
        }
    }

    pub fn entries(&self) -> [(SensorySystem, u32); 4] {
        SensorySystem::ordered().map(|system| (system, self.score(system)))
    }

    pub fn dominant(&self) -> SensorySystem {
        dominant_category(self.entries()).unwrap_or(SensorySystem::Visual)
    }
}

/// Points awarded for a rank: 1 (most descriptive) earns 4, 4 (least) earns 1.
pub const fn rank_points(rank: u8) -> u32 {
    5u32.saturating_sub(rank as u32)
}

pub fn score_learning_style(answers: &LearningStyleAnswers) -> LearningStyleScores {
    answers
        .as_slice()
        .iter()
        .fold(LearningStyleScores::default(), |mut scores, &style| {
            *scores.score_mut(style) += 1;
            scores
        })
}

pub fn score_emotional_intelligence(
    answers: &EmotionalIntelligenceAnswers,
    catalog: &InstrumentCatalog,
) -> EmotionalIntelligenceScores {
    let mut categories: BTreeMap<EiCategory, u32> = EiCategory::ordered()
        .into_iter()
        .map(|category| (category, 0))
        .collect();

    for (index, statement) in catalog.emotional_intelligence().iter().enumerate() {
        let rating = answers.rating(index).unwrap_or(0);
        *categories.entry(statement.category).or_insert(0) += u32::from(rating);
    }

    let total = categories.values().sum();
    EmotionalIntelligenceScores { categories, total }
}

pub fn score_sensory_preference(
    answers: &SensoryPreferenceAnswers,
    catalog: &InstrumentCatalog,
) -> SensoryPreferenceScores {
    let mut scores = SensoryPreferenceScores::default();

    for (ranks, question) in answers
        .question_ranks()
        .iter()
        .zip(catalog.sensory_preference())
    {
        for (rank, option) in ranks.iter().zip(question.options.iter()) {
            *scores.score_mut(option.system) += rank_points(*rank);
        }
    }

    scores
}
