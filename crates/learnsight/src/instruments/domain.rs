use serde::{Deserialize, Serialize};
use std::fmt;

/// The three assessments a respondent completes, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    LearningStyle,
    EmotionalIntelligence,
    SensoryPreference,
}

impl Instrument {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::LearningStyle,
            Self::EmotionalIntelligence,
            Self::SensoryPreference,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LearningStyle => "VAK Learning Style",
            Self::EmotionalIntelligence => "Emotional Intelligence",
            Self::SensoryPreference => "Representational System",
        }
    }

    /// Column prefix used by the export field naming convention.
    pub const fn field_prefix(self) -> &'static str {
        match self {
            Self::LearningStyle => "vak",
            Self::EmotionalIntelligence => "ei",
            Self::SensoryPreference => "rep",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Learning-style categories, enumerated in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LearningStyle {
    #[serde(rename = "V")]
    Visual,
    #[serde(rename = "A")]
    Auditory,
    #[serde(rename = "K")]
    Kinesthetic,
}

impl LearningStyle {
    pub const fn ordered() -> [Self; 3] {
        [Self::Visual, Self::Auditory, Self::Kinesthetic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Auditory => "Auditory",
            Self::Kinesthetic => "Kinesthetic",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Visual => "V",
            Self::Auditory => "A",
            Self::Kinesthetic => "K",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|style| style.code() == code.trim())
    }

    pub const fn field_key(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
        }
    }
}

/// Representational systems scored by the sensory-preference ranking inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorySystem {
    #[serde(rename = "V")]
    Visual,
    #[serde(rename = "A")]
    Auditory,
    #[serde(rename = "K")]
    Kinesthetic,
    #[serde(rename = "Ad")]
    AuditoryDigital,
}

impl SensorySystem {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Visual,
            Self::Auditory,
            Self::Kinesthetic,
            Self::AuditoryDigital,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Auditory => "Auditory",
            Self::Kinesthetic => "Kinesthetic",
            Self::AuditoryDigital => "Auditory Digital",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Visual => "V",
            Self::Auditory => "A",
            Self::Kinesthetic => "K",
            Self::AuditoryDigital => "Ad",
        }
    }

    /// Snake-case stem shared by the rank and score export columns.
    pub const fn field_key(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::AuditoryDigital => "auditory_digital",
        }
    }
}

/// Emotional-intelligence competencies. Statement membership is fixed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EiCategory {
    SelfAwareness,
    ManagingEmotions,
    MotivatingOneself,
    Empathy,
    SocialSkill,
}

impl EiCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::SelfAwareness,
            Self::ManagingEmotions,
            Self::MotivatingOneself,
            Self::Empathy,
            Self::SocialSkill,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfAwareness => "Self-awareness",
            Self::ManagingEmotions => "Managing emotions",
            Self::MotivatingOneself => "Motivating oneself",
            Self::Empathy => "Empathy",
            Self::SocialSkill => "Social skill",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::SelfAwareness => "SA",
            Self::ManagingEmotions => "ME",
            Self::MotivatingOneself => "MO",
            Self::Empathy => "E",
            Self::SocialSkill => "SS",
        }
    }

    pub const fn field_key(self) -> &'static str {
        match self {
            Self::SelfAwareness => "self_awareness",
            Self::ManagingEmotions => "managing_emotions",
            Self::MotivatingOneself => "motivating_oneself",
            Self::Empathy => "empathy",
            Self::SocialSkill => "social_skill",
        }
    }
}

/// Qualitative tier assigned to an emotional-intelligence category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EiTier {
    Strength,
    NeedsAttention,
    DevelopmentPriority,
}

impl EiTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::NeedsAttention => "Needs attention",
            Self::DevelopmentPriority => "Development priority",
        }
    }
}
