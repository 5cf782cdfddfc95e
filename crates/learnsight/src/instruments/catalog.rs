use super::domain::{EiCategory, LearningStyle, SensorySystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningStyleOption {
    pub label: &'static str,
    pub style: LearningStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningStyleQuestion {
    pub text: &'static str,
    pub options: [LearningStyleOption; 3],
}

impl LearningStyleQuestion {
    pub fn option_for(&self, style: LearningStyle) -> Option<&LearningStyleOption> {
        self.options.iter().find(|option| option.style == style)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EiStatement {
    pub text: &'static str,
    pub category: EiCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensoryOption {
    pub text: &'static str,
    pub system: SensorySystem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensoryQuestion {
    pub text: &'static str,
    pub options: [SensoryOption; 4],
}

impl SensoryQuestion {
    /// Option index tagged with `system`, used to pivot per-option ranks into per-system ranks.
    pub fn option_index_for(&self, system: SensorySystem) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.system == system)
    }
}

/// Static question catalogs for all three instruments.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    learning_style: Vec<LearningStyleQuestion>,
    emotional_intelligence: Vec<EiStatement>,
    sensory_preference: Vec<SensoryQuestion>,
}

impl InstrumentCatalog {
    pub fn standard() -> Self {
        Self {
            learning_style: standard_learning_style_questions(),
            emotional_intelligence: standard_ei_statements(),
            sensory_preference: standard_sensory_questions(),
        }
    }

    pub fn new(
        learning_style: Vec<LearningStyleQuestion>,
        emotional_intelligence: Vec<EiStatement>,
        sensory_preference: Vec<SensoryQuestion>,
    ) -> Self {
        Self {
            learning_style,
            emotional_intelligence,
            sensory_preference,
        }
    }

    pub fn learning_style(&self) -> &[LearningStyleQuestion] {
        &self.learning_style
    }

    pub fn emotional_intelligence(&self) -> &[EiStatement] {
        &self.emotional_intelligence
    }

    pub fn sensory_preference(&self) -> &[SensoryQuestion] {
        &self.sensory_preference
    }

    /// One-based statement numbers belonging to `category`.
    pub fn statement_numbers(&self, category: EiCategory) -> Vec<usize> {
        self.emotional_intelligence
            .iter()
            .enumerate()
            .filter(|(_, statement)| statement.category == category)
            .map(|(index, _)| index + 1)
            .collect()
    }
}

fn standard_learning_style_questions() -> Vec<LearningStyleQuestion> {
    use LearningStyle::{Auditory as A, Kinesthetic as K, Visual as V};

    let question = |text, options: [(&'static str, LearningStyle); 3]| LearningStyleQuestion {
        text,
        options: options.map(|(label, style)| LearningStyleOption { label, style }),
    };

    vec![
        question(
            "I make important decisions based on:",
            [
                ("Following my gut feelings", K),
                ("The options that sound best", A),
                ("What looks right to me", V),
            ],
        ),
        question(
            "When I attend a meeting or presentation, I consider it successful when people have:",
            [
                ("Illustrated the key points clearly", V),
                ("Articulated a sound argument", A),
                ("Grasped the real issues", K),
            ],
        ),
        question(
            "People know when I'm having a good or bad day by:",
            [
                ("The way I dress and look", V),
                ("The thoughts and feelings I share", K),
                ("The tone of my voice", A),
            ],
        ),
        question(
            "If I have a disagreement, I'm most influenced by:",
            [
                ("The sound of the other person's voice", A),
                ("How that person looks at me", V),
                ("Connecting with that person's feelings", K),
            ],
        ),
        question(
            "I'm very aware of:",
            [
                ("The sounds and noises around me", A),
                ("The touch of different clothes on my body", K),
                ("The colours and shapes in my surroundings", V),
            ],
        ),
    ]
}

const EI_STATEMENT_TEXT: [&str; 50] = [
    "I realise immediately when I lose my temper",
    "I can 'reframe' bad situations quickly",
    "I am able to always motivate myself to do difficult tasks",
    "I am always able to see things from the other person's viewpoint",
    "I am an excellent listener",
    "I know when I am happy",
    "I do not wear my 'heart on my sleeve'",
    "I am usually able to prioritise important activities at work and get on with them",
    "I am excellent at empathising with someone else's problem",
    "I never interrupt other people's conversations",
    "I usually recognise when I am stressed",
    "Others can rarely tell what kind of mood I am in",
    "I always meet deadlines",
    "I can tell if someone is not happy with me",
    "I am good at adapting and mixing with a variety of people",
    "When I am being 'emotional' I am aware of this",
    "I rarely 'fly off the handle' at other people",
    "I never waste time",
    "I can tell if a team of people are not getting along with each other",
    "People are the most interesting thing in life for me",
    "When I feel anxious I usually can account for the reason(s)",
    "Difficult people do not annoy me",
    "I do not prevaricate",
    "I can usually understand why people are being difficult towards me",
    "I love to meet new people and get to know what makes them 'tick'",
    "I always know when I'm being unreasonable",
    "I can consciously alter my frame of mind or mood",
    "I believe you should do the difficult things first",
    "Other individuals are not 'difficult' just 'different'",
    "I need a variety of work colleagues to make my job interesting",
    "Awareness of my own emotions is very important to me at all times",
    "I do not let stressful situations or people affect me once I have left work",
    "Delayed gratification is a virtue that I hold to",
    "I can understand if I am being unreasonable",
    "I like to ask questions to find out what it is important to people",
    "I can tell if someone has upset or annoyed me",
    "I rarely worry about work or life in general",
    "I believe in 'Action this Day'",
    "I can understand why my actions sometimes offend others",
    "I see working with difficult people as simply a challenge to win them over",
    "I can let anger 'go' quickly so that it no longer affects me",
    "I can suppress my emotions when I need to",
    "I can always motivate myself even when I feel low",
    "I can sometimes see things from others' point of view",
    "I am good at reconciling differences with other people",
    "I know what makes me happy",
    "Others often do not know how I am feeling about things",
    "Motivation has been the key to my success",
    "Reasons for disagreements are always clear to me",
    "I generally build solid relationships with those I work with",
];

// Statements cycle through the five competencies: 1, 6, 11, ... are self-awareness items.
fn standard_ei_statements() -> Vec<EiStatement> {
    let categories = EiCategory::ordered();
    EI_STATEMENT_TEXT
        .into_iter()
        .enumerate()
        .map(|(index, text)| EiStatement {
            text,
            category: categories[index % categories.len()],
        })
        .collect()
}

fn standard_sensory_questions() -> Vec<SensoryQuestion> {
    use SensorySystem::{Auditory as A, AuditoryDigital as Ad, Kinesthetic as K, Visual as V};

    let question = |text, options: [(&'static str, SensorySystem); 4]| SensoryQuestion {
        text,
        options: options.map(|(text, system)| SensoryOption { text, system }),
    };

    vec![
        question(
            "I make important decisions based on:",
            [
                ("the right gut level feelings", K),
                ("which way sounds the best and resonates for you", A),
                ("what looks best to me after clearly seeing the issues", V),
                ("precise review and study of the issues", Ad),
            ],
        ),
        question(
            "During an argument, I am most likely to be influenced by:",
            [
                ("the loudness or softness of the other person's tone of voice", A),
                ("whether or not I can see the other person's point of view", V),
                ("the logic of the other person's argument", Ad),
                ("whether or not I am in touch with the other person's feelings", K),
            ],
        ),
        question(
            "I mostly like to be aware of the following in conversation:",
            [
                ("the way people hold themselves and interesting facial expressions", V),
                ("the beautiful feelings they and I share", K),
                ("the words I and they choose and whether it all makes good sense", Ad),
                ("the sounds and intonations that come from the lovely tone of voice", A),
            ],
        ),
        question(
            "If I had the choice of these in order, first I would like to:",
            [
                ("find the ideal volume and tuning on a stereo system", A),
                ("select the most intellectually relevant point in an interesting subject", Ad),
                ("select the most comfortable furniture", K),
                (
                    "look around and take in the décor, pictures and how the room looks before doing anything else",
                    V,
                ),
            ],
        ),
        question(
            "Which describes your room that you live in:",
            [
                ("The hi-fi is very prominent and you have an excellent collection", A),
                ("It's a practical layout and things are situated in an excellent location", Ad),
                ("The feel of the place is the most important to you", K),
                ("The colours you choose and the way a room looks are most important", V),
            ],
        ),
    ]
}
