use super::domain::EiTier;

pub const STRENGTH_THRESHOLD: u32 = 35;
pub const NEEDS_ATTENTION_THRESHOLD: u32 = 18;

/// Lower bounds are inclusive: 35 is a strength, 18 needs attention.
pub fn classify_ei_score(score: u32) -> EiTier {
    if score >= STRENGTH_THRESHOLD {
        EiTier::Strength
    } else if score >= NEEDS_ATTENTION_THRESHOLD {
        EiTier::NeedsAttention
    } else {
        EiTier::DevelopmentPriority
    }
}

/// Category with the strictly highest score. Folds left to right, so on an exact tie the
/// category yielded first by `scores` wins; callers pass categories in `ordered()` order.
pub fn dominant_category<C, I>(scores: I) -> Option<C>
where
    C: Copy,
    I: IntoIterator<Item = (C, u32)>,
{
    scores
        .into_iter()
        .fold(None, |best: Option<(C, u32)>, (category, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((category, score)),
        })
        .map(|(category, _)| category)
}
