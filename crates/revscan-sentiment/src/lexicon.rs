//! Service-quality indicator words for contractor reviews.

/// Words and phrases that indicate a satisfied customer.
///
/// Matched as case-insensitive substrings, so "professional" also matches
/// inside "unprofessional". Scores count each term at most once.
pub(crate) const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "great",
    "amazing",
    "wonderful",
    "fantastic",
    "outstanding",
    "professional",
    "quality",
    "satisfied",
    "happy",
    "recommend",
    "perfect",
    "timely",
    "clean",
    "efficient",
    "responsive",
    "fair",
    "honest",
    "reliable",
    "exceeded",
    "pleased",
    "impressed",
    "awesome",
    "terrific",
    "superb",
    "expert",
    "skilled",
    "knowledgeable",
    "courteous",
    "polite",
    "helpful",
    "thorough",
    "complete",
    "well done",
    "top notch",
    "best",
    "love",
];

/// Words and phrases that indicate a dissatisfied customer.
pub(crate) const NEGATIVE_KEYWORDS: &[&str] = &[
    "poor",
    "terrible",
    "awful",
    "horrible",
    "disappointed",
    "unprofessional",
    "delayed",
    "messy",
    "unresponsive",
    "overpriced",
    "shoddy",
    "incomplete",
    "rude",
    "unreliable",
    "problem",
    "issue",
    "complaint",
    "unsatisfied",
    "worst",
    "bad",
    "avoid",
    "waste",
    "ripoff",
    "scam",
    "incompetent",
    "slow",
    "late",
    "damage",
    "broken",
    "failed",
    "mistake",
    "error",
    "unhappy",
    "frustrated",
    "angry",
    "disgusted",
];

/// Keyword hits for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordScore {
    pub positive: u32,
    pub negative: u32,
}

impl KeywordScore {
    /// Signed differential stored as a review's `sentiment_score`.
    #[must_use]
    pub fn differential(self) -> i32 {
        i32::try_from(self.positive).unwrap_or(i32::MAX)
            - i32::try_from(self.negative).unwrap_or(i32::MAX)
    }
}

fn count_present(text: &str, keywords: &[&str]) -> u32 {
    let hits = keywords.iter().filter(|k| text.contains(*k)).count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// Count how many positive and negative indicator terms appear in `text`.
///
/// Presence test per term: repeating a word does not raise the score.
#[must_use]
pub fn keyword_score(text: &str) -> KeywordScore {
    let lower = text.to_lowercase();
    KeywordScore {
        positive: count_present(&lower, POSITIVE_KEYWORDS),
        negative: count_present(&lower, NEGATIVE_KEYWORDS),
    }
}
