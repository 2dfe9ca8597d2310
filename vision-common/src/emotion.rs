//! Emotion classification results.

use std::collections::BTreeMap;

use serde::Serialize;

/// Emotion label to confidence score.
///
/// Sorted by label so that serialized output and tie-breaking are stable.
pub type EmotionScores = BTreeMap<String, f64>;

/// Normalized result of classifying one face.
///
/// `emotion` is always the argmax of `scores` and `confidence` is always
/// `scores[emotion]`. The only way to build one is [`EmotionResult::from_scores`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionResult {
    emotion: String,
    scores: EmotionScores,
    confidence: f64,
}

impl EmotionResult {
    /// Derive the dominant label and its confidence from a score mapping.
    ///
    /// Returns `None` if `scores` is empty or holds a non-finite value. Ties
    /// go to the lexicographically smallest label.
    pub fn from_scores(scores: EmotionScores) -> Option<Self> {
        if scores.values().any(|s| !s.is_finite()) {
            return None;
        }

        let (emotion, confidence) = scores
            .iter()
            .fold(None::<(&String, f64)>, |best, (label, &score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((label, score)),
            })
            .map(|(label, score)| (label.clone(), score))?;

        Some(Self {
            emotion,
            scores,
            confidence,
        })
    }

    pub fn emotion(&self) -> &str {
        &self.emotion
    }

    pub fn scores(&self) -> &EmotionScores {
        &self.scores
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
