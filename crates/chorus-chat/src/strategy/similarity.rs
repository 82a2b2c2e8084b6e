//! Jaccard nearest-neighbour lookup over logged inputs.

use std::collections::HashSet;

use chorus_core::types::ConversationRecord;

use super::tokenize;

/// Reply of the `simple_ai` bot when nothing matches. The trailing space is
/// part of the string legacy clients receive.
pub const SIMPLE_AI_REPLY: &str = "I'm learning to respond better. ";

/// Jaccard similarity of two token sets: |A ∩ B| / |A ∪ B|.
///
/// Two empty sets score 0.0 so an empty logged input is never a best match.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Returns the response of the logged exchange whose input best matches the
/// query, if it clears `threshold`.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    /// Best score must be strictly greater than this.
    pub threshold: f64,
    /// Reply when the corpus is empty.
    pub empty_reply: &'static str,
    /// Reply when nothing clears the threshold.
    pub fallback_reply: &'static str,
}

impl SimilarityMatcher {
    /// Settings for the `similarity_learner` bot.
    pub fn similarity_bot() -> Self {
        Self {
            threshold: 0.2,
            empty_reply: "Learning from conversations...",
            fallback_reply: "I'm still learning about this topic.",
        }
    }

    /// Settings for the `simple_ai` bot.
    pub fn simple_ai() -> Self {
        Self {
            threshold: 0.3,
            empty_reply: SIMPLE_AI_REPLY,
            fallback_reply: SIMPLE_AI_REPLY,
        }
    }

    /// Highest-scoring record and its score. Earlier records win ties.
    pub fn best_match<'a>(
        &self,
        input: &str,
        corpus: &'a [ConversationRecord],
    ) -> Option<(&'a ConversationRecord, f64)> {
        let query = token_set(input);
        let mut best: Option<(&ConversationRecord, f64)> = None;

        for record in corpus {
            let score = jaccard(&query, &token_set(&record.input));
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((record, score)),
            }
        }
        best
    }

    pub fn respond(&self, input: &str, corpus: &[ConversationRecord]) -> String {
        match self.best_match(input, corpus) {
            None => self.empty_reply.to_string(),
            Some((record, score)) if score > self.threshold => record.response.clone(),
            Some(_) => self.fallback_reply.to_string(),
        }
    }
}
