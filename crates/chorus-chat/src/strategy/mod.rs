//! Response strategies, one per bot learning type.
//!
//! A strategy maps `(input, corpus)` to a reply and never fails: the worst
//! case is a fixed fallback string. Strategies with derived state (the Markov
//! chain) rebuild it in [`Strategy::reload`].

pub mod markov;
pub mod neural;
pub mod pattern;
pub mod similarity;

use chorus_core::types::{ConversationRecord, LearningType};

use crate::random::RandomSource;

pub use markov::MarkovChain;
pub use neural::NEURAL_REPLY;
pub use pattern::PatternRules;
pub use similarity::{jaccard, SimilarityMatcher, SIMPLE_AI_REPLY};

/// Lower-cased, whitespace-separated words with empty tokens dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// The closed set of response strategies.
pub enum Strategy {
    Pattern(PatternRules),
    Markov(MarkovChain),
    Similarity(SimilarityMatcher),
    SimpleSimilarity(SimilarityMatcher),
    NeuralStub,
}

impl Strategy {
    pub fn for_learning_type(learning_type: LearningType) -> Self {
        match learning_type {
            LearningType::Pattern => Strategy::Pattern(PatternRules::default()),
            LearningType::Markov => Strategy::Markov(MarkovChain::default()),
            LearningType::Similarity => Strategy::Similarity(SimilarityMatcher::similarity_bot()),
            LearningType::Simple => Strategy::SimpleSimilarity(SimilarityMatcher::simple_ai()),
            LearningType::Neural => Strategy::NeuralStub,
        }
    }

    /// Produce a reply for `input`.
    ///
    /// The Markov variant answers from the chain built at the last
    /// [`reload`](Self::reload), not from `corpus`.
    pub fn generate(
        &self,
        input: &str,
        corpus: &[ConversationRecord],
        rng: &mut dyn RandomSource,
    ) -> String {
        match self {
            Strategy::Pattern(rules) => rules.respond(input, rng),
            Strategy::Markov(chain) => chain.generate(rng),
            Strategy::Similarity(matcher) | Strategy::SimpleSimilarity(matcher) => {
                matcher.respond(input, corpus)
            }
            Strategy::NeuralStub => NEURAL_REPLY.to_string(),
        }
    }

    /// Rebuild derived state from a freshly loaded corpus.
    pub fn reload(&mut self, corpus: &[ConversationRecord]) {
        if let Strategy::Markov(chain) = self {
            *chain = MarkovChain::build(corpus);
        }
    }
}
