//! First-order Markov chain over logged responses.

use std::collections::HashMap;

use chorus_core::types::ConversationRecord;

use crate::random::RandomSource;

/// Reply while the chain has no transitions yet.
pub const MARKOV_EMPTY_REPLY: &str = "Still learning...";

/// Maximum number of words appended after the starting word.
pub const MAX_STEPS: usize = 15;

/// Word to successor list. Successors keep encounter order and duplicates,
/// so frequent pairs are proportionally more likely to be picked.
#[derive(Debug, Default, Clone)]
pub struct MarkovChain {
    successors: HashMap<String, Vec<String>>,
    /// Keys in first-encounter order; start words are drawn from here.
    keys: Vec<String>,
}

impl MarkovChain {
    /// Build a chain from every record's `response`. Case is preserved.
    pub fn build(corpus: &[ConversationRecord]) -> Self {
        let mut chain = Self::default();
        for record in corpus {
            let words: Vec<&str> = record.response.split_whitespace().collect();
            for pair in words.windows(2) {
                chain.push(pair[0], pair[1]);
            }
        }
        chain
    }

    fn push(&mut self, current: &str, next: &str) {
        match self.successors.get_mut(current) {
            Some(list) => list.push(next.to_string()),
            None => {
                self.keys.push(current.to_string());
                self.successors
                    .insert(current.to_string(), vec![next.to_string()]);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn successors(&self, word: &str) -> Option<&[String]> {
        self.successors.get(word).map(Vec::as_slice)
    }

    /// Random walk from a random start key, at most `MAX_STEPS` transitions.
    pub fn generate(&self, rng: &mut dyn RandomSource) -> String {
        if self.keys.is_empty() {
            return MARKOV_EMPTY_REPLY.to_string();
        }

        let mut current = self.keys[rng.pick(self.keys.len())].as_str();
        let mut words = vec![current];

        for _ in 0..MAX_STEPS {
            let next = match self.successors.get(current) {
                Some(list) if !list.is_empty() => list,
                _ => break,
            };
            current = next[rng.pick(next.len())].as_str();
            words.push(current);
        }

        words.join(" ")
    }
}
