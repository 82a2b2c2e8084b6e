//! Regex rules with canned replies.

use regex::Regex;

use crate::random::RandomSource;

/// Reply when no rule matches.
pub const PATTERN_FALLBACK: &str = "I'm not sure how to respond to that yet.";

/// A single compiled rule and its candidate replies.
pub struct PatternRule {
    pub regex: Regex,
    pub replies: Vec<&'static str>,
}

/// Ordered rule table; the first matching rule wins.
pub struct PatternRules {
    rules: Vec<PatternRule>,
}

impl Default for PatternRules {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRules {
    /// Greeting, well-being and farewell rules, in that priority. Patterns
    /// are unanchored, so a rule word inside a longer word still matches.
    pub fn new() -> Self {
        let table: Vec<(&str, Vec<&'static str>)> = vec![
            (
                r"(?i)hello|hi|hey",
                vec!["Hello!", "Hi there!", "Hey!"],
            ),
            (
                r"(?i)how are you",
                vec!["I'm doing well!", "Great, thanks for asking!"],
            ),
            (
                r"(?i)bye|goodbye",
                vec!["Goodbye!", "See you later!", "Bye!"],
            ),
        ];

        let rules = table
            .into_iter()
            .map(|(pat, replies)| PatternRule {
                regex: Regex::new(pat).expect("Invalid pattern regex"),
                replies,
            })
            .collect();

        Self { rules }
    }

    /// Index of the first rule matching `input`.
    pub fn matching_rule(&self, input: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.regex.is_match(input))
    }

    pub fn respond(&self, input: &str, rng: &mut dyn RandomSource) -> String {
        match self.matching_rule(input) {
            Some(idx) => {
                let replies = &self.rules[idx].replies;
                replies[rng.pick(replies.len())].to_string()
            }
            None => PATTERN_FALLBACK.to_string(),
        }
    }
}
