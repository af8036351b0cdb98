pub mod engine;
pub mod outcome;

pub use engine::Classifier;
pub use outcome::{Fallback, Outcome};

/// How a rule tests a transaction description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Case-sensitive substring.
    Contains(String),
    /// Substring, ignoring ASCII case.
    ContainsIgnoreCase(String),
    /// The whole description, exactly.
    Equals(String),
    /// The first whitespace-separated word, exactly.
    FirstWord(String),
    /// A first word shaped `DDMMMYY` naming a month of the statement period,
    /// e.g. `05NOV24`.
    DatedReference,
}

/// One entry of an ordered, first-match-wins rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub matcher: Matcher,
    pub outcome: Outcome,
}

impl Rule {
    pub fn new(matcher: Matcher, outcome: Outcome) -> Self {
        Rule { matcher, outcome }
    }

    pub fn contains(keyword: &str, outcome: Outcome) -> Self {
        Rule::new(Matcher::Contains(keyword.to_string()), outcome)
    }
}
