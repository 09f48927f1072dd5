//! Canned answers for application form questions

use std::collections::BTreeMap;

use serde::Serialize;

/// Built-in answers, keyed by lowercase substrings of the question
pub const DEFAULT_ANSWERS: &[(&str, &str)] = &[
    ("authorized to work", "Yes"),
    ("legally authorized", "Yes"),
    ("sponsorship", "No"),
    ("require visa", "No"),
    ("desired salary", "Negotiable"),
    ("salary expectation", "Negotiable"),
    ("years of experience", "3"),
    ("willing to relocate", "Yes"),
    ("start date", "Immediately"),
    ("notice period", "Two weeks"),
    ("remote", "Yes"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer<'a> {
    pub key: &'a str,
    pub answer: &'a str,
}

/// Substring-keyed answer lookup
#[derive(Debug, Clone, Default)]
pub struct AnswerBook {
    entries: BTreeMap<String, String>,
}

impl AnswerBook {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in answers with `overrides` layered on top
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut book = Self::builtin();
        for (key, answer) in overrides {
            book.insert(key, answer);
        }
        book
    }

    pub fn builtin() -> Self {
        let mut book = Self::empty();
        for &(key, answer) in DEFAULT_ANSWERS {
            book.insert(key, answer);
        }
        book
    }

    pub fn insert(&mut self, key: impl AsRef<str>, answer: impl Into<String>) {
        let key = key.as_ref().trim().to_lowercase();
        if !key.is_empty() {
            self.entries.insert(key, answer.into());
        }
    }

    /// Answer for `question`; when several keys match, the longest wins
    pub fn lookup(&self, question: &str) -> Option<Answer<'_>> {
        let question = question.to_lowercase();
        self.entries
            .iter()
            .filter(|(key, _)| question.contains(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(key, answer)| Answer { key, answer })
    }

    pub fn iter(&self) -> impl Iterator<Item = Answer<'_>> {
        self.entries.iter().map(|(key, answer)| Answer { key, answer })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let book = AnswerBook::builtin();
        let answer = book
            .lookup("Are you AUTHORIZED TO WORK in the United States?")
            .unwrap();
        assert_eq!(answer.answer, "Yes");
        assert!(book.lookup("What is your favourite colour?").is_none());
    }

    #[test]
    fn test_longest_key_wins() {
        let mut book = AnswerBook::builtin();
        book.insert("salary", "100k");
        assert_eq!(book.lookup("Desired salary?").unwrap().answer, "Negotiable");
        assert_eq!(book.lookup("Current salary?").unwrap().answer, "100k");
    }

    #[test]
    fn test_overrides_replace_builtins() {
        let overrides = BTreeMap::from([("Sponsorship".to_string(), "Yes".to_string())]);
        let book = AnswerBook::with_overrides(&overrides);
        assert_eq!(
            book.lookup("Will you now or in the future require sponsorship?")
                .unwrap()
                .answer,
            "Yes"
        );
        assert_eq!(book.len(), DEFAULT_ANSWERS.len());
    }
}
