use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One curated question/answer unit. Immutable once loaded: the matcher only
/// ever reads entries, so a loaded corpus can be shared across callers.
///
/// Corpus files are loosely shaped; every field that may be absent defaults
/// to empty rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: u64,
    pub question: String,
    #[serde(default)]
    pub question_short: String,
    #[serde(default)]
    pub question_alternatives: Vec<String>,
    #[serde(default)]
    pub question_short_alternatives: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
}

/// Result of ranking one query. A `Miss` with `answer: None` is the
/// not-found sentinel; when a best candidate existed but fell short of the
/// similarity threshold, its id and score are kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub entry_id: Option<u64>,
    pub answer: Option<String>,
    pub score: f32,
    pub decision: Decision,
}

impl MatchOutcome {
    pub fn not_found() -> Self {
        Self {
            entry_id: None,
            answer: None,
            score: 0.0,
            decision: Decision::Miss,
        }
    }
}

/// Field selector for the eval harness utilities (self-consistency queries,
/// deduplication keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionField {
    Canonical,
    Short,
    Answer,
}

impl QuestionField {
    pub fn text<'a>(&self, entry: &'a FaqEntry) -> &'a str {
        match self {
            QuestionField::Canonical => &entry.question,
            QuestionField::Short => &entry.question_short,
            QuestionField::Answer => &entry.answer,
        }
    }
}

impl FromStr for QuestionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canonical" => Ok(QuestionField::Canonical),
            "short" => Ok(QuestionField::Short),
            "answer" => Ok(QuestionField::Answer),
            other => Err(format!(
                "unknown field '{other}' (expected canonical, short or answer)"
            )),
        }
    }
}

impl fmt::Display for QuestionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionField::Canonical => "canonical",
            QuestionField::Short => "short",
            QuestionField::Answer => "answer",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_defaults_absent_fields_to_empty() {
        let entry: FaqEntry = serde_json::from_str(
            r#"{"id": 7, "question": "How do I log in?", "answer": "Use the login page."}"#,
        )
        .expect("parse");

        assert_eq!(entry.id, 7);
        assert!(entry.question_short.is_empty());
        assert!(entry.question_alternatives.is_empty());
        assert!(entry.question_short_alternatives.is_empty());
        assert!(entry.keywords.is_empty());
    }

    #[test]
    fn question_field_round_trips_through_str() {
        for field in [
            QuestionField::Canonical,
            QuestionField::Short,
            QuestionField::Answer,
        ] {
            let parsed: QuestionField = field.to_string().parse().expect("parse");
            assert_eq!(parsed, field);
        }
        assert!("nope".parse::<QuestionField>().is_err());
    }
}
