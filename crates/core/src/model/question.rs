use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Letter identifying one option of a multiple-choice question (`A`, `B`, ...).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionKey(String);

impl OptionKey {
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Debug for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionKey({})", self.0)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selected option per question, keyed by 0-based question index.
pub type AnswerSheet = BTreeMap<usize, OptionKey>;

/// A multiple-choice question shared by quizzes and the career assessment.
///
/// Quiz questions carry the server's answer key. The client keeps it only so the
/// question set can be sent back verbatim on submission; nothing here exposes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    number: Option<u32>,
    #[serde(rename = "question")]
    text: String,
    options: BTreeMap<OptionKey, String>,
    #[serde(rename = "correct", default, skip_serializing_if = "Option::is_none")]
    answer_key: Option<String>,
}

impl Question {
    #[must_use]
    pub fn new(
        number: u32,
        text: impl Into<String>,
        options: impl IntoIterator<Item = (OptionKey, String)>,
    ) -> Self {
        Self {
            number: Some(number),
            text: text.into(),
            options: options.into_iter().collect(),
            answer_key: None,
        }
    }

    /// Attach the answer key a server would send along with the question.
    #[must_use]
    pub fn with_answer_key(mut self, key: &OptionKey) -> Self {
        self.answer_key = Some(key.as_str().to_owned());
        self
    }

    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &BTreeMap<OptionKey, String> {
        &self.options
    }

    #[must_use]
    pub fn option(&self, key: &OptionKey) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_keys_are_normalized() {
        assert_eq!(OptionKey::new(" b "), OptionKey::from("B"));
        assert_eq!(OptionKey::new("c").as_str(), "C");
    }

    #[test]
    fn answer_key_survives_resubmission() {
        let raw = r#"{"number":1,"question":"What is 2+2?","options":{"A":"3","B":"4"},"correct":"B"}"#;
        let question: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(question.text(), "What is 2+2?");
        assert_eq!(question.option(&OptionKey::from("B")), Some("4"));

        let echoed = serde_json::to_value(&question).unwrap();
        assert_eq!(echoed["correct"], "B");
        assert_eq!(echoed["question"], "What is 2+2?");
    }

    #[test]
    fn assessment_questions_use_id_for_number() {
        let raw = r#"{"id":3,"question":"Pick one","options":{"A":"Build","B":"Analyze"}}"#;
        let question: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(question.number(), Some(3));
        let echoed = serde_json::to_value(&question).unwrap();
        assert!(echoed.get("correct").is_none());
    }
}
