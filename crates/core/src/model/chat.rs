use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Chat history for the step on screen. Cleared whenever the step changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn push(&mut self, role: ChatRole, text: &str, sent_at: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            role,
            text: clean_chat_text(text),
            sent_at,
        });
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Strip markdown emphasis/heading markers and blank lines from chat text.
#[must_use]
pub fn clean_chat_text(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|ch| !matches!(ch, '*' | '#')).collect();
    stripped
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn cleaning_removes_markers_and_blank_lines() {
        let raw = "## Ownership\n\n**Moves** transfer values.\n   \n- borrow with `&`\n";
        assert_eq!(
            clean_chat_text(raw),
            "Ownership\nMoves transfer values.\n- borrow with `&`"
        );
    }

    #[test]
    fn transcript_cleans_on_push_and_clears() {
        let mut transcript = ChatTranscript::default();
        transcript.push(ChatRole::Assistant, "**Hi**", fixed_now());
        assert_eq!(transcript.messages()[0].text, "Hi");
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
