use learn_core::model::{ChatRole, ChatTranscript};

use crate::vm::time_fmt::format_clock_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageVm {
    pub from_user: bool,
    pub text: String,
    pub time: String,
}

#[must_use]
pub fn map_chat(transcript: &ChatTranscript) -> Vec<ChatMessageVm> {
    transcript
        .messages()
        .iter()
        .map(|message| ChatMessageVm {
            from_user: message.role == ChatRole::User,
            text: message.text.clone(),
            time: format_clock_time(message.sent_at),
        })
        .collect()
}
