use learn_core::flow::{Overlay, Screen, ScreenState};
use services::Notice;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub message: String,
}

#[must_use]
pub fn map_notice(notice: Option<&Notice>) -> Option<NoticeVm> {
    notice.map(|notice| NoticeVm {
        message: notice.message.clone(),
    })
}

/// Which top-level view to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenVm {
    Start,
    Loading,
    Learning { completion: bool, quiz_results: bool },
}

#[must_use]
pub fn map_screen(screen: ScreenState) -> ScreenVm {
    match screen.screen {
        Screen::Start => ScreenVm::Start,
        Screen::Loading => ScreenVm::Loading,
        Screen::Learning => ScreenVm::Learning {
            completion: screen.overlay == Overlay::Completion,
            quiz_results: screen.overlay == Overlay::QuizResults,
        },
    }
}
