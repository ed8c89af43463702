mod assessment_vm;
mod chat_vm;
mod flashcard_vm;
mod markdown_vm;
mod notice_vm;
mod panels_vm;
mod quiz_vm;
mod stats_vm;
mod step_vm;
mod time_fmt;

pub use assessment_vm::{AssessmentVm, map_assessment};
pub use chat_vm::{ChatMessageVm, map_chat};
pub use flashcard_vm::{FlashcardVm, NO_FLASHCARDS, map_flashcards};
pub use markdown_vm::guide_plain_text;
pub use notice_vm::{NoticeVm, ScreenVm, map_notice, map_screen};
pub use panels_vm::{
    GUIDE_FAILED, GuideVm, NO_RESOURCES, NoteVm, ResourceItemVm, ResourcesVm, map_guide,
    map_note, map_resources,
};
pub use quiz_vm::{QuizOptionVm, QuizQuestionVm, QuizResultVm, QuizVm, map_quiz, map_quiz_result};
pub use stats_vm::{StatsVm, map_stats};
pub use step_vm::{
    DETAILS_PLACEHOLDER, LearningScreenVm, MinimapItemVm, MinimapStatus, map_learning_screen,
    map_minimap,
};
pub use time_fmt::format_clock_time;
