use learn_core::model::Session;
use services::AppState;

/// Shown in place of the detail list until the server fills it.
pub const DETAILS_PLACEHOLDER: &str = "Loading detailed information...";

/// Main card of the learning screen plus the sidebar progress block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearningScreenVm {
    pub topic: String,
    pub badge: String,
    pub title: String,
    pub details: Vec<String>,
    pub details_pending: bool,
    pub progress_label: String,
    pub progress_percent: u8,
    pub persona_tag: String,
    pub difficulty_tag: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub is_last_step: bool,
    pub completed: bool,
}

#[must_use]
pub fn map_learning_screen(state: &AppState) -> Option<LearningScreenVm> {
    let session = state.session()?;
    let step = session.current_step();
    let progress = session.progress();
    let navigating = state.pending().navigating;

    let details_pending = step.details_pending();
    let details = if details_pending {
        vec![DETAILS_PLACEHOLDER.to_owned()]
    } else {
        step.details().to_vec()
    };

    Some(LearningScreenVm {
        topic: session.topic().to_owned(),
        badge: format!("Step {}", step.number()),
        title: step.title().to_owned(),
        details,
        details_pending,
        progress_label: format!("Step {} of {}", progress.position, progress.total),
        progress_percent: progress.percent,
        persona_tag: session.persona().to_string(),
        difficulty_tag: session.difficulty().to_string(),
        can_go_previous: !session.is_first_step() && !navigating,
        can_go_next: !navigating,
        is_last_step: session.is_last_step(),
        completed: state.is_completed(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimapStatus {
    Completed,
    Active,
    Upcoming,
}

/// One row of the roadmap minimap; `index` is what a jump targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimapItemVm {
    pub index: usize,
    pub title: String,
    pub status: MinimapStatus,
}

#[must_use]
pub fn map_minimap(session: &Session) -> Vec<MinimapItemVm> {
    let current = session.current_index();
    session
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| MinimapItemVm {
            index,
            title: step.title().to_owned(),
            status: match index.cmp(&current) {
                std::cmp::Ordering::Less => MinimapStatus::Completed,
                std::cmp::Ordering::Equal => MinimapStatus::Active,
                std::cmp::Ordering::Greater => MinimapStatus::Upcoming,
            },
        })
        .collect()
}
