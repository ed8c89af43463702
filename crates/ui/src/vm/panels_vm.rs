use learn_core::model::Resource;
use services::{NoteState, PanelState};

use super::markdown_vm::guide_plain_text;

pub const GUIDE_FAILED: &str = "Failed to load guide.";
pub const NO_RESOURCES: &str = "No resources found.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuideVm {
    Hidden,
    Loading,
    Text(String),
    Failed(&'static str),
}

#[must_use]
pub fn map_guide(panel: &PanelState<String>) -> GuideVm {
    match panel {
        PanelState::Idle => GuideVm::Hidden,
        PanelState::Loading => GuideVm::Loading,
        PanelState::Ready(markdown) => GuideVm::Text(guide_plain_text(markdown)),
        PanelState::Failed(_) => GuideVm::Failed(GUIDE_FAILED),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceItemVm {
    pub title: String,
    pub kind_label: &'static str,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourcesVm {
    Hidden,
    Loading,
    Empty(&'static str),
    Items(Vec<ResourceItemVm>),
    Failed(String),
}

#[must_use]
pub fn map_resources(panel: &PanelState<Vec<Resource>>) -> ResourcesVm {
    match panel {
        PanelState::Idle => ResourcesVm::Hidden,
        PanelState::Loading => ResourcesVm::Loading,
        PanelState::Ready(items) if items.is_empty() => ResourcesVm::Empty(NO_RESOURCES),
        PanelState::Ready(items) => ResourcesVm::Items(
            items
                .iter()
                .map(|resource| ResourceItemVm {
                    title: resource.title.clone(),
                    kind_label: resource.kind.label(),
                    url: resource.url.to_string(),
                })
                .collect(),
        ),
        PanelState::Failed(message) => ResourcesVm::Failed(message.clone()),
    }
}

/// Note editor; `saved_recently` comes from the controller's clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteVm {
    pub draft: String,
    pub button_label: &'static str,
    pub saving: bool,
}

#[must_use]
pub fn map_note(note: &NoteState, saving: bool, saved_recently: bool) -> NoteVm {
    NoteVm {
        draft: note.draft().to_owned(),
        button_label: if saved_recently { "Saved!" } else { "Save Note" },
        saving,
    }
}

#[cfg(test)]
mod tests {
    use learn_core::model::fallback_resources;

    use super::*;

    #[test]
    fn guide_is_flattened_when_ready() {
        let panel = PanelState::Ready("# Borrowing\n\n*Shared* references".to_owned());
        assert_eq!(
            map_guide(&panel),
            GuideVm::Text("Borrowing\nShared references".to_owned())
        );
        assert_eq!(
            map_guide(&PanelState::Failed("timeout".into())),
            GuideVm::Failed(GUIDE_FAILED)
        );
        assert_eq!(map_guide(&PanelState::Loading), GuideVm::Loading);
    }

    #[test]
    fn resources_keep_kind_labels() {
        let panel = PanelState::Ready(fallback_resources("Rust", "Ownership"));
        let ResourcesVm::Items(items) = map_resources(&panel) else {
            panic!("expected items");
        };
        assert_eq!(items[0].title, "Introduction to Ownership");
        assert_eq!(items[0].kind_label, "Article");
        assert_eq!(items[1].kind_label, "Video");
        assert!(items[1].url.starts_with("https://www.youtube.com/results"));
    }

    #[test]
    fn empty_and_failed_resources() {
        assert_eq!(
            map_resources(&PanelState::Ready(Vec::new())),
            ResourcesVm::Empty(NO_RESOURCES)
        );
        assert_eq!(
            map_resources(&PanelState::Failed("Error loading resources.".into())),
            ResourcesVm::Failed("Error loading resources.".into())
        );
    }

    #[test]
    fn note_button_reflects_recent_save() {
        let note = NoteState::default();
        assert_eq!(map_note(&note, false, true).button_label, "Saved!");
        assert_eq!(map_note(&note, false, false).button_label, "Save Note");
        assert!(map_note(&note, true, false).saving);
    }
}
