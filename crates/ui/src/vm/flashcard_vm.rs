use learn_core::flashcards::{CardFace, FlashcardDeck};

pub const NO_FLASHCARDS: &str = "No flashcards for this step yet.";

/// Flashcard widget: both faces, which one is up and the "i/n" counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardVm {
    pub front: String,
    pub back: String,
    pub showing_back: bool,
    pub counter: String,
    pub can_navigate: bool,
}

impl FlashcardVm {
    /// Text on the visible face.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        if self.showing_back { &self.back } else { &self.front }
    }
}

#[must_use]
pub fn map_flashcards(deck: &FlashcardDeck) -> FlashcardVm {
    let (position, total) = deck.position();
    match deck.current() {
        Some(card) => FlashcardVm {
            front: card.front.clone(),
            back: card.back.clone(),
            showing_back: deck.face() == CardFace::Back,
            counter: format!("{position}/{total}"),
            can_navigate: total > 1,
        },
        None => FlashcardVm {
            front: NO_FLASHCARDS.to_owned(),
            back: String::new(),
            showing_back: false,
            counter: "0/0".to_owned(),
            can_navigate: false,
        },
    }
}
