//! Study cards derived from the detail bullets of the current step.
//!
//! Cards are never stored: they are rebuilt from scratch whenever the learner lands on
//! a step and thrown away when they leave it.

/// Separator between a term and its definition inside a detail bullet.
pub const TERM_SEPARATOR: char = ':';

/// Front label for cards built from long bullets that have no term.
pub const GENERIC_FRONT: &str = "Key Concept";

/// Bullets must be longer than this (in characters) to become a generic card.
pub const DEFAULT_MIN_GENERIC_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// Build flashcards from step details, in detail order.
///
/// `Term: definition` bullets become term cards. Other bullets longer than
/// `min_generic_len` characters become [`GENERIC_FRONT`] cards; short ones are skipped.
#[must_use]
pub fn extract_flashcards(details: &[String], min_generic_len: usize) -> Vec<Flashcard> {
    details
        .iter()
        .filter_map(|detail| card_for_detail(detail, min_generic_len))
        .collect()
}

fn card_for_detail(detail: &str, min_generic_len: usize) -> Option<Flashcard> {
    if let Some((term, definition)) = detail.split_once(TERM_SEPARATOR) {
        let (term, definition) = (term.trim(), definition.trim());
        if !term.is_empty() && !definition.is_empty() {
            return Some(Flashcard {
                front: term.to_owned(),
                back: definition.to_owned(),
            });
        }
    }

    if detail.chars().count() > min_generic_len {
        return Some(Flashcard {
            front: GENERIC_FRONT.to_owned(),
            back: detail.trim().to_owned(),
        });
    }

    None
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

/// Cards for the current step plus a circular cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    index: usize,
    face: CardFace,
}

impl FlashcardDeck {
    #[must_use]
    pub fn from_details(details: &[String], min_generic_len: usize) -> Self {
        Self {
            cards: extract_flashcards(details, min_generic_len),
            index: 0,
            face: CardFace::Front,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based position and deck size for the "i/n" counter; `(0, 0)` when empty.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        if self.cards.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.cards.len())
        }
    }

    #[must_use]
    pub fn face(&self) -> CardFace {
        self.face
    }

    #[must_use]
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
        self.face = CardFace::Front;
    }

    pub fn previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
        self.face = CardFace::Front;
    }

    pub fn flip(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.face = match self.face {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        };
    }
}
