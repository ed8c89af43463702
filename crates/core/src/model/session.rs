use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::ids::StepNumber;

/// Errors raised when building or moving through a roadmap session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("topic is empty")]
    EmptyTopic,
    #[error("roadmap has no steps")]
    EmptyRoadmap,
    #[error("step index {index} is out of range for {total} steps")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("unknown {kind} tag: {raw}")]
    UnknownTag { kind: &'static str, raw: String },
}

//
// ─── TAGS ──────────────────────────────────────────────────────────────────────
//

/// Teaching style the server uses when writing guides and chat replies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Persona {
    #[default]
    General,
    Scientist,
    Eli5,
    Socratic,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::General,
        Persona::Scientist,
        Persona::Eli5,
        Persona::Socratic,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::General => "General",
            Persona::Scientist => "Scientist",
            Persona::Eli5 => "ELI5",
            Persona::Socratic => "Socratic",
        }
    }
}

impl FromStr for Persona {
    type Err = SessionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Persona::ALL
            .into_iter()
            .find(|persona| persona.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SessionError::UnknownTag {
                kind: "persona",
                raw: raw.to_owned(),
            })
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = SessionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SessionError::UnknownTag {
                kind: "difficulty",
                raw: raw.to_owned(),
            })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// One ordered unit of a roadmap.
///
/// `details` may arrive empty and be filled later; once filled they are never replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    number: StepNumber,
    title: String,
    details: Vec<String>,
}

impl Step {
    #[must_use]
    pub fn new(number: StepNumber, title: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            number,
            title: title.into(),
            details,
        }
    }

    #[must_use]
    pub fn number(&self) -> StepNumber {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    #[must_use]
    pub fn details_pending(&self) -> bool {
        self.details.is_empty()
    }

    /// Fill details that have not been populated yet.
    ///
    /// Returns `false` (and keeps the existing list) when details are already present
    /// or the new list is empty.
    pub fn fill_details(&mut self, details: Vec<String>) -> bool {
        if !self.details.is_empty() || details.is_empty() {
            return false;
        }
        self.details = details;
        true
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Position within the roadmap, as shown by the progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepProgress {
    /// 1-based position of the current step.
    pub position: usize,
    pub total: usize,
    /// `position / total` as a rounded percentage.
    pub percent: u8,
}

impl StepProgress {
    #[must_use]
    pub fn new(index: usize, total: usize) -> Self {
        let position = index.saturating_add(1).min(total.max(1));
        let total = total.max(1);
        let percent = (position * 100 + total / 2) / total;
        Self {
            position,
            total,
            percent: u8::try_from(percent).unwrap_or(100),
        }
    }
}

/// Client mirror of the server-held learning session.
///
/// The step list is fixed once the session exists and `current_index` always points
/// at one of its steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    topic: String,
    steps: Vec<Step>,
    current_index: usize,
    persona: Persona,
    difficulty: Difficulty,
}

impl Session {
    /// Start a session on the first step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyTopic` for a blank topic and
    /// `SessionError::EmptyRoadmap` when no steps are given.
    pub fn new(
        topic: impl Into<String>,
        steps: Vec<Step>,
        persona: Persona,
        difficulty: Difficulty,
    ) -> Result<Self, SessionError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(SessionError::EmptyTopic);
        }
        if steps.is_empty() {
            return Err(SessionError::EmptyRoadmap);
        }
        Ok(Self {
            topic,
            steps,
            current_index: 0,
            persona,
            difficulty,
        })
    }

    /// Rebuild a session the server reports as in progress.
    ///
    /// # Errors
    ///
    /// Same as [`Session::new`], plus `SessionError::IndexOutOfRange` when the server
    /// position does not name a step.
    pub fn resume(
        topic: impl Into<String>,
        steps: Vec<Step>,
        persona: Persona,
        difficulty: Difficulty,
        current_index: usize,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(topic, steps, persona, difficulty)?;
        session.set_current_index(current_index)?;
        Ok(session)
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_step(&self) -> &Step {
        &self.steps[self.current_index]
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_index + 1 >= self.steps.len()
    }

    #[must_use]
    pub fn progress(&self) -> StepProgress {
        StepProgress::new(self.current_index, self.steps.len())
    }

    /// Move to `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` and leaves the position unchanged when
    /// `index` does not name a step.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.steps.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                total: self.steps.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Step back one position. Returns `false` when already on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Fill pending details for the step at `index`.
    pub fn fill_step_details(&mut self, index: usize, details: Vec<String>) -> bool {
        self.steps
            .get_mut(index)
            .is_some_and(|step| step.fill_details(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(count: u32) -> Vec<Step> {
        (1..=count)
            .map(|n| Step::new(StepNumber::new(n), format!("Step {n}"), Vec::new()))
            .collect()
    }

    #[test]
    fn new_session_starts_on_first_step() {
        let session = Session::new("Rust", steps(3), Persona::General, Difficulty::Beginner).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_step().title(), "Step 1");
        assert!(session.is_first_step());
        assert!(!session.is_last_step());
    }

    #[test]
    fn empty_roadmap_and_topic_are_rejected() {
        let err = Session::new("Rust", Vec::new(), Persona::General, Difficulty::Beginner).unwrap_err();
        assert_eq!(err, SessionError::EmptyRoadmap);
        let err = Session::new("  ", steps(1), Persona::General, Difficulty::Beginner).unwrap_err();
        assert_eq!(err, SessionError::EmptyTopic);
    }

    #[test]
    fn resume_rejects_out_of_range_index() {
        let err = Session::resume("Rust", steps(2), Persona::General, Difficulty::Advanced, 2)
            .unwrap_err();
        assert_eq!(err, SessionError::IndexOutOfRange { index: 2, total: 2 });

        let session =
            Session::resume("Rust", steps(3), Persona::General, Difficulty::Advanced, 2).unwrap();
        assert!(session.is_last_step());
    }

    #[test]
    fn set_index_keeps_position_on_error() {
        let mut session = Session::new("Rust", steps(3), Persona::General, Difficulty::Beginner).unwrap();
        session.set_current_index(1).unwrap();
        assert!(session.set_current_index(7).is_err());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn retreat_floors_at_zero() {
        let mut session = Session::new("Rust", steps(2), Persona::General, Difficulty::Beginner).unwrap();
        session.set_current_index(1).unwrap();
        assert!(session.retreat());
        assert!(!session.retreat());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn details_fill_only_once() {
        let mut session = Session::new("Rust", steps(2), Persona::General, Difficulty::Beginner).unwrap();
        assert!(session.steps()[1].details_pending());
        assert!(session.fill_step_details(1, vec!["Ownership: who frees memory".into()]));
        assert!(!session.fill_step_details(1, vec!["replacement".into()]));
        assert_eq!(session.steps()[1].details(), ["Ownership: who frees memory"]);
        assert!(!session.fill_step_details(9, vec!["x".into()]));
    }

    #[test]
    fn progress_is_rounded_percentage_of_position() {
        assert_eq!(StepProgress::new(0, 3).percent, 33);
        assert_eq!(StepProgress::new(1, 3).percent, 67);
        assert_eq!(StepProgress::new(2, 3).percent, 100);
        assert_eq!(StepProgress::new(0, 8).position, 1);
    }

    #[test]
    fn tags_parse_wire_names() {
        assert_eq!("ELI5".parse::<Persona>().unwrap(), Persona::Eli5);
        assert_eq!("socratic".parse::<Persona>().unwrap(), Persona::Socratic);
        assert_eq!("Advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!(matches!(
            "Wizard".parse::<Persona>(),
            Err(SessionError::UnknownTag { kind: "persona", .. })
        ));
    }
}
