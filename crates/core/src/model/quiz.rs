use super::question::OptionKey;

/// Score at or above which a quiz counts as passed.
pub const PASS_MARK_PERCENT: u8 = 70;

/// Server verdict for one submitted question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub number: u32,
    pub correct: bool,
    pub user_answer: Option<OptionKey>,
    pub correct_answer: Option<OptionKey>,
}

/// Score returned by the server after a quiz submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizScore {
    pub score: u32,
    pub total: u32,
    pub percentage: u8,
    pub outcomes: Vec<QuestionOutcome>,
}

impl QuizScore {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_MARK_PERCENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_mark_is_inclusive() {
        let score = |percentage| QuizScore {
            score: 0,
            total: 0,
            percentage,
            outcomes: Vec::new(),
        };
        assert!(score(70).passed());
        assert!(!score(69).passed());
    }
}
