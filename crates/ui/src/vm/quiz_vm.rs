use learn_core::flow::QuizFlow;
use learn_core::model::{OptionKey, Question, QuizScore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub key: OptionKey,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub index: usize,
    pub heading: String,
    pub options: Vec<QuizOptionVm>,
}

/// Quiz panel for the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub questions: Vec<QuizQuestionVm>,
    pub generate_label: &'static str,
    pub can_generate: bool,
    pub submit_label: &'static str,
    pub can_submit: bool,
    pub answered: String,
}

#[must_use]
pub fn map_quiz(flow: &QuizFlow) -> QuizVm {
    let questions = flow.sheet().map_or_else(Vec::new, |sheet| {
        sheet
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| map_question(index, question, sheet.selected(index)))
            .collect()
    });
    let answered = flow.sheet().map_or_else(String::new, |sheet| {
        format!("{}/{} answered", sheet.answered_count(), sheet.questions().len())
    });

    QuizVm {
        questions,
        generate_label: if matches!(flow, QuizFlow::Generating) {
            "Generating..."
        } else {
            "Generate Quiz"
        },
        can_generate: flow.can_generate(),
        submit_label: if matches!(flow, QuizFlow::Submitting(_)) {
            "Submitting..."
        } else {
            "Submit Quiz"
        },
        can_submit: flow.can_submit(),
        answered,
    }
}

fn map_question(index: usize, question: &Question, selected: Option<&OptionKey>) -> QuizQuestionVm {
    QuizQuestionVm {
        index,
        heading: format!("{}. {}", index + 1, question.text()),
        options: question
            .options()
            .iter()
            .map(|(key, label)| QuizOptionVm {
                key: key.clone(),
                label: format!("{key}) {label}"),
                selected: selected == Some(key),
            })
            .collect(),
    }
}

/// Score modal shown after submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultVm {
    pub headline: String,
    pub message: &'static str,
    pub passed: bool,
    pub outcomes: Vec<String>,
}

#[must_use]
pub fn map_quiz_result(score: &QuizScore) -> QuizResultVm {
    let passed = score.passed();
    QuizResultVm {
        headline: format!(
            "Score: {}/{} ({}%)",
            score.score, score.total, score.percentage
        ),
        message: if passed { "Great job!" } else { "Keep practicing!" },
        passed,
        outcomes: score
            .outcomes
            .iter()
            .map(|outcome| {
                let answer = outcome
                    .user_answer
                    .as_ref()
                    .map_or_else(|| "-".to_owned(), ToString::to_string);
                if outcome.correct {
                    format!("Q{}: {answer} correct", outcome.number)
                } else {
                    let expected = outcome
                        .correct_answer
                        .as_ref()
                        .map_or_else(|| "?".to_owned(), ToString::to_string);
                    format!("Q{}: {answer} wrong, answer {expected}", outcome.number)
                }
            })
            .collect(),
    }
}
