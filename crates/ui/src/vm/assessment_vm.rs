use learn_core::flow::AssessmentFlow;

/// Career assessment panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssessmentVm {
    Intro,
    Loading {
        message: &'static str,
    },
    Question {
        counter: String,
        progress_percent: u8,
        text: String,
        options: Vec<(String, String)>,
    },
    Results {
        recommended_domain: String,
        explanation: String,
        starting_topic: String,
    },
}

#[must_use]
pub fn map_assessment(flow: &AssessmentFlow) -> AssessmentVm {
    match flow {
        AssessmentFlow::Intro => AssessmentVm::Intro,
        AssessmentFlow::Generating => AssessmentVm::Loading {
            message: "Generating Assessment...",
        },
        AssessmentFlow::Questions(sheet) => {
            let question = sheet.current_question();
            let total = sheet.total().max(1);
            AssessmentVm::Question {
                counter: format!("Question {} of {}", sheet.current() + 1, sheet.total()),
                progress_percent: u8::try_from(sheet.current() * 100 / total).unwrap_or(100),
                text: question.text().to_owned(),
                options: question
                    .options()
                    .iter()
                    .map(|(key, label)| (key.to_string(), label.clone()))
                    .collect(),
            }
        }
        AssessmentFlow::Analyzing(_) => AssessmentVm::Loading {
            message: "Analyzing your career path...",
        },
        AssessmentFlow::Results(recommendation) => AssessmentVm::Results {
            recommended_domain: recommendation.recommended_domain.clone(),
            explanation: recommendation.explanation.clone(),
            starting_topic: recommendation.starting_topic.clone(),
        },
    }
}
