//! Plain-text rendering of the view-models for the terminal driver.

use std::fmt::Write;

use services::LearningController;
use ui::vm::{
    AssessmentVm, GuideVm, MinimapStatus, ResourcesVm, ScreenVm, map_assessment, map_chat,
    map_flashcards, map_guide, map_learning_screen, map_minimap, map_note, map_notice, map_quiz,
    map_quiz_result, map_resources, map_screen, map_stats,
};

/// Everything currently on screen, minus the notice.
#[must_use]
pub fn render_view(controller: &LearningController) -> String {
    let state = controller.state();
    let mut out = String::new();

    match map_screen(state.screen()) {
        ScreenVm::Start => {
            let stats = map_stats(state.stats());
            let _ = writeln!(out, "== Start ==");
            let _ = writeln!(
                out,
                "Topics: {}  Completed: {}  Progress: {}",
                stats.total_topics, stats.completed_topics, stats.progress
            );
            if state.session().is_some() {
                let _ = writeln!(out, "(`back` returns to the current roadmap)");
            }
            render_assessment(&mut out, controller);
        }
        ScreenVm::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        ScreenVm::Learning {
            completion,
            quiz_results,
        } => {
            render_learning(&mut out, controller);
            if completion {
                let _ = writeln!(out, "\n*** Roadmap complete. `home` to pick a new topic. ***");
            }
            if quiz_results {
                if let Some(score) = state.quiz().score() {
                    let result = map_quiz_result(score);
                    let _ = writeln!(out, "\n[{}] {}", result.headline, result.message);
                    for outcome in &result.outcomes {
                        let _ = writeln!(out, "  {outcome}");
                    }
                    let _ = writeln!(out, "(`close` to dismiss)");
                }
            }
        }
    }
    out
}

fn render_learning(out: &mut String, controller: &LearningController) {
    let state = controller.state();
    let Some(screen) = map_learning_screen(state) else {
        return;
    };

    let _ = writeln!(
        out,
        "== {} ({} / {}) ==",
        screen.topic, screen.persona_tag, screen.difficulty_tag
    );
    let _ = writeln!(
        out,
        "{}  {}  [{}%]",
        screen.progress_label, screen.badge, screen.progress_percent
    );
    let _ = writeln!(out, "{}", screen.title);
    for detail in &screen.details {
        let _ = writeln!(out, "  * {detail}");
    }

    if let Some(session) = state.session() {
        let line: Vec<String> = map_minimap(session)
            .into_iter()
            .map(|item| {
                let mark = match item.status {
                    MinimapStatus::Completed => "x",
                    MinimapStatus::Active => ">",
                    MinimapStatus::Upcoming => " ",
                };
                format!("[{mark}] {}", item.index + 1)
            })
            .collect();
        let _ = writeln!(out, "Roadmap: {}", line.join(" "));
    }

    let _ = writeln!(out, "\n-- Guide --");
    match map_guide(&state.panels().guide) {
        GuideVm::Hidden => {}
        GuideVm::Loading => {
            let _ = writeln!(out, "Loading guide...");
        }
        GuideVm::Text(text) => {
            let _ = writeln!(out, "{text}");
        }
        GuideVm::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
    }

    let _ = writeln!(out, "\n-- Resources --");
    match map_resources(&state.panels().resources) {
        ResourcesVm::Hidden => {}
        ResourcesVm::Loading => {
            let _ = writeln!(out, "Loading resources...");
        }
        ResourcesVm::Empty(message) => {
            let _ = writeln!(out, "{message}");
        }
        ResourcesVm::Items(items) => {
            for item in items {
                let _ = writeln!(out, "  [{}] {} <{}>", item.kind_label, item.title, item.url);
            }
        }
        ResourcesVm::Failed(message) => {
            let _ = writeln!(out, "{message}");
        }
    }

    let card = map_flashcards(state.flashcards());
    let _ = writeln!(out, "\n-- Flashcard {} --\n{}", card.counter, card.visible_text());

    let note = map_note(
        state.note(),
        state.pending().saving_note,
        controller.note_saved_recently(),
    );
    let _ = writeln!(out, "\n-- Note [{}] --", note.button_label);
    if !note.draft.is_empty() {
        let _ = writeln!(out, "{}", note.draft);
    }

    let chat = map_chat(state.chat());
    if !chat.is_empty() {
        let _ = writeln!(out, "\n-- Chat --");
        for message in chat {
            let who = if message.from_user { "you" } else { "tutor" };
            let _ = writeln!(out, "{} {who}: {}", message.time, message.text);
        }
    }

    let quiz = map_quiz(state.quiz());
    if !quiz.questions.is_empty() || !quiz.can_generate {
        let _ = writeln!(out, "\n-- Quiz ({}) --", quiz.answered);
        if !quiz.can_generate && quiz.questions.is_empty() {
            let _ = writeln!(out, "{}", quiz.generate_label);
        }
        for question in &quiz.questions {
            let _ = writeln!(out, "{}", question.heading);
            for option in &question.options {
                let mark = if option.selected { "(*)" } else { "( )" };
                let _ = writeln!(out, "  {mark} {}", option.label);
            }
        }
        if quiz.can_submit {
            let _ = writeln!(out, "`submit` to {}", quiz.submit_label.to_lowercase());
        }
    }
}

fn render_assessment(out: &mut String, controller: &LearningController) {
    match map_assessment(controller.state().assessment()) {
        AssessmentVm::Intro => {
            let _ = writeln!(out, "Not sure what to learn? `assess` for a career assessment.");
        }
        AssessmentVm::Loading { message } => {
            let _ = writeln!(out, "{message}");
        }
        AssessmentVm::Question {
            counter,
            progress_percent,
            text,
            options,
        } => {
            let _ = writeln!(out, "\n-- {counter} [{progress_percent}%] --\n{text}");
            for (key, label) in options {
                let _ = writeln!(out, "  {key}) {label}");
            }
        }
        AssessmentVm::Results {
            recommended_domain,
            explanation,
            starting_topic,
        } => {
            let _ = writeln!(out, "\n-- Recommended: {recommended_domain} --\n{explanation}");
            let _ = writeln!(out, "`follow` to start learning {starting_topic}");
        }
    }
}

/// The blocking notification, if one is up.
#[must_use]
pub fn render_notice(controller: &LearningController) -> Option<String> {
    map_notice(controller.state().notice()).map(|notice| format!("!! {}", notice.message))
}
