use std::sync::Arc;

use learn_core::flow::{AssessmentFlow, Overlay, QuizFlow, Screen};
use learn_core::model::{ChatRole, Difficulty, OptionKey, Persona, ResourceKind};
use learn_core::time::fixed_clock;
use services::{
    ApiCall, AssessmentStep, ControllerConfig, ControllerError, InMemoryLearningApi,
    InjectedFailure, LearningController, NextOutcome, PanelState, ResumeOutcome,
};

fn controller(api: &InMemoryLearningApi) -> LearningController {
    LearningController::new(Arc::new(api.clone()))
        .with_config(ControllerConfig::immediate())
        .with_clock(fixed_clock())
}

async fn resumed(api: &InMemoryLearningApi) -> LearningController {
    let mut controller = controller(api);
    assert_eq!(controller.resume().await, ResumeOutcome::Resumed);
    api.clear_calls();
    controller
}

fn current_index(controller: &LearningController) -> usize {
    controller.state().session().unwrap().current_index()
}

// ─── Resume ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn resume_renders_saved_step_without_advancing() {
    let api = InMemoryLearningApi::new().with_session("Rust", 5, 3);
    let mut controller = controller(&api);

    assert_eq!(controller.resume().await, ResumeOutcome::Resumed);

    let state = controller.state();
    assert_eq!(state.screen().screen, Screen::Learning);
    let session = state.session().unwrap();
    assert_eq!(session.current_index(), 3);
    assert_eq!(session.current_step().title(), "Rust Advanced Patterns");
    assert_eq!(session.progress().percent, 80);
    assert_eq!(state.flashcards().len(), 2);
    assert!(controller.needs_panel_refresh());
    assert_eq!(api.call_count(ApiCall::NextStep), 0);
}

#[tokio::test]
async fn resume_is_idempotent() {
    let api = InMemoryLearningApi::new().with_session("Rust", 4, 2);
    let mut controller = controller(&api);

    controller.resume().await;
    let first = controller.state().session().cloned();
    controller.resume().await;
    assert_eq!(controller.state().session().cloned(), first);
}

#[tokio::test]
async fn resume_without_session_shows_start() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);

    assert_eq!(controller.resume().await, ResumeOutcome::NoSession);
    assert_eq!(controller.state().screen().screen, Screen::Start);
    assert!(controller.state().notice().is_none());
}

#[tokio::test]
async fn resume_failure_never_stays_on_loading() {
    let api = InMemoryLearningApi::new().with_session("Rust", 3, 1);
    api.fail_next(ApiCall::ResumeSession, InjectedFailure::Transport);
    let mut controller = controller(&api);

    assert_eq!(controller.resume().await, ResumeOutcome::Failed);
    assert_eq!(controller.state().screen().screen, Screen::Start);
    assert!(controller.state().session().is_none());
    assert!(controller.state().notice().unwrap().message.starts_with("Error: "));
}

// ─── Navigation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn previous_and_jump_stay_local() {
    let api = InMemoryLearningApi::new().with_session("Go", 4, 2);
    let mut controller = resumed(&api).await;

    assert!(controller.previous().unwrap());
    assert!(controller.previous().unwrap());
    assert!(!controller.previous().unwrap());
    assert_eq!(current_index(&controller), 0);

    controller.jump_to(3).unwrap();
    assert_eq!(current_index(&controller), 3);
    assert!(controller.jump_to(4).is_err());
    assert_eq!(current_index(&controller), 3);

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn next_on_last_step_completes_without_a_call() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 2);
    let mut controller = resumed(&api).await;

    assert_eq!(controller.next().await.unwrap(), NextOutcome::Completed);
    assert_eq!(api.call_count(ApiCall::NextStep), 0);
    assert!(controller.state().is_completed());
    assert_eq!(controller.state().screen().overlay, Overlay::Completion);

    controller.close_overlay();
    assert_eq!(controller.state().screen().overlay, Overlay::Hidden);
}

#[tokio::test]
async fn next_fills_pending_details_from_server() {
    let api = InMemoryLearningApi::new().with_roadmap_len(4);
    let mut controller = controller(&api);
    controller
        .start_topic("Rust", Persona::Eli5, Difficulty::Beginner)
        .await
        .unwrap();
    assert!(controller.state().session().unwrap().steps()[1].details_pending());

    assert_eq!(controller.next().await.unwrap(), NextOutcome::Moved(1));
    let step = controller.state().session().unwrap().current_step();
    assert!(!step.details_pending());
    assert!(!controller.state().flashcards().is_empty());
}

#[tokio::test]
async fn server_index_overrides_local_position() {
    let api = InMemoryLearningApi::new().with_session("Go", 5, 2);
    let mut controller = resumed(&api).await;

    controller.previous().unwrap();
    assert_eq!(current_index(&controller), 1);
    assert_eq!(controller.next().await.unwrap(), NextOutcome::Moved(3));
    assert_eq!(current_index(&controller), 3);

    api.set_progress_gate(Some(3));
    assert_eq!(controller.next().await.unwrap(), NextOutcome::Held);
    assert_eq!(current_index(&controller), 3);
}

#[tokio::test]
async fn failed_next_keeps_the_old_index() {
    let api = InMemoryLearningApi::new().with_session("Go", 4, 1);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::NextStep, InjectedFailure::Application);

    let err = controller.next().await.unwrap_err();
    assert!(matches!(err, ControllerError::Api(_)));
    assert_eq!(current_index(&controller), 1);
    assert!(!controller.state().pending().navigating);
    assert_eq!(
        controller.state().notice().unwrap().message,
        "Error: NextStep failed"
    );

    controller.dismiss_notice();
    assert!(controller.state().notice().is_none());
}

#[tokio::test]
async fn home_and_back_keep_the_session() {
    let api = InMemoryLearningApi::new().with_session("Go", 4, 1);
    let mut controller = resumed(&api).await;

    controller.go_home();
    assert_eq!(controller.state().screen().screen, Screen::Start);
    controller.return_to_learning().unwrap();
    assert_eq!(controller.state().screen().screen, Screen::Learning);
    assert_eq!(current_index(&controller), 1);
}

// ─── Start / reset ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_start_keeps_existing_session() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 1);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::StartTopic, InjectedFailure::Transport);

    assert!(
        controller
            .start_topic("Python", Persona::General, Difficulty::Advanced)
            .await
            .is_err()
    );
    let state = controller.state();
    assert_eq!(state.session().unwrap().topic(), "Go");
    assert_eq!(state.session().unwrap().current_index(), 1);
    assert_eq!(state.screen().screen, Screen::Start);
    assert!(!state.pending().starting);
}

#[tokio::test]
async fn blank_topic_is_rejected_locally() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);

    let err = controller
        .start_topic("   ", Persona::General, Difficulty::Intermediate)
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::EmptyTopic));
    assert_eq!(api.call_count(ApiCall::StartTopic), 0);
}

#[tokio::test]
async fn reset_clears_session_quiz_and_assessment() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    controller
        .start_topic("Rust", Persona::Scientist, Difficulty::Advanced)
        .await
        .unwrap();
    controller.generate_quiz().await.unwrap();
    controller.start_assessment().await.unwrap();
    controller.send_chat("hello").await.unwrap();

    controller.reset_to_start();
    let state = controller.state();
    assert!(state.session().is_none());
    assert_eq!(state.quiz(), &QuizFlow::Idle);
    assert_eq!(state.assessment(), &AssessmentFlow::Intro);
    assert!(state.chat().is_empty());
    assert_eq!(state.screen().screen, Screen::Start);

    controller
        .start_topic("Go", Persona::General, Difficulty::Beginner)
        .await
        .unwrap();
    let state = controller.state();
    assert_eq!(state.session().unwrap().topic(), "Go");
    assert_eq!(state.session().unwrap().current_index(), 0);
    assert_eq!(state.quiz(), &QuizFlow::Idle);
    assert_eq!(state.assessment(), &AssessmentFlow::Intro);
}

// ─── Panels ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn stale_guide_response_is_discarded() {
    let api = InMemoryLearningApi::new().with_session("Go", 4, 0);
    let mut controller = resumed(&api).await;

    let fetcher = controller.panel_fetcher().unwrap();
    controller.jump_to(2).unwrap();
    let stale = fetcher.fetch().await;

    assert!(!controller.apply_panels(stale));
    assert!(controller.state().panels().guide.is_loading());

    assert!(controller.refresh_panels().await);
    assert!(controller.state().panels().guide.ready().is_some());
    assert!(!controller.needs_panel_refresh());
}

#[tokio::test]
async fn declined_resources_fall_back_to_search_links() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::Resources, InjectedFailure::Application);

    controller.refresh_panels().await;
    let resources = controller.state().panels().resources.ready().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].kind, ResourceKind::Article);
    assert_eq!(resources[0].url.host_str(), Some("www.google.com"));
    assert_eq!(resources[1].kind, ResourceKind::Video);
}

#[tokio::test]
async fn unreachable_resources_show_an_error() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::Resources, InjectedFailure::Transport);

    controller.refresh_panels().await;
    assert_eq!(
        controller.state().panels().resources,
        PanelState::Failed("Error loading resources.".into())
    );
    assert!(controller.state().panels().guide.ready().is_some());
}

#[tokio::test]
async fn empty_resource_list_is_shown_as_empty() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;

    let mut fetch = controller.panel_fetcher().unwrap().fetch().await;
    fetch.resources = Ok(Some(Vec::new()));
    assert!(controller.apply_panels(fetch));
    assert_eq!(
        controller.state().panels().resources,
        PanelState::Ready(Vec::new())
    );
}

#[tokio::test]
async fn missing_resource_list_falls_back_to_search_links() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;

    let mut fetch = controller.panel_fetcher().unwrap().fetch().await;
    fetch.resources = Ok(None);
    assert!(controller.apply_panels(fetch));
    let resources = controller.state().panels().resources.ready().unwrap();
    let titles: Vec<_> = resources.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Introduction to Go Foundations", "Deep dive into Go"]);
}

#[tokio::test]
async fn failed_guide_is_surfaced() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::Guide, InjectedFailure::Application);

    controller.refresh_panels().await;
    assert!(matches!(
        controller.state().panels().guide,
        PanelState::Failed(_)
    ));
    assert!(controller.state().notice().is_some());
}

// ─── Notes and chat ──────────────────────────────────────────────────────

#[tokio::test]
async fn notes_save_and_reload() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;

    controller.set_note_draft("   ");
    assert!(!controller.save_note().await.unwrap());
    assert_eq!(api.call_count(ApiCall::SaveNote), 0);

    controller.set_note_draft("Goroutines are cheap");
    assert!(controller.save_note().await.unwrap());
    assert!(controller.note_saved_recently());
    assert_eq!(api.note_for(0).as_deref(), Some("Goroutines are cheap"));

    let mut other = resumed(&api).await;
    other.refresh_panels().await;
    assert_eq!(other.state().note().draft(), "Goroutines are cheap");

    controller.jump_to(1).unwrap();
    assert_eq!(controller.state().note().draft(), "");
}

#[tokio::test]
async fn chat_is_cleaned_and_scoped_to_the_step() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 1);
    let mut controller = resumed(&api).await;

    controller.send_chat("What is a channel?").await.unwrap();
    let messages = controller.state().chat().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(
        messages[1].text,
        "Go Core Concepts\nYou asked: What is a channel?"
    );

    controller.clear_chat().await.unwrap();
    let messages = controller.state().chat().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Chat history cleared.");

    controller.send_chat("again").await.unwrap();
    controller.previous().unwrap();
    assert!(controller.state().chat().is_empty());
}

#[tokio::test]
async fn failed_chat_keeps_the_question() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 1);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::Chat, InjectedFailure::Transport);

    assert!(controller.send_chat("still there?").await.is_err());
    assert_eq!(controller.state().chat().len(), 1);
    assert!(!controller.state().pending().chatting);
}

// ─── Quiz ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quiz_round_trip_scores_on_the_server() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;

    controller.generate_quiz().await.unwrap();
    controller.select_quiz_answer(0, "B".into()).unwrap();
    controller.select_quiz_answer(0, "C".into()).unwrap();
    let sheet = controller.state().quiz().sheet().unwrap();
    assert_eq!(sheet.answered_count(), 1);
    assert_eq!(sheet.selected(0), Some(&OptionKey::from("C")));

    controller.select_quiz_answer(1, "B".into()).unwrap();
    controller.select_quiz_answer(2, "b".into()).unwrap();
    let score = controller.submit_quiz().await.unwrap();
    assert_eq!((score.score, score.total, score.percentage), (2, 3, 67));
    assert!(!score.passed());
    assert_eq!(controller.state().screen().overlay, Overlay::QuizResults);
    assert!(controller.state().quiz().score().is_some());

    controller.close_quiz_results();
    assert_eq!(controller.state().quiz(), &QuizFlow::Idle);
    assert_eq!(controller.state().screen().overlay, Overlay::Hidden);
}

#[tokio::test]
async fn failed_quiz_generation_leaves_panel_empty() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    api.fail_next(ApiCall::GenerateQuiz, InjectedFailure::Transport);

    assert!(controller.generate_quiz().await.is_err());
    assert_eq!(controller.state().quiz(), &QuizFlow::Idle);
    assert!(controller.state().notice().is_some());
}

#[tokio::test]
async fn failed_submission_keeps_selections() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    controller.generate_quiz().await.unwrap();
    controller.select_quiz_answer(1, "A".into()).unwrap();
    api.fail_next(ApiCall::SubmitQuiz, InjectedFailure::Application);

    assert!(controller.submit_quiz().await.is_err());
    let quiz = controller.state().quiz();
    assert!(quiz.can_submit());
    assert_eq!(quiz.sheet().unwrap().selected(1), Some(&OptionKey::from("A")));
}

#[tokio::test]
async fn regenerating_after_results_closes_the_results_overlay() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    controller.generate_quiz().await.unwrap();
    controller.submit_quiz().await.unwrap();
    assert_eq!(controller.state().screen().overlay, Overlay::QuizResults);

    controller.generate_quiz().await.unwrap();
    assert_eq!(controller.state().screen().overlay, Overlay::Hidden);
    assert!(controller.state().quiz().can_submit());
    assert!(controller.state().quiz().score().is_none());
}

#[tokio::test]
async fn failed_regeneration_after_results_leaves_panel_empty() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 0);
    let mut controller = resumed(&api).await;
    controller.generate_quiz().await.unwrap();
    controller.submit_quiz().await.unwrap();
    api.fail_next(ApiCall::GenerateQuiz, InjectedFailure::Application);

    assert!(controller.generate_quiz().await.is_err());
    assert_eq!(controller.state().quiz(), &QuizFlow::Idle);
    assert_eq!(controller.state().screen().overlay, Overlay::Hidden);
}

#[tokio::test]
async fn step_change_discards_the_quiz() {
    let api = InMemoryLearningApi::new().with_session("Go", 3, 1);
    let mut controller = resumed(&api).await;
    controller.generate_quiz().await.unwrap();

    controller.previous().unwrap();
    assert_eq!(controller.state().quiz(), &QuizFlow::Idle);
}

// ─── Career assessment ───────────────────────────────────────────────────

#[tokio::test]
async fn assessment_leads_to_a_new_roadmap() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    controller.start_assessment().await.unwrap();

    assert_eq!(
        controller.answer_assessment("A".into()).await.unwrap(),
        AssessmentStep::Next(1)
    );
    assert_eq!(
        controller.answer_assessment("A".into()).await.unwrap(),
        AssessmentStep::Next(2)
    );
    let AssessmentStep::Recommended(recommendation) =
        controller.answer_assessment("B".into()).await.unwrap()
    else {
        panic!("expected a recommendation");
    };
    assert_eq!(recommendation.recommended_domain, "Software Engineering");
    assert_eq!(api.call_count(ApiCall::AnalyzeAssessment), 1);
    assert_eq!(controller.state().recommendation(), Some(&recommendation));

    controller
        .start_recommended_topic(Persona::General, Difficulty::Beginner)
        .await
        .unwrap();
    let state = controller.state();
    assert_eq!(state.session().unwrap().topic(), "Python Programming");
    assert_eq!(state.assessment(), &AssessmentFlow::Intro);
    assert_eq!(state.screen().screen, Screen::Learning);
}

#[tokio::test]
async fn failed_follow_keeps_the_recommendation() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    controller.start_assessment().await.unwrap();
    for key in ["D", "D", "A"] {
        controller.answer_assessment(key.into()).await.unwrap();
    }
    let recommendation = controller.state().recommendation().cloned().unwrap();
    api.fail_next(ApiCall::StartTopic, InjectedFailure::Transport);

    assert!(
        controller
            .start_recommended_topic(Persona::Scientist, Difficulty::Advanced)
            .await
            .is_err()
    );
    assert_eq!(controller.state().recommendation(), Some(&recommendation));
    assert!(controller.state().session().is_none());

    controller
        .start_recommended_topic(Persona::Scientist, Difficulty::Advanced)
        .await
        .unwrap();
    let state = controller.state();
    assert_eq!(state.session().unwrap().topic(), "Networking Basics");
    assert_eq!(state.session().unwrap().persona(), Persona::Scientist);
    assert_eq!(state.assessment(), &AssessmentFlow::Intro);
}

#[tokio::test]
async fn failed_assessment_generation_returns_to_intro() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    api.fail_next(ApiCall::GenerateAssessment, InjectedFailure::Application);

    assert!(controller.start_assessment().await.is_err());
    assert_eq!(controller.state().assessment(), &AssessmentFlow::Intro);
    assert!(controller.state().notice().is_some());

    controller.start_assessment().await.unwrap();
    assert!(matches!(
        controller.state().assessment(),
        AssessmentFlow::Questions(_)
    ));
}

#[tokio::test]
async fn invalid_answer_keeps_the_question() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    controller.start_assessment().await.unwrap();

    assert!(controller.answer_assessment("Z".into()).await.is_err());
    let AssessmentFlow::Questions(sheet) = controller.state().assessment() else {
        panic!("expected questions");
    };
    assert_eq!(sheet.current(), 0);
}

#[tokio::test]
async fn failed_analysis_returns_to_intro() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);
    controller.start_assessment().await.unwrap();
    api.fail_next(ApiCall::AnalyzeAssessment, InjectedFailure::Transport);

    for key in ["C", "C"] {
        controller.answer_assessment(key.into()).await.unwrap();
    }
    assert!(controller.answer_assessment("D".into()).await.is_err());
    assert_eq!(controller.state().assessment(), &AssessmentFlow::Intro);
}

#[tokio::test]
async fn following_without_results_is_an_error() {
    let api = InMemoryLearningApi::new();
    let mut controller = controller(&api);

    let err = controller
        .start_recommended_topic(Persona::General, Difficulty::Beginner)
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::NoRecommendation));
    assert_eq!(api.call_count(ApiCall::StartTopic), 0);
}

// ─── Dashboard ───────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_survive_reset() {
    let api = InMemoryLearningApi::new().with_session("Go", 2, 1);
    let mut controller = resumed(&api).await;
    controller.next().await.unwrap();

    let stats = controller.load_stats().await.unwrap();
    assert_eq!(stats.total_topics, 1);
    controller.reset_to_start();
    assert_eq!(controller.state().stats(), Some(&stats));
    assert!(controller.export_url().is_none());
}
