mod commands;
mod render;

use std::fmt;
use std::sync::Arc;

use learn_core::flow::Overlay;
use services::{
    ApiConfig, ControllerConfig, HttpLearningApi, InMemoryLearningApi, LearningApi,
    LearningController, NextOutcome, ResumeOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CardMove, Command, HELP, parse_command};
use crate::render::{render_notice, render_view};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url>] [--demo]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --base-url  learning backend (default http://127.0.0.1:5000)");
    eprintln!("  --demo      use the in-memory backend instead of HTTP");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_API_BASE_URL, LEARN_API_TIMEOUT_SECS, LEARN_LOG (or RUST_LOG)");
}

enum Backend {
    Http(ApiConfig),
    Demo,
}

struct Args {
    backend: Backend,
}

impl Args {
    /// Flags win over the environment; `lookup` is only consulted for what they leave
    /// unset, and not at all with `--demo`.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut base_url = None;
        let mut demo = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => base_url = Some(require_value(args, "--base-url")?),
                "--demo" => demo = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if demo {
            return Ok(Some(Self {
                backend: Backend::Demo,
            }));
        }

        let raw = base_url
            .clone()
            .or_else(|| lookup("LEARN_API_BASE_URL"))
            .unwrap_or_default();
        let api = ApiConfig::from_lookup(|key| match key {
            "LEARN_API_BASE_URL" => base_url.clone().or_else(|| lookup(key)),
            _ => lookup(key),
        })
        .map_err(|_| ArgsError::InvalidBaseUrl { raw })?;
        Ok(Some(Self {
            backend: Backend::Http(api),
        }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LEARN_LOG").unwrap_or_else(|_| "info".into()))
    });
    // Logs go to stderr so the prompt output stays readable.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    let api: Arc<dyn LearningApi> = match args.backend {
        Backend::Http(config) => {
            info!(base_url = %config.base_url, "using learning backend");
            Arc::new(HttpLearningApi::new(&config)?)
        }
        Backend::Demo => {
            info!("using in-memory demo backend");
            Arc::new(InMemoryLearningApi::new())
        }
    };

    let mut controller = LearningController::new(api).with_config(ControllerConfig::default());
    if controller.resume().await == ResumeOutcome::Resumed {
        controller.refresh_panels().await;
    }
    let _ = controller.load_stats().await;
    show(&mut controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Some(message) = execute(&mut controller, command).await {
            println!("{message}");
        }
        if controller.needs_panel_refresh() {
            controller.refresh_panels().await;
        }
        show(&mut controller);
    }

    Ok(())
}

fn show(controller: &mut LearningController) {
    println!("{}", render_view(controller));
    if let Some(notice) = render_notice(controller) {
        println!("{notice}");
        controller.dismiss_notice();
    }
    print!("> ");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

/// Run one command. Errors are already on the notice; only extra feedback is returned.
async fn execute(controller: &mut LearningController, command: Command) -> Option<String> {
    debug!(?command, "command");
    match command {
        Command::Help => return Some(HELP.to_owned()),
        Command::Start {
            topic,
            persona,
            difficulty,
        } => {
            let _ = controller.start_topic(&topic, persona, difficulty).await;
        }
        Command::Next => {
            if let Ok(NextOutcome::Held) = controller.next().await {
                return Some("The server kept you on this step.".to_owned());
            }
        }
        Command::Previous => {
            let _ = controller.previous();
        }
        Command::Goto(index) => {
            let _ = controller.jump_to(index);
        }
        Command::Home => controller.go_home(),
        Command::Back => {
            let _ = controller.return_to_learning();
        }
        Command::Reset => {
            controller.reset_to_start();
            let _ = controller.load_stats().await;
        }
        Command::Card(CardMove::Next) => controller.flashcards_next(),
        Command::Card(CardMove::Previous) => controller.flashcards_previous(),
        Command::Card(CardMove::Flip) => controller.flip_flashcard(),
        Command::Note(text) => controller.set_note_draft(text),
        Command::SaveNote => {
            if let Ok(false) = controller.save_note().await {
                return Some("Nothing to save.".to_owned());
            }
        }
        Command::Chat(text) => {
            let _ = controller.send_chat(&text).await;
        }
        Command::ClearChat => {
            let _ = controller.clear_chat().await;
        }
        Command::Quiz => {
            let _ = controller.generate_quiz().await;
        }
        Command::Pick { question, key } => {
            if let Err(err) = controller.select_quiz_answer(question, key) {
                return Some(err.to_string());
            }
        }
        Command::Submit => {
            let _ = controller.submit_quiz().await;
        }
        Command::Close => {
            if controller.state().screen().overlay == Overlay::QuizResults {
                controller.close_quiz_results();
            } else {
                controller.close_overlay();
            }
        }
        Command::Assess => {
            let _ = controller.start_assessment().await;
        }
        Command::Answer(key) => {
            if let Err(err) = controller.answer_assessment(key).await {
                return Some(err.to_string());
            }
        }
        Command::AssessReset => controller.reset_assessment(),
        Command::Follow {
            persona,
            difficulty,
        } => {
            let _ = controller.start_recommended_topic(persona, difficulty).await;
        }
        Command::Stats => {
            let _ = controller.load_stats().await;
        }
        Command::Export => {
            return Some(controller.export_url().map_or_else(
                || "Export is not available for this backend.".to_owned(),
                |url| format!("Download your notes: {url}"),
            ));
        }
        Command::Quit => {}
    }
    None
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
