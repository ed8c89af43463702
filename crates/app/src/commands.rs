use std::fmt;

use learn_core::model::{Difficulty, OptionKey, Persona};

/// One line typed at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Start {
        topic: String,
        persona: Persona,
        difficulty: Difficulty,
    },
    Next,
    Previous,
    Goto(usize),
    Home,
    Back,
    Reset,
    Card(CardMove),
    Note(String),
    SaveNote,
    Chat(String),
    ClearChat,
    Quiz,
    Pick { question: usize, key: OptionKey },
    Submit,
    Close,
    Assess,
    Answer(OptionKey),
    AssessReset,
    Follow {
        persona: Persona,
        difficulty: Difficulty,
    },
    Stats,
    Export,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardMove {
    Next,
    Previous,
    Flip,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str, what: &'static str },
    InvalidNumber { command: &'static str, raw: String },
    InvalidOption(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command, or `help`"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::MissingArgument { command, what } => {
                write!(f, "`{command}` needs {what}")
            }
            CommandError::InvalidNumber { command, raw } => {
                write!(f, "`{command}` expects a number starting at 1, got `{raw}`")
            }
            CommandError::InvalidOption(raw) => write!(f, "invalid option: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  start <topic> [persona=General|Scientist|ELI5|Socratic] [difficulty=Beginner|Intermediate|Advanced]
  next | prev | goto <n> | home | back | reset
  card next|prev|flip
  note <text> | save
  chat <text> | clear-chat
  quiz | pick <question> <key> | submit | close
  assess | answer <key> | assess-reset | follow [persona=..] [difficulty=..]
  stats | export | help | quit";

/// Parse one prompt line. Step and question numbers are typed 1-based.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "help" | "?" => Ok(Command::Help),
        "start" => parse_start(rest),
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Previous),
        "goto" => Ok(Command::Goto(parse_position("goto", rest)?)),
        "home" => Ok(Command::Home),
        "back" => Ok(Command::Back),
        "reset" => Ok(Command::Reset),
        "card" => match rest.to_ascii_lowercase().as_str() {
            "next" | "" => Ok(Command::Card(CardMove::Next)),
            "prev" => Ok(Command::Card(CardMove::Previous)),
            "flip" => Ok(Command::Card(CardMove::Flip)),
            other => Err(CommandError::Unknown(format!("card {other}"))),
        },
        "note" => Ok(Command::Note(rest.to_owned())),
        "save" => Ok(Command::SaveNote),
        "chat" => required("chat", "a message", rest).map(|text| Command::Chat(text.to_owned())),
        "clear-chat" => Ok(Command::ClearChat),
        "quiz" => Ok(Command::Quiz),
        "pick" => {
            let (question, key) = rest.split_once(char::is_whitespace).ok_or(
                CommandError::MissingArgument {
                    command: "pick",
                    what: "a question number and an option",
                },
            )?;
            Ok(Command::Pick {
                question: parse_position("pick", question)?,
                key: option_key(key)?,
            })
        }
        "submit" => Ok(Command::Submit),
        "close" => Ok(Command::Close),
        "assess" => Ok(Command::Assess),
        "answer" => Ok(Command::Answer(option_key(required(
            "answer", "an option", rest,
        )?)?)),
        "assess-reset" => Ok(Command::AssessReset),
        "follow" => parse_follow(rest),
        "stats" => Ok(Command::Stats),
        "export" => Ok(Command::Export),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(word.to_owned())),
    }
}

/// `persona=` and `difficulty=` words, plus whatever else was typed.
struct Tagged<'a> {
    persona: Persona,
    difficulty: Difficulty,
    words: Vec<&'a str>,
}

fn split_tags(rest: &str) -> Result<Tagged<'_>, CommandError> {
    let mut tagged = Tagged {
        persona: Persona::default(),
        difficulty: Difficulty::default(),
        words: Vec::new(),
    };

    for word in rest.split_whitespace() {
        if let Some(raw) = word.strip_prefix("persona=") {
            tagged.persona = raw
                .parse()
                .map_err(|_| CommandError::InvalidOption(word.to_owned()))?;
        } else if let Some(raw) = word.strip_prefix("difficulty=") {
            tagged.difficulty = raw
                .parse()
                .map_err(|_| CommandError::InvalidOption(word.to_owned()))?;
        } else {
            tagged.words.push(word);
        }
    }
    Ok(tagged)
}

fn parse_start(rest: &str) -> Result<Command, CommandError> {
    let tagged = split_tags(rest)?;
    let topic = tagged.words.join(" ");
    required("start", "a topic", &topic)?;
    Ok(Command::Start {
        topic,
        persona: tagged.persona,
        difficulty: tagged.difficulty,
    })
}

fn parse_follow(rest: &str) -> Result<Command, CommandError> {
    let tagged = split_tags(rest)?;
    if let Some(stray) = tagged.words.first() {
        return Err(CommandError::InvalidOption((*stray).to_owned()));
    }
    Ok(Command::Follow {
        persona: tagged.persona,
        difficulty: tagged.difficulty,
    })
}

fn required<'a>(
    command: &'static str,
    what: &'static str,
    value: &'a str,
) -> Result<&'a str, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CommandError::MissingArgument { command, what })
    } else {
        Ok(value)
    }
}

fn parse_position(command: &'static str, raw: &str) -> Result<usize, CommandError> {
    let raw = required(command, "a number", raw)?;
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidNumber {
            command,
            raw: raw.to_owned(),
        })
}

fn option_key(raw: &str) -> Result<OptionKey, CommandError> {
    let raw = raw.trim();
    if raw.len() == 1 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(OptionKey::new(raw))
    } else {
        Err(CommandError::InvalidOption(raw.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_collects_topic_and_tags() {
        assert_eq!(
            parse_command("start Machine Learning persona=eli5 difficulty=Advanced"),
            Ok(Command::Start {
                topic: "Machine Learning".into(),
                persona: Persona::Eli5,
                difficulty: Difficulty::Advanced,
            })
        );
        assert_eq!(
            parse_command("start Rust"),
            Ok(Command::Start {
                topic: "Rust".into(),
                persona: Persona::General,
                difficulty: Difficulty::Intermediate,
            })
        );
    }

    #[test]
    fn start_rejects_missing_topic_and_bad_tags() {
        assert!(matches!(
            parse_command("start persona=General"),
            Err(CommandError::MissingArgument { command: "start", .. })
        ));
        assert_eq!(
            parse_command("start Rust persona=Pirate"),
            Err(CommandError::InvalidOption("persona=Pirate".into()))
        );
    }

    #[test]
    fn follow_takes_the_same_tags_as_start() {
        assert_eq!(
            parse_command("follow persona=Socratic difficulty=beginner"),
            Ok(Command::Follow {
                persona: Persona::Socratic,
                difficulty: Difficulty::Beginner,
            })
        );
        assert_eq!(
            parse_command("follow"),
            Ok(Command::Follow {
                persona: Persona::General,
                difficulty: Difficulty::Intermediate,
            })
        );
        assert_eq!(
            parse_command("follow now"),
            Err(CommandError::InvalidOption("now".into()))
        );
    }

    #[test]
    fn positions_are_typed_one_based() {
        assert_eq!(parse_command("goto 3"), Ok(Command::Goto(2)));
        assert!(matches!(
            parse_command("goto 0"),
            Err(CommandError::InvalidNumber { .. })
        ));
        assert_eq!(
            parse_command("pick 2 c"),
            Ok(Command::Pick {
                question: 1,
                key: OptionKey::new("C"),
            })
        );
    }

    #[test]
    fn answer_needs_a_single_letter() {
        assert_eq!(
            parse_command("answer b"),
            Ok(Command::Answer(OptionKey::new("B")))
        );
        assert_eq!(
            parse_command("answer bb"),
            Err(CommandError::InvalidOption("bb".into()))
        );
    }

    #[test]
    fn free_text_keeps_inner_spacing() {
        assert_eq!(
            parse_command("chat  what is  a lifetime?"),
            Ok(Command::Chat("what is  a lifetime?".into()))
        );
        assert_eq!(parse_command("note"), Ok(Command::Note(String::new())));
    }

    #[test]
    fn aliases_and_unknowns() {
        assert_eq!(parse_command("  N "), Ok(Command::Next));
        assert_eq!(parse_command("card flip"), Ok(Command::Card(CardMove::Flip)));
        assert_eq!(parse_command(""), Err(CommandError::Empty));
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
