use std::fmt;
use std::io::{self, BufRead, Write};

use quiz_core::QuizReport;
use quiz_core::model::{Leverage, Question, QuizSession};
use services::{
    Clock, Locale, QuizAction, QuizFlowService, QuizGenerator, QuizProgress,
    offline_question_set,
};
use storage::repository::Storage;

const DEFAULT_SESSION_KEY: &str = "current";
const DEFAULT_TOPIC: &str = "General knowledge";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
    eprintln!("  cargo run -p app -- play   [--db <sqlite_url>] [--topic <topic>] [--locale <tag>] [--offline]");
    eprintln!("  cargo run -p app -- resume [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --topic \"{DEFAULT_TOPIC}\"");
    eprintln!("  --locale en");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_TOPIC, QUIZ_AI_API_KEY, QUIZ_SEARCH_API_KEY");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Resume,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "resume" => Some(Self::Resume),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    topic: Option<String>,
    locale: Locale,
    offline: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut topic = std::env::var("QUIZ_TOPIC")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut locale = Locale::English;
        let mut offline = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--topic" => {
                    topic = Some(require_value(args, "--topic")?);
                }
                "--locale" => {
                    locale = Locale::from_tag(&require_value(args, "--locale")?);
                }
                "--offline" => {
                    offline = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            topic,
            locale,
            offline,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: start a new quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let flow = QuizFlowService::new(Clock::default_clock(), storage.sessions.clone());

    match cmd {
        Command::Play => {
            let topic = parsed
                .topic
                .clone()
                .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
            let questions = if parsed.offline {
                offline_question_set(&topic)
            } else {
                let generator = QuizGenerator::from_env();
                if generator.enabled() {
                    generator.generate(&topic, parsed.locale).await?
                } else {
                    eprintln!("QUIZ_AI_API_KEY is not set; using built-in questions.");
                    offline_question_set(&topic)
                }
            };
            let mut session = flow.start(DEFAULT_SESSION_KEY, topic, questions).await?;
            play(&flow, &mut session).await
        }
        Command::Resume => {
            let Some(mut session) = flow.resume(DEFAULT_SESSION_KEY).await? else {
                eprintln!("no saved quiz to resume; run `play` first.");
                return Ok(());
            };
            if session.is_complete() {
                print_report(&QuizReport::from_session(&session)?);
                return Ok(());
            }
            let progress = QuizProgress::of(&session);
            println!(
                "Resuming \"{}\" at question {} of {} ({} answered).",
                session.topic(),
                session.current_index() + 1,
                progress.total,
                progress.answered
            );
            play(&flow, &mut session).await
        }
    }
}

async fn play(
    flow: &QuizFlowService,
    session: &mut QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_complete() {
        print_question(session);

        let Some(input) = next_line(&mut lines)? else {
            println!("Progress saved. Run `resume` to pick up where you left off.");
            return Ok(());
        };
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            continue;
        }
        if input == "q" || input == "quit" {
            println!("Progress saved. Run `resume` to pick up where you left off.");
            return Ok(());
        }

        if let Some(leverage) = parse_leverage(&input) {
            let outcome = flow
                .dispatch(
                    DEFAULT_SESSION_KEY,
                    session,
                    QuizAction::SelectLeverage(leverage),
                )
                .await?;
            if outcome.changed {
                println!("Leverage {leverage} armed for this question.");
            } else {
                println!("Leverage {leverage} is not available right now.");
            }
            continue;
        }

        let Some(choice) = parse_choice(&input) else {
            println!("Answer with a letter (A-D), pick a leverage (0.5 / 2 / 3), or q to quit.");
            continue;
        };

        let outcome = flow
            .dispatch(DEFAULT_SESSION_KEY, session, QuizAction::Answer(choice))
            .await?;
        if let Some(answer) = outcome.answer {
            let question = &session.questions().as_slice()[answer.question_index];
            print_feedback(question, answer.correct, answer.points);
            println!("Score: {}", session.score());
        }

        println!();
        println!("Press Enter for the next question.");
        if next_line(&mut lines)?.is_none() {
            println!("Progress saved. Run `resume` to pick up where you left off.");
            return Ok(());
        }
        flow.dispatch(DEFAULT_SESSION_KEY, session, QuizAction::Advance)
            .await?;
    }

    print_report(&QuizReport::from_session(session)?);
    Ok(())
}

fn next_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<String>, io::Error> {
    io::stdout().flush()?;
    lines.next().transpose()
}

fn print_question(session: &QuizSession) {
    let index = session.current_index();
    let question = &session.questions().as_slice()[index];

    println!();
    println!(
        "Question {} of {} — {}",
        index + 1,
        session.questions().len(),
        session.topic()
    );
    println!("{}", question.text());
    for (i, option) in question.options().iter().enumerate() {
        let letter = char::from(b'A' + u8::try_from(i).unwrap_or(0));
        println!("  {letter}) {option}");
    }

    if let Some(pending) = session.pending_leverage() {
        println!("Leverage armed: {pending}");
    } else {
        let available: Vec<String> = session
            .leverages()
            .available()
            .map(|l| l.to_string())
            .collect();
        if !available.is_empty() {
            println!("Leverages available: {}", available.join(", "));
        }
    }
    print!("> ");
}

fn print_feedback(question: &Question, correct: bool, points: i64) {
    if correct {
        println!("Correct! {points:+} points.");
    } else {
        let letter = char::from(b'A' + u8::try_from(question.correct_answer()).unwrap_or(0));
        println!(
            "Wrong ({points:+} points). The answer was {letter}) {}.",
            question.options()[question.correct_answer()]
        );
    }
    let explanation = question.explanation();
    if !explanation.is_empty() {
        println!("{explanation}");
    }
}

fn parse_leverage(input: &str) -> Option<Leverage> {
    let raw = input.strip_suffix('x').unwrap_or(input);
    match raw {
        "half" => Some(Leverage::Half),
        "double" => Some(Leverage::Double),
        "triple" => Some(Leverage::Triple),
        _ => raw
            .parse::<f64>()
            .ok()
            .filter(|m| (*m - 1.0).abs() > f64::EPSILON)
            .and_then(Leverage::from_multiplier),
    }
}

fn parse_choice(input: &str) -> Option<usize> {
    match input {
        "a" => Some(0),
        "b" => Some(1),
        "c" => Some(2),
        "d" => Some(3),
        _ => None,
    }
}

fn print_report(report: &QuizReport) {
    println!();
    println!("Quiz complete — {}", report.topic());
    println!(
        "{} of {} correct ({}%).",
        report.correct_count(),
        report.total_questions(),
        report.percentage()
    );
    println!();
    for (i, (points, cumulative)) in report
        .question_points()
        .iter()
        .zip(report.cumulative_scores())
        .enumerate()
    {
        let leverage = report.question_leverages()[i]
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        println!("  Q{:<2} {points:+}{leverage} => {cumulative}", i + 1);
    }
    println!();
    println!("Final score: {}", report.final_score());
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
