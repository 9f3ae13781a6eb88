//! Terminal front end for the quiz engine.
//!
//! This binary is a thin presentation adapter: it renders [`ScreenView`] data
//! to the terminal and feeds the user's keystrokes back in as [`UiEvent`]s.
//! All quiz logic lives in the services and core crates.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::Answer;
use services::{
    Controls, Mode, QuestionSource, QuizConfig, QuizService, ScreenView, SourceLoader, UiEvent,
};
use storage::JsonFileHistory;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    MissingManifest,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
            ArgsError::MissingManifest => write!(f, "discover requires --manifest <src>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run      [options]");
    eprintln!("  cargo run -p app -- discover --manifest <url-or-file>");
    eprintln!();
    eprintln!("Options for run:");
    eprintln!("  --internal <url-or-file>   question source (default ./questions_all_completed_marked_filled.json)");
    eprintln!("  --external <url-or-file>   external teacher questions");
    eprintln!("  --include-external         load the external source from the start");
    eprintln!("  --history <file>           history file (default ./exam-history.json)");
    eprintln!("  --session-size <n>         questions per test (default 10)");
    eprintln!("  --min-pool <n>             minimum pool size for a test (default 10)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Discover,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Command::Run),
            "discover" => Some(Command::Discover),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    internal: String,
    external: Option<String>,
    include_external: bool,
    history: PathBuf,
    session_size: Option<usize>,
    min_pool: Option<usize>,
    manifest: Option<String>,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(flag: &'static str, raw: String) -> Result<usize, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let mut args = args.peekable();
    let command = match args.peek().map(String::as_str).and_then(Command::from_arg) {
        Some(command) => {
            args.next();
            command
        }
        None => Command::Run,
    };

    let mut parsed = Args {
        command,
        internal: "./questions_all_completed_marked_filled.json".to_owned(),
        external: None,
        include_external: false,
        history: PathBuf::from("./exam-history.json"),
        session_size: None,
        min_pool: None,
        manifest: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--internal" => parsed.internal = require_value(&mut args, "--internal")?,
            "--external" => parsed.external = Some(require_value(&mut args, "--external")?),
            "--include-external" => parsed.include_external = true,
            "--history" => {
                parsed.history = PathBuf::from(require_value(&mut args, "--history")?);
            }
            "--session-size" => {
                let raw = require_value(&mut args, "--session-size")?;
                parsed.session_size = Some(parse_number("--session-size", raw)?);
            }
            "--min-pool" => {
                let raw = require_value(&mut args, "--min-pool")?;
                parsed.min_pool = Some(parse_number("--min-pool", raw)?);
            }
            "--manifest" => parsed.manifest = Some(require_value(&mut args, "--manifest")?),
            other => return Err(ArgsError::UnknownArg(other.to_owned())),
        }
    }

    Ok(parsed)
}

fn build_config(args: &Args) -> QuizConfig {
    let mut config = QuizConfig::new(QuestionSource::parse(&args.internal))
        .with_include_external_default(args.include_external);
    if let Some(external) = &args.external {
        config = config.with_external_source(QuestionSource::parse(external));
    }
    if let Some(size) = args.session_size {
        config = config.with_test_session_size(size);
    }
    if let Some(min) = args.min_pool {
        config = config.with_min_pool_for_test(min);
    }
    config
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            std::process::exit(2);
        }
    };

    match args.command {
        Command::Discover => {
            let Some(manifest) = &args.manifest else {
                eprintln!("error: {}", ArgsError::MissingManifest);
                print_usage();
                std::process::exit(2);
            };
            let loader = SourceLoader::new();
            match loader.discover(&QuestionSource::parse(manifest)).await {
                Ok(files) => {
                    for file in files {
                        println!("{file}");
                    }
                }
                Err(e) => {
                    eprintln!("error: could not read manifest: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Run => {
            let config = build_config(&args);
            let history = Arc::new(JsonFileHistory::new(args.history.clone()));
            let mut service = QuizService::new(config, history);
            let view = service.init().await;
            run_loop(&mut service, view).await;
        }
    }
}

async fn run_loop(service: &mut QuizService, mut view: ScreenView) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let event = match &view {
            ScreenView::Start { pool_size, history, alert } => {
                render_start(*pool_size, history, alert.as_deref());
                match prompt_start(&mut lines, service.include_external()) {
                    Some(event) => event,
                    None => return,
                }
            }
            ScreenView::Question(question) => {
                match prompt_question(service, question.clone(), &mut lines).await {
                    Some(event) => event,
                    None => return,
                }
            }
            ScreenView::Result { result, message } => {
                println!();
                println!("── Prüfungsergebnis ──");
                println!(
                    "{} von {} richtig ({:.0}%)",
                    result.score, result.total, result.percentage
                );
                println!("{}", result.grade.label());
                println!("{message}");
                print!("[Enter] zurück zum Start > ");
                flush();
                if lines.next().is_none() {
                    return;
                }
                UiEvent::RequestRefresh
            }
        };

        view = service.handle_event(event).await.view;
    }
}

fn render_start(pool_size: usize, history: &[quiz_core::model::ExamResult], alert: Option<&str>) {
    println!();
    println!("── Lern-App ──");
    if let Some(alert) = alert {
        println!("! {alert}");
    }
    println!("{pool_size} Fragen geladen.");
    if history.is_empty() {
        println!("Noch keine Prüfungen absolviert.");
    } else {
        println!("Letzte Versuche:");
        for result in history {
            println!(
                "  {}  {}/{}  {}",
                result.date.format("%Y-%m-%d %H:%M"),
                result.score,
                result.total,
                result.grade.label()
            );
        }
    }
}

fn prompt_start(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    include_external: bool,
) -> Option<UiEvent> {
    loop {
        print!("[l]ernen  [t]esten  [x] externe Fragen ({include_external})  [r] neu laden  [q] beenden > ");
        flush();
        let line = next_line(lines)?;
        match line.trim() {
            "l" => return Some(UiEvent::SelectMode(Mode::Learn)),
            "t" => return Some(UiEvent::SelectMode(Mode::Test)),
            "x" => return Some(UiEvent::ToggleIncludeExternal(!include_external)),
            "r" => return Some(UiEvent::RequestRefresh),
            "q" => return None,
            _ => {}
        }
    }
}

async fn prompt_question(
    service: &mut QuizService,
    question: services::QuestionView,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Option<UiEvent> {
    println!();
    if question.show_progress {
        println!("Frage {} von {}", question.index + 1, question.total);
    }
    println!("{}", question.text);

    let answer = read_answer(&question.controls, lines)?;

    let Some(answer) = answer else {
        // Skipped; in test mode the question simply stays unanswered.
        return Some(UiEvent::Advance);
    };

    let outcome = service.handle_event(UiEvent::SubmitAnswer(answer)).await;
    if let Some(feedback) = outcome.feedback {
        if feedback.correct {
            println!("Richtig!");
        } else {
            println!("Leider falsch. Richtige Antwort: {}", feedback.correct_display);
        }
        if let Some(explanation) = feedback.explanation {
            println!("Begründung: {explanation}");
        }
        print!("[Enter] nächste Frage > ");
        flush();
        next_line(lines)?;
    }
    Some(UiEvent::Advance)
}

/// Reads an answer for the given controls. `Ok(None)` means skipped.
fn read_answer(
    controls: &Controls,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Option<Option<Answer>> {
    match controls {
        Controls::Options { options, multiple } => {
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
            if *multiple {
                print!("Nummern (z.B. 1,3), leer = überspringen > ");
            } else {
                print!("Nummer, leer = überspringen > ");
            }
            flush();
            let line = next_line(lines)?;
            let picks = parse_picks(&line, options.len());
            if picks.is_empty() {
                return Some(None);
            }
            let selected = picks
                .into_iter()
                .map(|i| options[i].clone())
                .collect::<Vec<_>>();
            Some(Some(Answer::Selection(selected)))
        }
        Controls::TextInput => {
            print!("Antwort, leer = überspringen > ");
            flush();
            let line = next_line(lines)?;
            let text = line.trim();
            if text.is_empty() {
                Some(None)
            } else {
                Some(Some(Answer::Text(text.to_owned())))
            }
        }
        Controls::Sortable { fields } => {
            for (i, field) in fields.iter().enumerate() {
                println!("  {}) {field}", i + 1);
            }
            print!("Reihenfolge (z.B. 2,3,1), leer = überspringen > ");
            flush();
            let line = next_line(lines)?;
            let order = parse_picks(&line, fields.len());
            if order.is_empty() {
                Some(None)
            } else {
                Some(Some(Answer::Order(order)))
            }
        }
        Controls::Matching { left, right } => {
            for (i, option) in right.iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
            let mut pairs = Vec::new();
            for left_option in left {
                print!("{left_option} passt zu Nummer > ");
                flush();
                let line = next_line(lines)?;
                if let Some(&pick) = parse_picks(&line, right.len()).first() {
                    pairs.push((left_option.clone(), right[pick].clone()));
                }
            }
            if pairs.is_empty() {
                Some(None)
            } else {
                Some(Some(Answer::Matches(pairs)))
            }
        }
    }
}

/// Parses a comma-separated list of 1-based picks into 0-based indices,
/// dropping anything out of range.
fn parse_picks(line: &str, len: usize) -> Vec<usize> {
    line.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter_map(|n| n.checked_sub(1))
        .filter(|&i| i < len)
        .collect()
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<String> {
    lines.next()?.ok()
}

fn flush() {
    let _ = io::stdout().flush();
}
