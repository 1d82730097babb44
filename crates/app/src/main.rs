use std::fmt;
use std::sync::Arc;

use tracing::info;

use providers::sample;
use quiz_core::model::{OptionLabel, Subject};
use services::{Clock, Intent, Mode, SessionConfig, SessionRunner};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBudget { raw: String },
    InvalidCount { raw: String },
    InvalidLabel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBudget { raw } => write!(f, "invalid --budget value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --expire-after value: {raw}"),
            ArgsError::InvalidLabel { raw } => write!(f, "invalid --answer value: {raw}"),
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
    eprintln!("  cargo run -p app -- [--budget <secs>] [--answer <label>] [--expire-after <n>]");
    eprintln!();
    eprintln!("Walks the bundled assessment with a scripted taker.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --budget 1800     time budget for the timed block, in seconds");
    eprintln!("  --answer a        option label the scripted taker picks everywhere");
    eprintln!("  --expire-after -  drain the timer after answering <n> questions,");
    eprintln!("                    demonstrating the forced jump to the untimed block");
}

struct Args {
    budget_secs: u32,
    answer: OptionLabel,
    expire_after: Option<usize>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut budget_secs = sample::TIME_BUDGET_SECS;
        let mut answer = OptionLabel::new("a").expect("default label is non-empty");
        let mut expire_after = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--budget" => {
                    let value = require_value(args, "--budget")?;
                    budget_secs = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidBudget { raw: value.clone() })?;
                }
                "--answer" => {
                    let value = require_value(args, "--answer")?;
                    answer = OptionLabel::new(value.clone())
                        .map_err(|_| ArgsError::InvalidLabel { raw: value })?;
                }
                "--expire-after" => {
                    let value = require_value(args, "--expire-after")?;
                    let parsed: usize = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    expire_after = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            budget_secs,
            answer,
            expire_after,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let provider = sample::provider();
    let sink = sample::sink();
    let config = SessionConfig::new(sample::core_subjects(), args.budget_secs);
    let runner = SessionRunner::new(
        Clock::default_clock(),
        Arc::new(provider),
        Arc::new(sink),
        config,
    );

    let mut session = runner.start().await?;
    let mut answered = 0_usize;

    while !session.is_complete() {
        match session.mode() {
            Mode::AwaitingAnswer => {
                log_current(&session);
                runner
                    .handle(&mut session, Intent::AnswerSelected(args.answer.clone()))
                    .await?;
                runner.handle(&mut session, Intent::Next).await?;
                answered += 1;

                if args.expire_after == Some(answered) {
                    drain_timer(&runner, &mut session).await?;
                }
            }
            Mode::TransitionScreen => {
                info!("timed block finished; continuing to the untimed section");
                runner
                    .handle(&mut session, Intent::ContinueFromTransition)
                    .await?;
            }
            Mode::Loading => {
                // The bundled bank never fails, so a stalled load means the
                // outstanding fetch needs a retry.
                runner.retry_fetch(&mut session).await?;
            }
            mode => {
                return Err(format!("session stalled in {mode:?}").into());
            }
        }
    }

    let report = session
        .report()
        .ok_or("completed session is missing its report")?;
    println!("{}", report.body());
    Ok(())
}

fn log_current(session: &services::QuizSession) {
    let view = session.view();
    let prompt = session
        .current_question()
        .map_or("<not loaded>", |q| q.prompt());
    info!(
        subject = %session.current_subject(),
        question = view.question_index + 1,
        of = view.total_in_subject,
        remaining = view.remaining_seconds,
        "{prompt}"
    );
}

/// Deliver ticks until the countdown stops itself, forcing the expiry jump.
async fn drain_timer(
    runner: &SessionRunner,
    session: &mut services::QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    while session.view().timer_running {
        runner.handle(session, Intent::ClockTick).await?;
    }
    info!("time budget exhausted");
    Ok(())
}

fn subjects_line(subjects: &[Subject]) -> String {
    subjects
        .iter()
        .map(Subject::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        "timed subjects: {}",
        subjects_line(&sample::core_subjects())
    );

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
