//! Command-line front end for the speed-reading engine.
//!
//! - Parse command-line arguments.
//! - Load configuration from `conf/config.toml`.
//! - Read the book fragments and run the requested command.

use anyhow::{Context, Result, anyhow, bail};
use quickread::cadence::{CadenceTick, ThreadCadence};
use quickread::config::{EngineConfig, load_config};
use quickread::ingest::read_fragments;
use quickread::playback::RunState;
use quickread::session::ReaderSession;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc,
};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: quickread <path> [chapters | summary <chapter> | graph <chapter> | read]";
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Chapters,
    Summary { chapter: usize },
    Graph { chapter: usize },
    Read,
}

#[derive(Debug)]
struct CliArgs {
    path: PathBuf,
    command: CliCommand,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %args.path.display(),
        level = %config.log_level,
        page_size = config.page_size,
        wpm = config.wpm,
        finish = %config.finish_behavior,
        "Starting quickread"
    );

    let fragments = read_fragments(&args.path)?;
    let (ticks_tx, ticks_rx) = mpsc::channel();
    let mut session = ReaderSession::new(config, ThreadCadence::new(ticks_tx));
    session.load_fragments(fragments);

    match args.command {
        CliCommand::Chapters => print_chapters(&session),
        CliCommand::Summary { chapter } => {
            for sentence in &session.chapter_summary(chapter).sentences {
                println!("{sentence}");
            }
        }
        CliCommand::Graph { chapter } => {
            let json = serde_json::to_string_pretty(session.chapter_graph(chapter))
                .context("failed to serialize keyword graph")?;
            println!("{json}");
        }
        CliCommand::Read => read_aloud(&mut session, &ticks_rx)?,
    }
    Ok(())
}

fn print_chapters(session: &ReaderSession<ThreadCadence>) {
    for (index, chapter) in session.document().chapters().iter().enumerate() {
        println!("{index:>3}  word {:>7}  {}", chapter.start_word_index, chapter.title);
    }
}

/// Flash words in place until the book finishes or Ctrl-C is pressed.
fn read_aloud(
    session: &mut ReaderSession<ThreadCadence>,
    ticks: &mpsc::Receiver<CadenceTick>,
) -> Result<()> {
    if session.document().is_empty() {
        warn!("Nothing to read");
        return Ok(());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    session.play();
    render_word(session)?;
    while !stop.load(Ordering::SeqCst) {
        let Ok(tick) = ticks.recv_timeout(POLL_INTERVAL) else {
            continue;
        };
        if session.on_tick(tick) {
            if session.playback().run_state() == RunState::Finished {
                break;
            }
            render_word(session)?;
        }
    }
    session.pause();
    println!();

    let state = session.playback().state();
    info!(
        word = state.current_word_index,
        page = state.current_page_index,
        chapter = state.current_chapter_index,
        "Reading stopped"
    );
    Ok(())
}

fn render_word(session: &ReaderSession<ThreadCadence>) -> Result<()> {
    let snapshot = session.snapshot();
    let Some(word) = snapshot.current_word else {
        return Ok(());
    };
    let emphasis = word.emphasis;
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "\r\x1b[2K\x1b[1m{}\x1b[0m{}{}   [{}/{}]",
        emphasis.bold, emphasis.plain, emphasis.suffix, snapshot.word_position, snapshot.word_count
    )
    .context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let path = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let command = match args.next().as_deref() {
        None | Some("read") => CliCommand::Read,
        Some("chapters") => CliCommand::Chapters,
        Some("summary") => CliCommand::Summary {
            chapter: parse_chapter(args.next())?,
        },
        Some("graph") => CliCommand::Graph {
            chapter: parse_chapter(args.next())?,
        },
        Some(other) => bail!("Unknown command `{other}`. {USAGE}"),
    };
    Ok(CliArgs { path, command })
}

fn parse_chapter(arg: Option<String>) -> Result<usize> {
    match arg {
        None => Ok(0),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("chapter must be a number, got `{raw}`")),
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new(EngineConfig::default().log_level.as_filter_str()));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
