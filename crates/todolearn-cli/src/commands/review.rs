//! The `todolearn review` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use todolearn_core::config::parse_mode_list;
use todolearn_core::session::SessionStats;
use todolearn_core::{DeckStore, ModeRegistry, Reply, ReviewResult, ReviewSession, SessionStep};

pub fn execute(
    deck_path: Option<PathBuf>,
    modes: Option<String>,
    batch_size: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = super::open_store(deck_path, config_path.as_deref())?;
    let batch_size = batch_size.unwrap_or(config.new_cards_per_batch);
    anyhow::ensure!(batch_size >= 1, "batch size must be at least 1");

    let mut deck = store.load()?;
    let registry = ModeRegistry::with_builtin();
    let modes = modes.map(|m| parse_mode_list(&m)).unwrap_or(config.modes);

    let session = ReviewSession::new(&mut deck, &registry, &modes)?.with_batch_size(batch_size);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = run_session(session, stdin.lock(), stdout.lock(), &config.quit_command);

    // Answers recorded before a failure are still saved.
    store.save(&deck)?;
    let stats = outcome?;
    println!(
        "\nReviewed {} card(s), {} correct, {} new.",
        stats.reviewed, stats.correct, stats.introduced
    );
    Ok(())
}

/// Drive a session over line-oriented input until the learner quits, the
/// input ends, or the deck runs out of cards.
pub(crate) fn run_session<R: BufRead, W: Write>(
    mut session: ReviewSession<'_>,
    mut input: R,
    mut output: W,
    quit: &str,
) -> Result<SessionStats> {
    let mut step = session.start()?;

    loop {
        if let Some(result) = step.previous() {
            print_result(&mut output, result)?;
        }
        let review = match &step {
            SessionStep::Question { review, .. } => review,
            SessionStep::Finished { .. } => {
                writeln!(output, "No more cards.")?;
                break;
            }
        };

        writeln!(output, "Front: {}", review.question())?;
        write!(output, "Back ([{quit}]uit): ")?;
        output.flush()?;

        let mut line = String::new();
        let reply = if input.read_line(&mut line)? == 0 {
            Reply::Stop
        } else {
            Reply::from_input(line.trim_end_matches(['\r', '\n']), quit)
        };
        if reply == Reply::Stop {
            session.respond(reply)?;
            break;
        }
        step = session.respond(reply)?;
    }

    Ok(session.stats())
}

fn print_result<W: Write>(output: &mut W, result: &ReviewResult) -> Result<()> {
    let suffix = if result.is_correct() {
        String::new()
    } else {
        format!(" (Correct: {})", result.review.correct_response)
    };
    let icon = if result.mark > 0 { "🎉" } else { "❌" };
    writeln!(output, "{icon}{suffix}")?;
    Ok(())
}
