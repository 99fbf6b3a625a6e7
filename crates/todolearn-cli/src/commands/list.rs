//! The `todolearn list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use todolearn_core::config::parse_mode_list;
use todolearn_core::{DeckStore, ModeRegistry};

pub fn execute(
    deck_path: Option<PathBuf>,
    modes: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = super::open_store(deck_path, config_path.as_deref())?;
    let deck = store.load()?;
    let registry = ModeRegistry::with_builtin();

    let requested = modes.map(|m| parse_mode_list(&m)).unwrap_or(config.modes);
    let active = registry.resolve_active(&requested)?;

    let mut scheduled: Vec<_> = deck
        .mode_cards()
        .iter()
        .filter(|m| active.contains(&m.mode))
        .collect();
    scheduled.sort_by_key(|m| m.due);

    let mut table = Table::new();
    table.set_header(vec!["Question", "Mode", "Due", "Progress", "Difficulty"]);

    for mode_card in scheduled {
        let mode = registry.get(&mode_card.mode)?;
        let (question, difficulty) = match deck.bind(mode_card) {
            Ok(bound) => (
                bound.raw_question().to_string(),
                mode.rate_difficulty(&bound).to_string(),
            ),
            Err(e) => {
                tracing::warn!(mode_card = %mode_card.id, "{e}, run `todolearn validate`");
                ("(missing card)".to_string(), "-".to_string())
            }
        };
        let due = mode_card
            .due
            .map(|d| d.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(question),
            Cell::new(&mode_card.mode),
            Cell::new(due),
            Cell::new(format!("{}%", mode_card.progress)),
            Cell::new(difficulty),
        ]);
    }

    println!("{table}");

    let unlearned = deck.select_unlearned_cards(&active, None).count();
    println!("{unlearned} unlearned card(s)");

    Ok(())
}
