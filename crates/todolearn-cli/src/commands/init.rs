//! The `todolearn init` command.

use std::path::Path;

use anyhow::Result;

use todolearn_core::{CardDeck, DeckStore, JsonFileStore, RootCard};

/// Starter vocabulary: (question, answer).
const EXAMPLE_CARDS: &[(&str, &str)] = &[
    ("card", "die Karte"),
    ("learn", "lernen"),
    ("correct", "richtig"),
];

pub fn execute() -> Result<()> {
    // Create todolearn.toml
    if Path::new("todolearn.toml").exists() {
        println!("todolearn.toml already exists, skipping.");
    } else {
        std::fs::write("todolearn.toml", SAMPLE_CONFIG)?;
        println!("Created todolearn.toml");
    }

    // Create example deck
    let store = JsonFileStore::new("deck.json");
    if store.exists() {
        println!("deck.json already exists, skipping.");
    } else {
        let deck = CardDeck::from_cards(
            EXAMPLE_CARDS
                .iter()
                .map(|(question, answer)| RootCard::new(*question, *answer)),
        )?;
        store.save(&deck)?;
        println!("Created deck.json with {} cards", deck.len());
    }

    println!("\nNext steps:");
    println!("  1. Add cards: todolearn import --file cards.toml");
    println!("  2. Check the deck: todolearn validate");
    println!("  3. Start reviewing: todolearn review");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# todolearn configuration

deck_path = "./deck.json"

# Review modes to practise; leave empty for all registered modes.
modes = ["full-answer"]

# Unlearned cards introduced when nothing is due.
new_cards_per_batch = 10

# Typing this instead of an answer ends the session.
quit_command = "q"
"#;
