//! The `todolearn modes` command.

use anyhow::Result;

use todolearn_core::ModeRegistry;

pub fn execute() -> Result<()> {
    let registry = ModeRegistry::with_builtin();
    for name in registry.names() {
        println!("{name}");
    }
    Ok(())
}
