// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

const USAGE: &str = "\
persona-table - manage a table of personas (nombre, apellido, edad)

USAGE:
    persona-table            Launch the interactive table
    persona-table --help     Show this message
    persona-table --version  Show version

ENVIRONMENT:
    PERSONA_TABLE_LOG        Log level (trace, debug, info, warn, error)
    PERSONA_TABLE_LOG_FILE   Log file path";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") => println!("{}", USAGE),
        Some("-V") | Some("--version") => println!("persona-table {}", env!("CARGO_PKG_VERSION")),
        Some(other) => {
            eprintln!("❌ Unknown argument: {}", other);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
        None => run_ui_mode()?,
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use anyhow::Context;
    use persona_table::{init_logging, AppConfig, PersonaStore};

    let config = AppConfig::from_env().context("reading configuration")?;
    init_logging(&config.logging)?;

    // The table and every dialog share this one list
    let store = PersonaStore::new();
    let mut app = ui::App::new(store.clone());
    ui::run_ui(&mut app)?;

    tracing::info!(rows = store.len(), "UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
