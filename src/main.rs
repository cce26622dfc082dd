// Entry point for the Minesweeper TUI application
// Initializes logging, configuration and language, then launches the UI

use std::error::Error;

use saolei::sl_config::{data_dir, load_or_create_config};
use saolei::sl_lang::Lang;
use saolei::sl_log;
use saolei::sl_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(dir) = data_dir() {
        sl_log::init(&dir);
    }

    // Load or create user configuration (board size, mines, preferences)
    let cfg = load_or_create_config();
    let lang = Lang::new(&cfg.language);

    run_ui(&cfg, &lang)?;
    Ok(())
}
