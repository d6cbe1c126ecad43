mod middle;
mod shared;
mod tui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use barmix::{config, loader, start_audio, Pattern};
use crossterm::terminal;
use log::{error, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use middle::Middle;
use shared::InputEvent;

const LOG_FILE: &str = "barmix.log";

fn main() {
    if let Err(e) = run() {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let session_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    init_logging(&session_dir)?;

    let config = config::load_config(&session_dir)?;
    let pattern = Arc::new(Pattern::from_rows(&config.pattern_rows()?)?);
    let audio = start_audio(&config, Arc::clone(&pattern))?;

    let source = session_dir.join(&config.source);
    loader::spawn(
        source.clone(),
        audio.sample_rate(),
        pattern.channel_count(),
        audio.status().block_length(),
        audio.sender(),
        Arc::clone(audio.status()),
    );

    let mut middle = Middle::new(
        Arc::clone(&pattern),
        config.channel_names(),
        config.bpm,
        source.display().to_string(),
    );

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // restores the terminal however we leave
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    loop {
        let ds = middle.display_state(audio.status());
        term.draw(|frame| {
            let area = frame.area();
            tui::view::render(frame, area, ds);
        })?;

        for event in tui::input::poll_input(tick_rate)? {
            if event == InputEvent::Quit {
                info!("quit");
                audio.stop();
                return Ok(());
            }
            for cmd in middle.handle_input(event) {
                audio.send(cmd);
            }
        }
    }
}

// the terminal is in raw mode while the UI runs, so logs go to a file
fn init_logging(session_dir: &Path) -> anyhow::Result<()> {
    let path = session_dir.join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
