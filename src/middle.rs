// Sits between the TUI and the engine: turns input events into pattern edits
// and transport commands, and builds the state the TUI draws each frame.

use std::sync::Arc;

use barmix::{AudioCommand, EngineStatus, Pattern};
use log::debug;

use crate::shared::{DisplayState, InputEvent};

pub struct Middle {
    pattern: Arc<Pattern>,
    cursor: (usize, usize),
    source: String,
    display: DisplayState,
}

impl Middle {
    pub fn new(pattern: Arc<Pattern>, channel_names: Vec<String>, bpm: f64, source: String) -> Self {
        let display = DisplayState {
            channel_names,
            bpm,
            ..DisplayState::default()
        };
        Self {
            pattern,
            cursor: (0, 0),
            source,
            display,
        }
    }

    /// Pattern edits are applied here and now; transport changes come back as
    /// commands for the audio thread.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        let (channel, bar) = self.cursor;
        let last_channel = self.pattern.channel_count() - 1;
        let last_bar = self.pattern.bar_count() - 1;
        match event {
            InputEvent::CursorUp => self.cursor.0 = channel.saturating_sub(1),
            InputEvent::CursorDown => self.cursor.0 = (channel + 1).min(last_channel),
            InputEvent::CursorLeft => self.cursor.1 = bar.saturating_sub(1),
            InputEvent::CursorRight => self.cursor.1 = (bar + 1).min(last_bar),
            InputEvent::ToggleBlock => {
                // the cursor is clamped to the grid, so this can't be out of range
                if let Ok(on) = self.pattern.toggle(channel, bar) {
                    debug!("block ({channel}, {bar}) -> {on}");
                }
            }
            InputEvent::Play => return vec![AudioCommand::Play],
            InputEvent::Stop => return vec![AudioCommand::Stop],
            InputEvent::Quit => {}
        }
        vec![]
    }

    pub fn display_state(&mut self, status: &EngineStatus) -> &DisplayState {
        let channels = self.pattern.channel_count();
        let bars = self.pattern.bar_count();
        self.display.blocks = (0..channels)
            .map(|c| (0..bars).map(|b| self.pattern.get(c, b).unwrap_or(false)).collect())
            .collect();
        self.display.cursor = self.cursor;
        self.display.current_bar = status.current_bar();
        self.display.playing = status.is_playing();
        self.display.recording_ready = status.recording_ready();
        self.display.display_text = if status.load_failed() {
            format!("LOAD FAILED: {}", self.source)
        } else if !self.display.recording_ready {
            "LOADING".to_string()
        } else if self.display.playing {
            format!("BAR {:02}/{:02}", self.display.current_bar + 1, bars)
        } else {
            "STOPPED".to_string()
        };
        &self.display
    }
}
