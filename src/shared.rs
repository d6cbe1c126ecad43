// Types passed between the terminal front end and the middle layer.
//
// Keys:
//   arrows / h j k l   move the cursor over the grid
//   space / enter      toggle the block under the cursor
//   p                  play from bar 0
//   s                  stop (and rewind)
//   esc / q            quit
//
// The TUI only ever draws a `DisplayState`; the middle layer owns the cursor
// and talks to the engine.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    ToggleBlock,
    Play,
    Stop,
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    pub channel_names: Vec<String>,
    pub blocks: Vec<Vec<bool>>, // [channel][bar]
    pub cursor: (usize, usize), // (channel, bar)
    pub current_bar: usize,
    pub playing: bool,
    pub recording_ready: bool,
    pub bpm: f64,
    pub display_text: String,
}
