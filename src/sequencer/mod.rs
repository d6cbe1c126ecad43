// Sequencer state: which blocks are on, where the playhead is, and whether it moves.

mod clock;
mod pattern;
mod transport;

pub use clock::{block_length, check_grid, PlaybackClock};
pub use pattern::Pattern;
pub use transport::{Transport, TransportState};
