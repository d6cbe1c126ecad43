//! The render path must not touch the heap: it runs inside the audio
//! callback. These tests render several loops of the demo session with the
//! pattern being edited and the transport toggled in between blocks.

use std::sync::Arc;

use assert_no_alloc::{assert_no_alloc, AllocDisabler};
use barmix::{block_length, AudioCommand, Engine, Pattern, SessionConfig, SourceRecording, StereoFrame};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

const SAMPLE_RATE: u32 = 8000;
const BUFFER: usize = 4096;

fn demo_engine() -> Engine {
    let config = SessionConfig::default();
    let pattern = Arc::new(Pattern::from_rows(&config.pattern_rows().unwrap()).unwrap());
    let block = block_length(SAMPLE_RATE, config.bpm, config.beats_per_bar).unwrap();
    // a recording one block short, so the last channel reads past the end
    let len = (pattern.channel_count() - 1) * block;
    let frames = (0..len).map(|i| StereoFrame::new((i % 100) as f32 * 0.01, 0.1)).collect();
    let mut engine = Engine::new(pattern, block);
    engine.handle_cmd(AudioCommand::LoadRecording(Arc::new(SourceRecording::from_frames(
        frames,
        SAMPLE_RATE,
    ))));
    engine
}

#[test]
fn render_planar_alloc_free() {
    let mut engine = demo_engine();
    let pattern = Arc::clone(engine.pattern());
    let loop_length = engine.clock().loop_length();
    let mut left = vec![0.0f32; BUFFER];
    let mut right = vec![0.0f32; BUFFER];
    engine.play();

    assert_no_alloc(|| {
        let mut rendered = 0;
        let mut block = 0;
        while rendered < loop_length * 2 {
            engine.render(&mut left, &mut right, BUFFER);
            rendered += BUFFER;
            block += 1;
            let _ = pattern.toggle(block % 5, block % 16);
        }
    });
    assert!(engine.is_playing());
}

#[test]
fn render_frames_alloc_free_across_transport_changes() {
    let mut engine = demo_engine();
    let mut frames = vec![StereoFrame::zero(); BUFFER];

    assert_no_alloc(|| {
        for i in 0..200 {
            match i % 50 {
                0 => engine.handle_cmd(AudioCommand::Play),
                40 => engine.handle_cmd(AudioCommand::Stop),
                _ => {}
            }
            engine.render_frames(&mut frames);
        }
    });
    assert!(!engine.is_playing());
    assert_eq!(engine.clock().position(), 0);
}
