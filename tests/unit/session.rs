use super::*;
use crate::deck::beat::VisualMode;
use crate::deck::script::TypingPhase;
use crate::encode::sink::InMemorySink;
use std::sync::{Arc, Mutex};

fn small() -> DeckConfig {
    DeckConfig {
        viewport: Viewport {
            width: 64,
            height: 48,
        },
        frames_per_beat: 3,
        ..DeckConfig::default()
    }
}

/// Sink that hands each clip's frames to a shared map keyed by beat.
struct SharedSink {
    beat: usize,
    out: Arc<Mutex<Vec<(usize, u64, Vec<u8>)>>>,
}

impl FrameSink for SharedSink {
    fn begin(&mut self, _cfg: SinkConfig) -> DeckResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DeckResult<()> {
        self.out
            .lock()
            .unwrap()
            .push((self.beat, idx.0, frame.data.clone()));
        Ok(())
    }

    fn end(&mut self) -> DeckResult<()> {
        Ok(())
    }
}

fn clips(parallel: bool) -> Vec<(usize, u64, Vec<u8>)> {
    let out = Arc::new(Mutex::new(Vec::new()));
    let opts = ClipOpts {
        frames: 2,
        parallel,
        threads: Some(2),
    };
    let stats = render_beat_clips(&small(), opts, |beat, _| {
        Ok(SharedSink {
            beat,
            out: Arc::clone(&out),
        })
    })
    .unwrap();
    assert_eq!(stats.beats, 6);
    assert_eq!(stats.frames, 12);
    let mut frames = out.lock().unwrap().clone();
    frames.sort_by_key(|(beat, idx, _)| (*beat, *idx));
    frames
}

#[test]
fn opens_on_first_beat_with_background_and_illustration() {
    let p = Presentation::new(&small()).unwrap();
    assert_eq!(p.index(), 0);
    assert_eq!(p.current().visual_mode, VisualMode::Grid);
    assert_eq!(p.stage().active_beat(), Some(0));
    assert_eq!(p.stage().scheduler().layer_count(), 2);
    assert!(p.script().is_none());
}

#[test]
fn keys_navigate_and_clamp() {
    let mut p = Presentation::new(&small()).unwrap();
    assert!(!p.handle_key("ArrowLeft"));
    assert!(p.handle_key("ArrowRight"));
    assert_eq!(p.index(), 1);
    assert!(!p.handle_key("KeyQ"));
    assert!(p.handle_key("Backspace"));
    assert_eq!(p.index(), 0);

    assert!(p.goto(99));
    assert_eq!(p.index(), 5);
    assert!(!p.next());
    assert_eq!(p.stage().active_mode(), Some(VisualMode::Explosion));
    assert_eq!(p.stage().scheduler().layer_count(), 2);
}

#[test]
fn beat_change_resets_frame_counter_and_script() {
    let mut p = Presentation::new(&small()).unwrap();
    p.advance();
    p.advance();
    assert_eq!(p.frames_in_beat(), 2);

    p.next();
    assert_eq!(p.frames_in_beat(), 0);
    assert!(p.script().is_none());
    p.next();
    let script = p.script().expect("third beat carries a code snippet");
    assert_eq!(script.phase(), TypingPhase::Idle);

    // 60 fps: 40 frames is well past the 500 ms lead-in.
    for _ in 0..40 {
        p.advance();
    }
    assert_eq!(p.script().map(|s| s.phase()), Some(TypingPhase::UserTyping));
    p.next();
    assert!(p.script().is_none());
}

#[test]
fn rendered_frames_match_viewport_and_are_opaque() {
    let mut p = Presentation::new(&small()).unwrap();
    let f = p.render_frame().unwrap();
    assert_eq!((f.width, f.height), (64, 48));
    assert!(f.data.chunks_exact(4).all(|px| px[3] == 255));

    p.resize(32, 16).unwrap();
    let f = p.render_frame().unwrap();
    assert_eq!((f.width, f.height), (32, 16));
    assert!(p.resize(0, 16).is_err());
}

#[test]
fn autoplay_streams_every_beat_in_order() {
    let mut p = Presentation::new(&small()).unwrap();
    p.goto(3);
    let mut sink = InMemorySink::new();
    let stats = p.play_autoplay(3, &mut sink).unwrap();
    assert_eq!(
        stats,
        RenderStats {
            beats: 6,
            frames: 18,
            degraded_layers: 0
        }
    );
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..18).collect::<Vec<_>>());
    assert_eq!(p.index(), 5);
    assert!(p.play_autoplay(0, &mut sink).is_err());
}

#[test]
fn autoplay_restarts_a_first_beat_already_in_progress() {
    let mut fresh = Presentation::new(&small()).unwrap();
    let mut fresh_sink = InMemorySink::new();
    fresh.play_autoplay(4, &mut fresh_sink).unwrap();

    let mut warmed = Presentation::new(&small()).unwrap();
    for _ in 0..25 {
        warmed.advance();
    }
    let mut warmed_sink = InMemorySink::new();
    warmed.play_autoplay(4, &mut warmed_sink).unwrap();

    for ((_, a), (_, b)) in fresh_sink.frames()[..4].iter().zip(&warmed_sink.frames()[..4]) {
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn snippet_beats_type_the_full_listing() {
    let mut p = Presentation::new(&small()).unwrap();
    p.goto(2);
    let mut frames = 0;
    while p.script().unwrap().view().code.is_empty() {
        assert!(frames < 2_000, "code never started");
        p.advance();
        frames += 1;
    }
    for _ in 0..30 {
        p.advance();
    }
    let view = p.script().unwrap().view();
    assert_eq!(view.phase, TypingPhase::Coding);
    assert!(!view.code.is_empty());
    assert!(CODE_LISTING.starts_with(view.code));
}

#[test]
fn single_frame_render_is_deterministic() {
    let a = render_beat_frame(&small(), 2, 5).unwrap();
    let b = render_beat_frame(&small(), 2, 5).unwrap();
    assert_eq!(a.data, b.data);
    let err = render_beat_frame(&small(), 6, 0).unwrap_err();
    assert!(matches!(err, DeckError::Validation(_)));
}

#[test]
fn parallel_clips_match_serial_clips() {
    let serial = clips(false);
    let parallel = clips(true);
    assert_eq!(serial.len(), 12);
    assert_eq!(serial, parallel);
}

#[test]
fn clip_options_are_validated() {
    let opts = ClipOpts {
        threads: Some(0),
        parallel: true,
        ..ClipOpts::default()
    };
    let err = render_beat_clips(&small(), opts, |_, _| Ok(InMemorySink::new())).unwrap_err();
    assert!(err.to_string().contains("threads"));

    let opts = ClipOpts {
        frames: 0,
        ..ClipOpts::default()
    };
    assert!(render_beat_clips(&small(), opts, |_, _| Ok(InMemorySink::new())).is_err());
}
