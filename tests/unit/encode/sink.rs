use super::*;
use crate::foundation::core::Viewport;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::default(),
    }
}

fn frame(w: u32, h: u32, rgb: [u8; 3]) -> FrameRGBA {
    FrameRGBA::solid(Viewport::new(w, h).unwrap(), rgb)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vibedeck-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    for i in 0..3u8 {
        sink.push_frame(FrameIndex(u64::from(i)), &frame(2, 2, [i, 0, 0]))
            .unwrap();
    }
    sink.end().unwrap();
    assert!(sink.is_ended());
    assert_eq!(sink.config(), Some(cfg(2, 2)));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(sink.frames()[2].1.pixel(0, 0), Some([2, 0, 0, 255]));

    sink.begin(cfg(2, 2)).unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn flatten_over_background() {
    let mut dst = vec![0u8; 8];
    flatten_premul_over_bg(&mut dst, &[0, 0, 0, 0, 1, 2, 3, 255], [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 1, 2, 3, 255]);
    assert!(flatten_premul_over_bg(&mut dst, &[0; 4], [0, 0, 0]).is_err());
}

#[test]
fn frame_checks_reject_mismatched_geometry() {
    assert!(check_geometry(cfg(0, 2)).is_err());
    assert!(
        check_geometry(SinkConfig {
            fps: Fps { num: 0, den: 1 },
            ..cfg(2, 2)
        })
        .is_err()
    );
    assert!(check_frame(cfg(4, 4), &frame(2, 2, [0, 0, 0])).is_err());
    check_frame(cfg(2, 2), &frame(2, 2, [0, 0, 0])).unwrap();
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = scratch_dir("png-seq");
    let mut sink = PngSequenceSink::new(&dir).with_prefix("beat0_");
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 2, [255, 0, 0])).unwrap();
    sink.push_frame(FrameIndex(1), &frame(4, 2, [0, 255, 0])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let path = sink.path_for(FrameIndex(1));
    assert!(path.ends_with("beat0_000001.png"));
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(3, 1).0, [0, 255, 0, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_sink_requires_begin() {
    let mut sink = PngSequenceSink::new(scratch_dir("png-unstarted"));
    let err = sink
        .push_frame(FrameIndex(0), &frame(2, 2, [0, 0, 0]))
        .unwrap_err();
    assert!(matches!(err, DeckError::Encode(_)));
}
