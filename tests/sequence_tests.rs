// Host-side tests for the frame-sequence model.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod error {
    include!("../src/core/error.rs");
}
mod sequence {
    include!("../src/core/sequence.rs");
}
mod dom_constants {
    include!("../src/constants.rs");
}

use error::ConfigError;
use sequence::*;

#[derive(Default)]
struct RecordingSink {
    shown: Vec<(u32, String)>,
}

impl FrameSink for RecordingSink {
    fn show(&mut self, index: u32, url: &str) {
        self.shown.push((index, url.to_string()));
    }
}

fn frames(n: u32) -> FrameSet {
    FrameSet::new("/sequence/webp", "webp", n).unwrap()
}

/// Presenter with every frame loaded and the preload finished.
fn ready_presenter(n: u32) -> FramePresenter {
    let mut p = FramePresenter::new(frames(n));
    for i in 1..=n {
        p.mark_loaded(i);
    }
    p.set_state(LoadState::Ready);
    p
}

#[test]
fn mapping_hits_first_and_last_frame() {
    assert_eq!(map_scroll_to_frame(0.0, 147), 1);
    assert_eq!(map_scroll_to_frame(1.0, 147), 147);
    assert_eq!(map_scroll_to_frame(0.0, 10), 1);
    assert_eq!(map_scroll_to_frame(1.0, 10), 10);
}

#[test]
fn mapping_rounds_to_nearest_frame() {
    assert_eq!(map_scroll_to_frame(0.5, 147), 74);
    assert_eq!(map_scroll_to_frame(0.5, 3), 2);
    // 0.49 * 146 = 71.54 -> 72 -> frame 73
    assert_eq!(map_scroll_to_frame(0.49, 147), 73);
}

#[test]
fn mapping_stays_in_range_and_never_decreases() {
    for &n in &[1u32, 2, 10, 147, 5000] {
        let mut prev = 0;
        for step in 0..=2000 {
            let p = step as f32 / 2000.0;
            let f = map_scroll_to_frame(p, n);
            assert!((1..=n).contains(&f), "frame {f} out of range for n={n} at p={p}");
            assert!(f >= prev, "mapping decreased at p={p} for n={n}");
            prev = f;
        }
    }
}

#[test]
fn mapping_clamps_out_of_range_and_non_finite_progress() {
    assert_eq!(map_scroll_to_frame(-0.3, 147), 1);
    assert_eq!(map_scroll_to_frame(1.7, 147), 147);
    assert_eq!(map_scroll_to_frame(f32::NAN, 147), 1);
    assert_eq!(map_scroll_to_frame(f32::INFINITY, 147), 1);
}

#[test]
fn frame_urls_follow_the_naming_template() {
    let set = FrameSet::new("/sequence/webp/", ".webp", 147).unwrap();
    assert_eq!(set.url(1).as_deref(), Some("/sequence/webp/frame-1.webp"));
    assert_eq!(set.url(147).as_deref(), Some("/sequence/webp/frame-147.webp"));
    assert_eq!(set.url(0), None);
    assert_eq!(set.url(148), None);
}

#[test]
fn frame_set_rejects_empty_config() {
    assert_eq!(FrameSet::new("/f", "png", 0), Err(ConfigError::EmptySequence));
    assert_eq!(FrameSet::new("/f", "", 5), Err(ConfigError::MissingExtension));
    assert_eq!(FrameSet::new("/f", ".", 5), Err(ConfigError::MissingExtension));
}

#[test]
fn batches_cover_every_frame_once_in_order() {
    let set = frames(147);
    let batches: Vec<_> = set.batches(20).collect();
    assert_eq!(batches.len(), 8);
    assert_eq!(set.batches(20).len(), 8);
    assert_eq!(batches[0], 1..=20);
    assert_eq!(batches[7], 141..=147);
    let all: Vec<u32> = batches.into_iter().flatten().collect();
    assert_eq!(all, (1..=147).collect::<Vec<_>>());
}

#[test]
fn zero_batch_size_loads_one_at_a_time() {
    let set = frames(3);
    let batches: Vec<_> = set.batches(0).collect();
    assert_eq!(batches, vec![1..=1, 2..=2, 3..=3]);
}

#[test]
fn preload_progress_is_monotonic_and_ends_at_100() {
    let mut tracker = PreloadTracker::new(147, 20);
    assert_eq!(tracker.state(), LoadState::Loading { progress: 0 });
    let mut seen = Vec::new();
    for _ in 0..tracker.total_batches() {
        seen.push(tracker.complete_batch());
    }
    let progress: Vec<u8> = seen.iter().map(|s| s.progress()).collect();
    assert_eq!(progress, vec![13, 25, 38, 50, 63, 75, 88, 100]);
    assert_eq!(*seen.last().unwrap(), LoadState::Ready);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));

    // Extra completions do not move past Ready.
    assert_eq!(tracker.complete_batch(), LoadState::Ready);
}

#[test]
fn single_batch_goes_straight_to_ready() {
    let mut tracker = PreloadTracker::new(5, 20);
    assert_eq!(tracker.total_batches(), 1);
    assert_eq!(tracker.complete_batch(), LoadState::Ready);
}

#[test]
fn nothing_is_queued_before_ready() {
    let mut p = FramePresenter::new(frames(10));
    p.mark_loaded(1);
    p.set_state(LoadState::Loading { progress: 50 });
    assert_eq!(p.queue(1), QueueOutcome::Ignored);

    let mut sink = RecordingSink::default();
    assert_eq!(p.flush(&mut sink), None);
    assert!(sink.shown.is_empty());
}

#[test]
fn updates_within_one_paint_collapse_to_the_latest() {
    let mut p = ready_presenter(147);
    let mut sink = RecordingSink::default();

    assert_eq!(p.queue(10), QueueOutcome::Schedule);
    assert_eq!(p.queue(11), QueueOutcome::Coalesced);
    assert_eq!(p.queue(12), QueueOutcome::Coalesced);
    assert_eq!(p.flush(&mut sink), Some(12));

    assert_eq!(sink.shown.len(), 1);
    assert_eq!(sink.shown[0].0, 12);
    assert_eq!(sink.shown[0].1, "/sequence/webp/frame-12.webp");

    // Next update after the paint needs a fresh callback.
    assert_eq!(p.queue(13), QueueOutcome::Schedule);
}

#[test]
fn render_frame_is_idempotent() {
    let mut p = ready_presenter(20);
    let mut sink = RecordingSink::default();
    assert!(p.render_frame(5, &mut sink));
    assert!(!p.render_frame(5, &mut sink));
    assert_eq!(sink.shown.len(), 1);
    assert_eq!(p.current(), Some(5));

    // Same index again through the queue is also a no-op.
    p.queue(5);
    assert_eq!(p.flush(&mut sink), None);
    assert_eq!(sink.shown.len(), 1);
}

#[test]
fn missing_frames_leave_the_last_frame_on_screen() {
    let mut p = FramePresenter::new(frames(10));
    for i in [1, 2, 3, 5] {
        p.mark_loaded(i);
    }
    p.set_state(LoadState::Ready);
    let mut sink = RecordingSink::default();

    assert!(p.render_frame(3, &mut sink));
    assert!(!p.render_frame(4, &mut sink));
    assert_eq!(p.current(), Some(3));
    assert!(p.render_frame(5, &mut sink));
    assert_eq!(sink.shown.iter().map(|s| s.0).collect::<Vec<_>>(), vec![3, 5]);
}

#[test]
fn out_of_range_frames_are_never_marked_loaded() {
    let mut p = FramePresenter::new(frames(4));
    p.mark_loaded(0);
    p.mark_loaded(5);
    p.mark_loaded(4);
    assert_eq!(p.loaded_count(), 1);
    assert!(p.is_loaded(4));
}

#[test]
fn load_state_never_goes_backwards() {
    let mut p = FramePresenter::new(frames(4));
    p.set_state(LoadState::Loading { progress: 50 });
    p.set_state(LoadState::Loading { progress: 30 });
    assert_eq!(p.state(), LoadState::Loading { progress: 50 });
    p.set_state(LoadState::Ready);
    p.set_state(LoadState::Loading { progress: 10 });
    assert_eq!(p.state(), LoadState::Ready);
}

#[test]
fn cancel_discards_the_pending_frame() {
    let mut p = ready_presenter(10);
    let mut sink = RecordingSink::default();
    assert_eq!(p.queue(7), QueueOutcome::Schedule);
    p.cancel();
    assert_eq!(p.pending(), None);
    assert_eq!(p.flush(&mut sink), None);
    assert!(sink.shown.is_empty());
    assert_eq!(p.queue(8), QueueOutcome::Schedule);
}

#[test]
fn three_scroll_samples_show_first_middle_last() {
    let mut p = ready_presenter(147);
    let mut sink = RecordingSink::default();
    for progress in [0.0, 0.5, 1.0] {
        assert_eq!(p.queue_progress(progress), QueueOutcome::Schedule);
        p.flush(&mut sink);
    }
    let shown: Vec<u32> = sink.shown.iter().map(|s| s.0).collect();
    assert_eq!(shown, vec![1, 74, 147]);
}

#[test]
fn scroll_progress_spans_the_scrollable_height() {
    // 5000px container, 1000px viewport: 4000px of travel.
    assert_eq!(scroll_progress(0.0, 5000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(-2000.0, 5000.0, 1000.0), 0.5);
    assert_eq!(scroll_progress(-4000.0, 5000.0, 1000.0), 1.0);
    // Before the container and after it.
    assert_eq!(scroll_progress(300.0, 5000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(-6000.0, 5000.0, 1000.0), 1.0);
}

#[test]
fn scroll_progress_of_a_short_container_is_zero() {
    assert_eq!(scroll_progress(-100.0, 800.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(-100.0, 1000.0, 1000.0), 0.0);
    assert_eq!(scroll_progress(f64::NAN, 5000.0, 1000.0), 0.0);
}

#[test]
fn attributes_override_defaults() {
    let mut config = SequenceConfig::default();
    assert_eq!(config.frame_count, 147);
    assert_eq!(config.batch_size, 20);

    config.apply_attribute("frame-count", " 90 ").unwrap();
    config.apply_attribute("frame-path", "/hero/").unwrap();
    config.apply_attribute("frame-ext", ".jpg").unwrap();
    config.apply_attribute("batch-size", "8").unwrap();
    config.apply_attribute("something-else", "x").unwrap();

    let set = config.frame_set().unwrap();
    assert_eq!(set.count(), 90);
    assert_eq!(set.url(3).as_deref(), Some("/hero/frame-3.jpg"));
    assert_eq!(config.batch_size, 8);
}

#[test]
fn invalid_attributes_are_rejected_and_leave_config_unchanged() {
    let mut config = SequenceConfig::default();
    let err = config.apply_attribute("frame-count", "0").unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidAttribute {
            key: "frame-count",
            value: "0".to_string()
        }
    );
    assert!(config.apply_attribute("batch-size", "lots").is_err());
    assert!(config.apply_attribute("frame-ext", "").is_err());
    assert_eq!(config, SequenceConfig::default());
}

#[test]
fn every_dom_attribute_key_is_understood() {
    let mut config = SequenceConfig::default();
    for key in dom_constants::SEQUENCE_ATTRS {
        // An empty value is invalid for every known key, so each must error.
        assert!(config.apply_attribute(key, "").is_err(), "unknown key {key}");
    }
}
