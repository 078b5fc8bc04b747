use super::constants::{
    DEFAULT_FRAME_COUNT, DEFAULT_FRAME_EXT, DEFAULT_FRAME_PATH, PRELOAD_BATCH_SIZE,
};
use super::error::ConfigError;
use fnv::FnvHashSet;
use std::ops::RangeInclusive;

/// Per-mount settings for a scroll-scrubbed frame sequence.
///
/// Fields:
/// - `frame_count`: number of frames, addressed 1..=frame_count
/// - `frame_path`: directory the frames are served from (no trailing slash needed)
/// - `frame_ext`: file extension without the dot
/// - `batch_size`: how many images are fetched concurrently while preloading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceConfig {
    pub frame_count: u32,
    pub frame_path: String,
    pub frame_ext: String,
    pub batch_size: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            frame_path: DEFAULT_FRAME_PATH.to_string(),
            frame_ext: DEFAULT_FRAME_EXT.to_string(),
            batch_size: PRELOAD_BATCH_SIZE,
        }
    }
}

impl SequenceConfig {
    pub fn frame_set(&self) -> Result<FrameSet, ConfigError> {
        FrameSet::new(&self.frame_path, &self.frame_ext, self.frame_count)
    }

    /// Apply one `data-*` override, e.g. `("frame-count", "90")`.
    ///
    /// Unknown keys are ignored. On error the config is left untouched.
    pub fn apply_attribute(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "frame-count" => self.frame_count = parse_positive("frame-count", value)?,
            "batch-size" => self.batch_size = parse_positive("batch-size", value)?,
            "frame-path" => {
                if value.is_empty() {
                    return Err(invalid("frame-path", value));
                }
                self.frame_path = value.to_string();
            }
            "frame-ext" => {
                let ext = value.trim_start_matches('.');
                if ext.is_empty() {
                    return Err(invalid("frame-ext", value));
                }
                self.frame_ext = ext.to_string();
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidAttribute {
        key,
        value: value.to_string(),
    }
}

/// Ordered set of pre-rendered frames named `{base}/frame-{i}.{ext}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSet {
    base_path: String,
    ext: String,
    count: u32,
}

impl FrameSet {
    pub fn new(base_path: &str, ext: &str, count: u32) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::EmptySequence);
        }
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() {
            return Err(ConfigError::MissingExtension);
        }
        Ok(Self {
            base_path: base_path.trim().trim_end_matches('/').to_string(),
            ext: ext.to_string(),
            count,
        })
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        (1..=self.count).contains(&index)
    }

    pub fn url(&self, index: u32) -> Option<String> {
        self.contains(index)
            .then(|| format!("{}/frame-{}.{}", self.base_path, index, self.ext))
    }

    /// Consecutive index ranges of at most `batch_size` frames covering the set.
    pub fn batches(&self, batch_size: u32) -> Batches {
        Batches {
            next: 1,
            count: self.count,
            size: batch_size.max(1),
        }
    }
}

/// Iterator returned by [`FrameSet::batches`].
#[derive(Clone, Debug)]
pub struct Batches {
    next: u32,
    count: u32,
    size: u32,
}

impl Iterator for Batches {
    type Item = RangeInclusive<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.count {
            return None;
        }
        let start = self.next;
        let end = start.saturating_add(self.size - 1).min(self.count);
        self.next = end + 1;
        Some(start..=end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.next > self.count {
            0
        } else {
            batch_count(self.count - self.next + 1, self.size) as usize
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for Batches {}

#[inline]
pub fn batch_count(frame_count: u32, batch_size: u32) -> u32 {
    frame_count.div_ceil(batch_size.max(1))
}

/// Preload lifecycle. Only moves forward: Loading (rising) then Ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading { progress: u8 },
    Ready,
}

impl LoadState {
    #[inline]
    pub fn progress(&self) -> u8 {
        match self {
            LoadState::Loading { progress } => *progress,
            LoadState::Ready => 100,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

/// Counts finished preload batches and turns them into a [`LoadState`].
///
/// A batch counts as finished once every image in it has loaded or failed,
/// so failures still advance progress.
#[derive(Clone, Debug)]
pub struct PreloadTracker {
    total: u32,
    completed: u32,
}

impl PreloadTracker {
    pub fn new(frame_count: u32, batch_size: u32) -> Self {
        Self {
            total: batch_count(frame_count, batch_size),
            completed: 0,
        }
    }

    #[inline]
    pub fn total_batches(&self) -> u32 {
        self.total
    }

    pub fn state(&self) -> LoadState {
        if self.completed >= self.total {
            return LoadState::Ready;
        }
        let pct = (self.completed as f64 / self.total as f64 * 100.0).round();
        LoadState::Loading {
            progress: pct.clamp(0.0, 100.0) as u8,
        }
    }

    pub fn complete_batch(&mut self) -> LoadState {
        self.completed = (self.completed + 1).min(self.total);
        self.state()
    }
}

/// Raw scroll progress of a tall container whose bounding rect starts at
/// `top` (relative to the viewport) and is `height` tall.
///
/// 0 when its top edge touches the viewport top, 1 when its bottom edge
/// touches the viewport bottom. A container that does not overflow the
/// viewport never scrolls and stays at 0.
pub fn scroll_progress(top: f64, height: f64, viewport_height: f64) -> f32 {
    let span = height - viewport_height;
    if !(span.is_finite() && top.is_finite()) || span <= 0.0 {
        return 0.0;
    }
    (-top / span).clamp(0.0, 1.0) as f32
}

/// Map smoothed scroll progress (0..1) to a 1-based frame index.
///
/// `round(p * (n - 1)) + 1`, clamped to `1..=n`. Non-finite input maps to
/// the first frame.
pub fn map_scroll_to_frame(progress: f32, frame_count: u32) -> u32 {
    if frame_count <= 1 || !progress.is_finite() {
        return 1;
    }
    let p = progress.clamp(0.0, 1.0) as f64;
    let idx = (p * (frame_count - 1) as f64).round() as u32 + 1;
    idx.clamp(1, frame_count)
}

/// Receives the frame that should be on screen.
pub trait FrameSink {
    fn show(&mut self, index: u32, url: &str);
}

/// Result of [`FramePresenter::queue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueOutcome {
    /// Frames are still preloading; nothing was queued.
    Ignored,
    /// First request since the last flush; the caller must request a paint callback.
    Schedule,
    /// A paint callback is already pending; it will use this newer index.
    Coalesced,
}

/// Decides which frame is displayed and when.
///
/// Scroll updates call [`queue`](Self::queue) as often as they like; the
/// animation-frame callback calls [`flush`](Self::flush) once per paint and
/// only the newest queued index reaches the sink.
#[derive(Debug)]
pub struct FramePresenter {
    frames: FrameSet,
    loaded: FnvHashSet<u32>,
    state: LoadState,
    current: Option<u32>,
    pending: Option<u32>,
    scheduled: bool,
}

impl FramePresenter {
    pub fn new(frames: FrameSet) -> Self {
        Self {
            frames,
            loaded: FnvHashSet::default(),
            state: LoadState::Loading { progress: 0 },
            current: None,
            pending: None,
            scheduled: false,
        }
    }

    #[inline]
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[inline]
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    #[inline]
    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub fn mark_loaded(&mut self, index: u32) {
        if self.frames.contains(index) {
            self.loaded.insert(index);
        }
    }

    #[inline]
    pub fn is_loaded(&self, index: u32) -> bool {
        self.loaded.contains(&index)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Ready is sticky and loading progress never goes backwards.
    pub fn set_state(&mut self, next: LoadState) {
        self.state = match (self.state, next) {
            (LoadState::Ready, _) => LoadState::Ready,
            (_, LoadState::Ready) => LoadState::Ready,
            (LoadState::Loading { progress: a }, LoadState::Loading { progress: b }) => {
                LoadState::Loading {
                    progress: a.max(b).min(100),
                }
            }
        };
    }

    pub fn queue_progress(&mut self, progress: f32) -> QueueOutcome {
        self.queue(map_scroll_to_frame(progress, self.frames.count()))
    }

    pub fn queue(&mut self, index: u32) -> QueueOutcome {
        if !self.state.is_ready() {
            return QueueOutcome::Ignored;
        }
        self.pending = Some(index);
        if self.scheduled {
            return QueueOutcome::Coalesced;
        }
        self.scheduled = true;
        QueueOutcome::Schedule
    }

    /// Paint callback body. Returns the index that was newly shown, if any.
    pub fn flush(&mut self, sink: &mut impl FrameSink) -> Option<u32> {
        self.scheduled = false;
        let index = self.pending.take()?;
        self.render_frame(index, sink).then_some(index)
    }

    /// Show `index` unless it is already displayed or never loaded.
    pub fn render_frame(&mut self, index: u32, sink: &mut impl FrameSink) -> bool {
        if self.current == Some(index) || !self.loaded.contains(&index) {
            return false;
        }
        let Some(url) = self.frames.url(index) else {
            return false;
        };
        sink.show(index, &url);
        self.current = Some(index);
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.scheduled = false;
    }
}
