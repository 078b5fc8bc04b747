use super::constants::{CAPTION_FADE, CAPTION_PARALLAX_PX};

/// Text block tied to a window of scroll progress.
///
/// Fades in over the first `CAPTION_FADE` of its window, holds, fades out over
/// the last `CAPTION_FADE`, and drifts vertically from `+parallax` to
/// `-parallax` px across the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Caption {
    pub scroll_start: f32,
    pub scroll_end: f32,
    pub parallax: f32,
}

impl Caption {
    /// Alternating drift direction: even captions rise into place, odd ones sink.
    pub fn new(index: usize, scroll_start: f32, scroll_end: f32) -> Self {
        let parallax = if index % 2 == 0 {
            -CAPTION_PARALLAX_PX
        } else {
            CAPTION_PARALLAX_PX
        };
        Self {
            scroll_start,
            scroll_end,
            parallax,
        }
    }

    pub fn opacity(&self, progress: f32) -> f32 {
        let (s, e) = (self.scroll_start, self.scroll_end);
        if !progress.is_finite() || progress <= s || progress >= e {
            return 0.0;
        }
        let fade = CAPTION_FADE.min((e - s) * 0.5);
        if fade <= 0.0 {
            return 1.0;
        }
        let rise = (progress - s) / fade;
        let fall = (e - progress) / fade;
        rise.min(fall).clamp(0.0, 1.0)
    }

    pub fn offset_y(&self, progress: f32) -> f32 {
        let span = self.scroll_end - self.scroll_start;
        if !progress.is_finite() || span <= 0.0 {
            return self.parallax;
        }
        let t = ((progress - self.scroll_start) / span).clamp(0.0, 1.0);
        self.parallax * (1.0 - 2.0 * t)
    }
}
