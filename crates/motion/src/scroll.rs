use kurbo::{Rect, RoundedRect};

/// The hero section reserves this multiple of the viewport height in the
/// page flow so the pinned stage has scroll distance to animate over.
pub const HERO_SECTION_HEIGHT_FACTOR: f64 = 2.2;

/// Fraction of the stage height clipped away from the top at full progress.
pub const CLIP_INSET_TOP_MAX: f64 = 0.10;
/// Fraction of the stage width clipped away from each side at full progress.
pub const CLIP_INSET_SIDE_MAX: f64 = 0.0625;
/// Corner radius of the clip shape at full progress, in logical pixels.
pub const CLIP_RADIUS_MAX_PX: f64 = 40.0;

/// Progress interval over which the hero title fades out.
pub const TITLE_FADE_END: f64 = 0.18;
/// Progress interval over which the hero description fades in.
pub const DESCRIPTION_FADE_START: f64 = 0.18;
pub const DESCRIPTION_FADE_END: f64 = 0.45;

/// Normalized scroll progress, clamped to `[0.0, 1.0]` on construction.
///
/// Every hero transform is derived from this value, so out-of-range scroll
/// offsets (overscroll, rubber-banding) can never push a visual property past
/// its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Progress(f64);

impl Progress {
    pub const ZERO: Progress = Progress(0.0);
    pub const ONE: Progress = Progress(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Scroll offsets over which a pinned section animates from rest to done.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    start: f64,
    end: f64,
}

impl ScrollRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Range for a section that pins its stage while the page scrolls past.
    ///
    /// The stage stays on screen until the section's bottom edge reaches the
    /// viewport bottom, so the animated distance is the section height minus
    /// one viewport.
    pub fn for_pinned_section(section_top: f64, section_height: f64, viewport_height: f64) -> Self {
        Self {
            start: section_top,
            end: section_top + (section_height - viewport_height).max(0.0),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Maps a raw scroll offset into this range.
    ///
    /// A degenerate range (zero or negative span) acts as a step: anything at
    /// or past `start` reports full progress.
    pub fn progress(&self, offset: f64) -> Progress {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if offset >= self.start {
                Progress::ONE
            } else {
                Progress::ZERO
            };
        }
        Progress::new((offset - self.start) / span)
    }
}

/// Visual properties of the hero stage at one scroll position.
///
/// All fields are pure functions of [`Progress`]; rendering the same progress
/// twice yields the same frame. Opacities are in `[0.0, 1.0]`, insets are
/// fractions of the stage bounds, the radius is in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformFrame {
    pub clip_inset_top: f64,
    pub clip_inset_side: f64,
    pub clip_radius: f64,
    pub title_opacity: f64,
    pub description_opacity: f64,
}

impl TransformFrame {
    pub fn at(progress: Progress) -> Self {
        let p = progress.value();
        Self {
            clip_inset_top: lerp(0.0, CLIP_INSET_TOP_MAX, p),
            clip_inset_side: lerp(0.0, CLIP_INSET_SIDE_MAX, p),
            clip_radius: lerp(0.0, CLIP_RADIUS_MAX_PX, p),
            title_opacity: 1.0 - ramp(p, 0.0, TITLE_FADE_END),
            description_opacity: ramp(p, DESCRIPTION_FADE_START, DESCRIPTION_FADE_END),
        }
    }

    /// Clip shape for a stage occupying `bounds`.
    ///
    /// The top inset and the side insets shrink the rectangle; the bottom
    /// edge never moves, matching the stage settling "into" the page below.
    pub fn clip_shape(&self, bounds: Rect) -> RoundedRect {
        let inset_x = bounds.width() * self.clip_inset_side;
        let inset_top = bounds.height() * self.clip_inset_top;
        let clipped = Rect::new(
            bounds.x0 + inset_x,
            bounds.y0 + inset_top,
            bounds.x1 - inset_x,
            bounds.y1,
        );
        RoundedRect::from_rect(clipped, self.clip_radius)
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear 0→1 ramp over `[from, to]`, clamped outside the interval.
fn ramp(p: f64, from: f64, to: f64) -> f64 {
    ((p - from) / (to - from)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "tests/scroll_tests.rs"]
mod tests;
