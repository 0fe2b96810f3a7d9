use kurbo::Rect;

/// Per-edge adjustment applied to the viewport before an intersection test.
///
/// Positive values grow the region past the corresponding edge, negative
/// values shrink it, mirroring how observer root margins bias when an
/// element counts as "on screen".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const ZERO: Margin = Margin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Adjusts only the top edge. A negative value shrinks it, the common
    /// case for controls that should detach shortly before their anchor
    /// actually leaves the viewport.
    pub fn top_only(value: f64) -> Self {
        Self {
            top: value,
            ..Self::ZERO
        }
    }
}

/// Viewport rectangle grown (or shrunk, for negative margins) per edge.
pub fn adjusted_region(viewport: Rect, margin: Margin) -> Rect {
    Rect::new(
        viewport.x0 - margin.left,
        viewport.y0 - margin.top,
        viewport.x1 + margin.right,
        viewport.y1 + margin.bottom,
    )
}

/// Fraction of `target` inside the margin-adjusted viewport, in `[0.0, 1.0]`.
///
/// A zero-area target degenerates to a point test: 1.0 when its origin lies
/// inside the adjusted region, 0.0 otherwise.
pub fn visible_fraction(target: Rect, viewport: Rect, margin: Margin) -> f64 {
    let region = adjusted_region(viewport, margin);
    let target_area = target.width().max(0.0) * target.height().max(0.0);
    if target_area == 0.0 {
        let inside = target.x0 >= region.x0
            && target.x0 <= region.x1
            && target.y0 >= region.y0
            && target.y0 <= region.y1;
        return if inside { 1.0 } else { 0.0 };
    }

    let overlap_w = (target.x1.min(region.x1) - target.x0.max(region.x0)).max(0.0);
    let overlap_h = (target.y1.min(region.y1) - target.y0.max(region.y0)).max(0.0);
    (overlap_w * overlap_h / target_area).clamp(0.0, 1.0)
}

/// Whether a sentinel rectangle counts as visible under `threshold`.
///
/// A zero threshold means "any overlap at all", so a fully invisible
/// sentinel still reports `false` rather than trivially passing `0.0 >= 0.0`.
pub fn sentinel_visible(sentinel: Rect, viewport: Rect, margin: Margin, threshold: f64) -> bool {
    let fraction = visible_fraction(sentinel, viewport, margin);
    if threshold <= 0.0 {
        fraction > 0.0
    } else {
        fraction >= threshold
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
