use tracing::{debug, trace};

use crate::viewport::Margin;

/// Gap kept between a docked control and the viewport edges, and between an
/// anchored control and its sheet corner.
pub const DOCK_EDGE_MARGIN: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockState {
    /// The control rides along with its sheet's top corner.
    Anchored,
    /// The control is pinned to the viewport because its anchor scrolled off.
    Docked,
}

/// Tuning for the dock transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockParams {
    /// Margin applied to the viewport when testing the sentinel.
    pub margin: Margin,
    /// Visible fraction at or above which the sentinel counts as on screen.
    pub threshold: f64,
    /// Extra top clearance (status bars, notches) added to docked placement.
    pub safe_area_top: f64,
}

impl Default for DockParams {
    fn default() -> Self {
        Self {
            margin: Margin::ZERO,
            threshold: 0.0,
            safe_area_top: 0.0,
        }
    }
}

/// Where the host should place the control this frame.
///
/// `Anchored` offsets are relative to the sheet's top-right corner and are
/// clipped with the sheet; `Docked` offsets are relative to the viewport's
/// top-right corner and must be painted above everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockPlacement {
    Anchored { top: f64, right: f64 },
    Docked { top: f64, right: f64 },
}

/// Drives a control between its in-sheet anchor and a viewport-fixed dock.
///
/// The host feeds two signals each frame: whether the anchor sentinel is
/// visible ([`DockController::observe_sentinel`]) and the current horizontal
/// geometry ([`DockController::update_geometry`]). Both are cheap no-ops when
/// nothing changed, so feeding them unconditionally per frame is fine.
pub struct DockController {
    params: DockParams,
    active: bool,
    state: DockState,
    right_offset: f64,
    last_geometry: Option<(f64, f64)>,
}

impl DockController {
    pub fn new(params: DockParams) -> Self {
        Self {
            params,
            active: false,
            state: DockState::Anchored,
            right_offset: DOCK_EDGE_MARGIN,
            last_geometry: None,
        }
    }

    pub fn params(&self) -> DockParams {
        self.params
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> DockState {
        self.state
    }

    pub fn right_offset(&self) -> f64 {
        self.right_offset
    }

    /// Enables or disables the controller with the overlay it belongs to.
    ///
    /// Deactivating forces the control back to `Anchored` and forgets the
    /// measured geometry, so a reopened overlay starts from a clean slate.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if !active {
            if self.state == DockState::Docked {
                debug!(from = ?DockState::Docked, to = ?DockState::Anchored, "dock: reset on deactivate");
            }
            self.state = DockState::Anchored;
            self.right_offset = DOCK_EDGE_MARGIN;
            self.last_geometry = None;
        }
    }

    /// Reports whether the anchor sentinel is currently visible.
    ///
    /// A visible sentinel anchors the control, a hidden one docks it.
    /// Observations while inactive are ignored, and repeating the current
    /// state is a no-op.
    pub fn observe_sentinel(&mut self, visible: bool) {
        if !self.active {
            trace!(visible, "dock: sentinel observation while inactive");
            return;
        }
        let next = if visible {
            DockState::Anchored
        } else {
            DockState::Docked
        };
        if next == self.state {
            return;
        }
        debug!(from = ?self.state, to = ?next, "dock: state changed");
        self.state = next;
    }

    /// Feeds the current viewport width and the sheet's right edge, both in
    /// the same coordinate space. Recomputes the docked offset only when the
    /// pair actually changed.
    pub fn update_geometry(&mut self, viewport_width: f64, sheet_right_edge: f64) {
        if !self.active {
            return;
        }
        let pair = (viewport_width, sheet_right_edge);
        if self.last_geometry == Some(pair) {
            return;
        }
        self.last_geometry = Some(pair);
        self.right_offset =
            (viewport_width - sheet_right_edge + DOCK_EDGE_MARGIN).max(DOCK_EDGE_MARGIN);
        trace!(
            viewport_width,
            sheet_right_edge,
            right_offset = self.right_offset,
            "dock: geometry updated"
        );
    }

    pub fn placement(&self) -> DockPlacement {
        match self.state {
            DockState::Anchored => DockPlacement::Anchored {
                top: DOCK_EDGE_MARGIN,
                right: DOCK_EDGE_MARGIN,
            },
            DockState::Docked => DockPlacement::Docked {
                top: self.params.safe_area_top + DOCK_EDGE_MARGIN,
                right: self.right_offset,
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/dock_tests.rs"]
mod tests;
