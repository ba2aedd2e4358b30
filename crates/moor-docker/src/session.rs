// Pointer-drag state machine for moving panes in and out of the tree.

use moor_core::{DockTarget, Edge, PaneId, Rect, Size, Vec2};

/// Where a release would dock the dragged pane, and the box the host draws
/// for it. Releasing inside `rect` docks at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockIndicator {
    pub target: DockTarget,
    pub rect: Rect,
}

/// The single active drag, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DockSession {
    #[default]
    Idle,
    /// Pressed on an embedded pane; nothing moves until the pointer travels
    /// past the undock threshold.
    DraggingEmbedded { pane: PaneId, origin: Vec2 },
    DraggingFloating {
        pane: PaneId,
        /// Pointer position relative to the floating pane's origin.
        grab_offset: Vec2,
        indicator: Option<DockIndicator>,
    },
}

impl DockSession {
    pub fn is_active(&self) -> bool {
        !matches!(self, DockSession::Idle)
    }

    pub fn pane(&self) -> Option<PaneId> {
        match self {
            DockSession::Idle => None,
            DockSession::DraggingEmbedded { pane, .. } | DockSession::DraggingFloating { pane, .. } => {
                Some(*pane)
            }
        }
    }

    pub fn indicator(&self) -> Option<&DockIndicator> {
        match self {
            DockSession::DraggingFloating { indicator, .. } => indicator.as_ref(),
            _ => None,
        }
    }
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Docked(DockTarget),
    /// The pane stays (or became) floating.
    Floating,
    /// A click on an embedded pane; nothing changed.
    Unchanged,
}

/// Indicator box centred on the anchor of `edge`, moved `shift` pixels
/// toward the rect's interior (negative moves it outward). Center is
/// never shifted.
pub(crate) fn indicator_rect(rect: Rect, edge: Edge, shift: f32, size: Size) -> Rect {
    let anchor = rect.anchor(edge);
    let offset = match edge {
        Edge::Left => Vec2::new(shift, 0.0),
        Edge::Right => Vec2::new(-shift, 0.0),
        Edge::Top => Vec2::new(0.0, shift),
        Edge::Bottom => Vec2::new(0.0, -shift),
        Edge::Center => Vec2::new(0.0, 0.0),
    };
    let center = anchor + offset;
    Rect::new(
        center.x - size.width / 2.0,
        center.y - size.height / 2.0,
        size.width,
        size.height,
    )
}
