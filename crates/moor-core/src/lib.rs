use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the rect covers no area (zero, negative or NaN extent).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Shrink the rect by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// The point an edge resolves to: the midpoint of a side, or the centroid.
    pub fn anchor(&self, edge: Edge) -> Vec2 {
        let c = self.center();
        match edge {
            Edge::Left => Vec2::new(self.x, c.y),
            Edge::Right => Vec2::new(self.x + self.width, c.y),
            Edge::Top => Vec2::new(c.x, self.y),
            Edge::Bottom => Vec2::new(c.x, self.y + self.height),
            Edge::Center => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type PaneId = u64;

slotmap::new_key_type! {
    /// Handle to a node of the dock tree. TabGroup handles double as the
    /// region handles hosts use for geometry and hit-testing.
    pub struct NodeId;
}

// ──────────────────────────────────────────────
// Layout types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitDirection {
    /// Children laid out left to right.
    Horizontal,
    /// Children laid out top to bottom.
    Vertical,
}

/// Where a pane lands relative to a target region.
///
/// Declaration order is the tie-break order used when two candidate
/// points are equally close to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl Edge {
    pub const ALL: [Edge; 5] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom, Edge::Center];
    pub const SIDES: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Split direction and whether the new pane goes first (left/top).
    /// `None` for Center, which merges into a tab group instead of splitting.
    pub fn split_placement(self) -> Option<(SplitDirection, bool)> {
        match self {
            Edge::Left => Some((SplitDirection::Horizontal, true)),
            Edge::Right => Some((SplitDirection::Horizontal, false)),
            Edge::Top => Some((SplitDirection::Vertical, true)),
            Edge::Bottom => Some((SplitDirection::Vertical, false)),
            Edge::Center => None,
        }
    }
}

/// Initial placement requested when a pane is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DockPosition {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl DockPosition {
    pub fn edge(self) -> Option<Edge> {
        match self {
            DockPosition::None => None,
            DockPosition::Left => Some(Edge::Left),
            DockPosition::Right => Some(Edge::Right),
            DockPosition::Top => Some(Edge::Top),
            DockPosition::Bottom => Some(Edge::Bottom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockTarget {
    /// An edge (or the center) of a tab group region.
    Region(NodeId, Edge),
    /// An outer edge of the main frame.
    Frame(Edge),
}

impl DockTarget {
    pub fn region(&self) -> Option<NodeId> {
        match self {
            DockTarget::Region(id, _) => Some(*id),
            DockTarget::Frame(_) => None,
        }
    }

    pub fn edge(&self) -> Edge {
        match self {
            DockTarget::Region(_, edge) | DockTarget::Frame(edge) => *edge,
        }
    }
}

// ──────────────────────────────────────────────
// Trait: GeometryProvider
// ──────────────────────────────────────────────

/// Screen geometry of the regions a host has laid out.
/// The host owns widget geometry; the engine only asks for it.
pub trait GeometryProvider {
    fn region_rect(&self, region: NodeId) -> Option<Rect>;
}

// ──────────────────────────────────────────────
// Trait: HitTest
// ──────────────────────────────────────────────

/// Finds the innermost region under a screen point.
pub trait HitTest {
    fn region_at(&self, point: Vec2) -> Option<NodeId>;
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Precondition violations. No-op outcomes of a drag are not errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DockError {
    #[error("pane {0} is already docked")]
    AlreadyEmbedded(PaneId),
    #[error("pane {0} is not docked")]
    NotEmbedded(PaneId),
    #[error("unknown pane {0}")]
    UnknownPane(PaneId),
    #[error("region {0:?} is not a tab group of this tree")]
    UnknownRegion(NodeId),
    #[error("center docking needs a target tab group")]
    CenterWithoutRegion,
    #[error("cannot resolve an edge of a zero-area region")]
    DegenerateRegion,
    #[error("a drag session is already active")]
    SessionActive,
}

pub type Result<T> = std::result::Result<T, DockError>;
