use moor_core::{GeometryProvider, HitTest, NodeId, Rect, SplitDirection, Vec2};
use serde::Serialize;

// ──────────────────────────────────────────────
// LayoutSnapshot: rectangles computed from the tree
// ──────────────────────────────────────────────

/// Identifies divider `index` of a split container. Divider `i` sits
/// between children `i` and `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DividerHandle {
    pub container: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Divider {
    pub handle: DividerHandle,
    pub direction: SplitDirection,
    /// Screen coordinate of the divider line along the container's axis.
    pub position: f32,
    /// Rect of the container owning the divider.
    pub extent: Rect,
}

impl Divider {
    /// Distance from `point` to the divider line, if the point lies within
    /// the line's perpendicular extent.
    pub fn distance_to(&self, point: Vec2) -> Option<f32> {
        match self.direction {
            SplitDirection::Horizontal => {
                let in_range = point.y >= self.extent.y && point.y <= self.extent.y + self.extent.height;
                in_range.then(|| (point.x - self.position).abs())
            }
            SplitDirection::Vertical => {
                let in_range = point.x >= self.extent.x && point.x <= self.extent.x + self.extent.width;
                in_range.then(|| (point.y - self.position).abs())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub frame: Rect,
    /// Tab group regions in tree order.
    pub regions: Vec<(NodeId, Rect)>,
    pub dividers: Vec<Divider>,
}

impl LayoutSnapshot {
    pub(crate) fn new(frame: Rect) -> Self {
        Self {
            frame,
            regions: Vec::new(),
            dividers: Vec::new(),
        }
    }

    /// Region rects in the same order as `regions`, for `resolve_edge`.
    pub fn region_rects(&self) -> Vec<Rect> {
        self.regions.iter().map(|(_, r)| *r).collect()
    }

    /// Closest divider within `threshold` pixels of `point`.
    pub fn divider_at(&self, point: Vec2, threshold: f32) -> Option<&Divider> {
        let mut best: Option<(f32, &Divider)> = None;
        for divider in &self.dividers {
            let Some(dist) = divider.distance_to(point) else {
                continue;
            };
            let closer = match best {
                Some((best_dist, _)) => dist < best_dist,
                None => true,
            };
            if closer {
                best = Some((dist, divider));
            }
        }
        best.filter(|(dist, _)| *dist <= threshold).map(|(_, d)| d)
    }
}

impl GeometryProvider for LayoutSnapshot {
    fn region_rect(&self, region: NodeId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(id, _)| *id == region)
            .map(|(_, r)| *r)
    }
}

impl HitTest for LayoutSnapshot {
    fn region_at(&self, point: Vec2) -> Option<NodeId> {
        self.regions
            .iter()
            .find(|(_, r)| !r.is_degenerate() && r.contains(point))
            .map(|(id, _)| *id)
    }
}
