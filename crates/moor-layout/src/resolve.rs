// Edge resolution: which edge of which region a dragged pane is aimed at.

use moor_core::{DockError, Edge, Rect, Result, Vec2};

/// Outcome of resolving a pointer against candidate regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeResolution {
    /// Index into the candidate list, or `None` when the frame was used.
    pub region: Option<usize>,
    pub edge: Edge,
}

/// Nearest edge midpoint (or the centroid, if `include_center`) of `rect`.
pub fn nearest_edge(rect: Rect, point: Vec2, include_center: bool) -> Result<Edge> {
    if rect.is_degenerate() {
        return Err(DockError::DegenerateRegion);
    }
    Ok(closest_anchor(rect, point, include_center))
}

/// Resolve `point` against the innermost candidate containing it, falling
/// back to the frame (never its center). Degenerate candidates are ignored.
pub fn resolve_edge(
    point: Vec2,
    candidates: &[Rect],
    frame: Rect,
    include_center: bool,
) -> Option<EdgeResolution> {
    let hit = candidates
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_degenerate() && r.contains(point))
        .min_by(|a, b| a.1.area().total_cmp(&b.1.area()));

    if let Some((index, rect)) = hit {
        let edge = closest_anchor(*rect, point, include_center);
        log::trace!("resolved {point:?} to region {index} edge {edge:?}");
        return Some(EdgeResolution {
            region: Some(index),
            edge,
        });
    }

    if !frame.is_degenerate() && frame.contains(point) {
        return Some(EdgeResolution {
            region: None,
            edge: closest_anchor(frame, point, false),
        });
    }
    None
}

/// Frame side nearest to `point` by signed distance to each side.
/// Exact ties prefer Top, then Left, Right, Bottom.
pub fn nearest_frame_side(frame: Rect, point: Vec2) -> Edge {
    let distances = [
        (Edge::Top, point.y - frame.y),
        (Edge::Left, point.x - frame.x),
        (Edge::Right, frame.x + frame.width - point.x),
        (Edge::Bottom, frame.y + frame.height - point.y),
    ];
    let mut best = distances[0];
    for candidate in &distances[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

fn closest_anchor(rect: Rect, point: Vec2, include_center: bool) -> Edge {
    let mut best = Edge::Left;
    let mut best_dist = f32::INFINITY;
    for edge in Edge::ALL {
        if edge == Edge::Center && !include_center {
            continue;
        }
        let dist = rect.anchor(edge).distance(point);
        // Strict comparison keeps the earliest edge on ties.
        if dist < best_dist {
            best = edge;
            best_dist = dist;
        }
    }
    best
}
