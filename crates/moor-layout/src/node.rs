use moor_core::{NodeId, PaneId, Rect, SplitDirection};

// ──────────────────────────────────────────────
// DockNode: arena node of the dock tree
// ──────────────────────────────────────────────

/// Smallest distance a ratio keeps from 0, 1 and its neighbours.
pub(crate) const RATIO_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub enum DockNode {
    Tabs(TabGroup),
    Split(SplitContainer),
}

/// Leaf of the tree: one or more panes sharing a rectangle as tabs.
#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    pub(crate) panes: Vec<PaneId>,
    pub(crate) active: usize,
    /// Sibling this group took its span from when it was split off.
    pub(crate) donor: Option<NodeId>,
}

impl TabGroup {
    pub(crate) fn new(pane: PaneId) -> Self {
        Self {
            panes: vec![pane],
            active: 0,
            donor: None,
        }
    }

    /// Panes in tab order.
    pub fn panes(&self) -> &[PaneId] {
        &self.panes
    }

    pub fn active(&self) -> Option<PaneId> {
        self.panes.get(self.active).copied()
    }

    /// Append a tab and make it active.
    pub(crate) fn push(&mut self, pane: PaneId) {
        self.panes.push(pane);
        self.active = self.panes.len() - 1;
    }

    pub(crate) fn remove(&mut self, pane: PaneId) -> bool {
        let Some(index) = self.panes.iter().position(|&p| p == pane) else {
            return false;
        };
        self.panes.remove(index);
        if self.active > index || self.active >= self.panes.len() {
            self.active = self.active.saturating_sub(1);
        }
        true
    }

    pub(crate) fn select(&mut self, pane: PaneId) -> bool {
        match self.panes.iter().position(|&p| p == pane) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }
}

/// Interior node dividing its rectangle among children along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitContainer {
    pub(crate) direction: SplitDirection,
    pub(crate) children: Vec<NodeId>,
    /// Cumulative split fractions, one fewer than `children`.
    pub(crate) ratios: Vec<f32>,
}

impl SplitContainer {
    pub(crate) fn new(direction: SplitDirection) -> Self {
        Self {
            direction,
            children: Vec::new(),
            ratios: Vec::new(),
        }
    }

    pub(crate) fn pair(direction: SplitDirection, first: NodeId, second: NodeId) -> Self {
        Self {
            direction,
            children: vec![first, second],
            ratios: vec![0.5],
        }
    }

    pub fn direction(&self) -> SplitDirection {
        self.direction
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }
}

// ──────────────────────────────────────────────
// Ratio arithmetic
// ──────────────────────────────────────────────

/// Which neighbour takes over the span of a removed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absorb {
    Before,
    After,
    /// Both neighbours grow by half the span.
    Even,
}

/// Span `[lo, hi]` of child `index` given cumulative ratios.
pub(crate) fn span(ratios: &[f32], index: usize) -> (f32, f32) {
    let lo = if index == 0 { 0.0 } else { ratios[index - 1] };
    let hi = ratios.get(index).copied().unwrap_or(1.0);
    (lo, hi)
}

/// Ratio for a new divider splitting the span of child `index` in half.
pub(crate) fn insertion_ratio(ratios: &[f32], index: usize) -> f32 {
    let (lo, hi) = span(ratios, index);
    (lo + hi) / 2.0
}

/// Drop the divider(s) bounding child `index` of a container that had
/// `child_count` children. Untouched dividers keep their positions.
pub(crate) fn remove_ratio(ratios: &mut Vec<f32>, index: usize, child_count: usize, absorb: Absorb) {
    if child_count <= 1 || ratios.is_empty() {
        ratios.clear();
        return;
    }
    if index == 0 {
        ratios.remove(0);
    } else if index >= child_count - 1 {
        ratios.pop();
    } else {
        match absorb {
            Absorb::Before => {
                ratios.remove(index - 1);
            }
            Absorb::After => {
                ratios.remove(index);
            }
            Absorb::Even => {
                ratios[index - 1] = (ratios[index - 1] + ratios[index]) / 2.0;
                ratios.remove(index);
            }
        }
    }
}

/// Replace child `index` by its own children, rescaling their ratios into
/// the span the absorbed child occupied.
pub(crate) fn splice_ratios(parent: &[f32], index: usize, child: &[f32]) -> Vec<f32> {
    let (lo, hi) = span(parent, index);
    let mut out = Vec::with_capacity(parent.len() + child.len());
    out.extend_from_slice(&parent[..index]);
    out.extend(child.iter().map(|r| lo + r * (hi - lo)));
    out.extend_from_slice(&parent[index..]);
    out
}

pub(crate) fn uniform_ratios(child_count: usize) -> Vec<f32> {
    (1..child_count)
        .map(|i| i as f32 / child_count as f32)
        .collect()
}

pub(crate) fn ratios_valid(ratios: &[f32]) -> bool {
    let mut prev = 0.0;
    for &r in ratios {
        if !r.is_finite() || r < RATIO_EPSILON || r > 1.0 - RATIO_EPSILON || r <= prev {
            return false;
        }
        prev = r;
    }
    true
}

/// Force ratios back into shape: right count, inside (ε, 1−ε), strictly
/// increasing. Falls back to even spacing when clamping cannot fix them.
/// Returns true if anything changed.
pub(crate) fn repair_ratios(ratios: &mut Vec<f32>, child_count: usize) -> bool {
    let expected = child_count.saturating_sub(1);
    if ratios.len() == expected && ratios_valid(ratios) {
        return false;
    }
    if ratios.len() != expected || ratios.iter().any(|r| !r.is_finite()) {
        *ratios = uniform_ratios(child_count);
        return true;
    }

    let mut prev = 0.0;
    for r in ratios.iter_mut() {
        *r = r.clamp(RATIO_EPSILON, 1.0 - RATIO_EPSILON).max(prev + RATIO_EPSILON);
        prev = *r;
    }
    if !ratios_valid(ratios) {
        *ratios = uniform_ratios(child_count);
    }
    true
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// Split a rect into one sub-rect per child along `direction`.
pub(crate) fn child_rects(rect: Rect, direction: SplitDirection, ratios: &[f32], count: usize) -> Vec<Rect> {
    (0..count)
        .map(|i| {
            let (lo, hi) = span(ratios, i);
            match direction {
                SplitDirection::Horizontal => Rect::new(
                    rect.x + rect.width * lo,
                    rect.y,
                    rect.width * (hi - lo),
                    rect.height,
                ),
                SplitDirection::Vertical => Rect::new(
                    rect.x,
                    rect.y + rect.height * lo,
                    rect.width,
                    rect.height * (hi - lo),
                ),
            }
        })
        .collect()
}
