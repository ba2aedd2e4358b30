// Docking tree layout engine
// N-ary split containers over tab-group leaves, held in a slot-map arena.

mod inspect;
mod node;
mod resolve;
mod snapshot;

use moor_core::{
    DockError, Edge, GeometryProvider, NodeId, PaneId, Rect, Result, SplitDirection, Vec2,
};
use slotmap::SlotMap;

pub use inspect::InvariantViolation;
pub use node::{DockNode, SplitContainer, TabGroup};
pub use resolve::{nearest_edge, nearest_frame_side, resolve_edge, EdgeResolution};
pub use snapshot::{Divider, DividerHandle, LayoutSnapshot};

use node::{
    child_rects, insertion_ratio, remove_ratio, repair_ratios, splice_ratios, uniform_ratios,
    Absorb,
};

// ──────────────────────────────────────────────
// DockTree
// ──────────────────────────────────────────────

/// Minimum fraction of a container each neighbour of a dragged divider keeps.
const MIN_CHILD_FRACTION: f32 = 0.05;

/// Divider hit-test threshold in pixels.
const DIVIDER_HIT_THRESHOLD: f32 = 8.0;

pub struct DockTree {
    nodes: SlotMap<NodeId, DockNode>,
    /// Always a split container; empty when nothing is docked.
    root: NodeId,
    /// The divider currently being dragged.
    pub(crate) active_divider: Option<DividerHandle>,
    /// The last frame the tree was laid out in (needed to reconstruct rects during drag).
    pub(crate) last_frame: Option<Rect>,
}

impl DockTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(DockNode::Split(SplitContainer::new(SplitDirection::Horizontal)));
        Self {
            nodes,
            root,
            active_divider: None,
            last_frame: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(id)
    }

    pub fn tab_group(&self, id: NodeId) -> Option<&TabGroup> {
        match self.nodes.get(id) {
            Some(DockNode::Tabs(group)) => Some(group),
            _ => None,
        }
    }

    pub fn split(&self, id: NodeId) -> Option<&SplitContainer> {
        match self.nodes.get(id) {
            Some(DockNode::Split(split)) => Some(split),
            _ => None,
        }
    }

    fn split_mut(&mut self, id: NodeId) -> Option<&mut SplitContainer> {
        match self.nodes.get_mut(id) {
            Some(DockNode::Split(split)) => Some(split),
            _ => None,
        }
    }

    /// True when nothing is docked.
    pub fn is_empty(&self) -> bool {
        self.split(self.root).map_or(true, |s| s.children.is_empty())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.last_frame = Some(frame);
    }

    /// All docked pane ids in tree order.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        for region in self.regions() {
            if let Some(group) = self.tab_group(region) {
                ids.extend_from_slice(&group.panes);
            }
        }
        ids
    }

    /// Tab group ids in tree order (left to right, top to bottom).
    pub fn regions(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_regions(self.root, &mut out);
        out
    }

    fn collect_regions(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.nodes.get(id) {
            Some(DockNode::Tabs(_)) => out.push(id),
            Some(DockNode::Split(split)) => {
                for &child in &split.children {
                    self.collect_regions(child, out);
                }
            }
            None => {}
        }
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.group_of(pane).is_some()
    }

    /// The tab group holding `pane`.
    pub fn group_of(&self, pane: PaneId) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, node)| match node {
            DockNode::Tabs(group) if group.panes.contains(&pane) => Some(id),
            _ => None,
        })
    }

    /// The container holding `id` and the child index within it.
    pub fn parent_of(&self, id: NodeId) -> Option<(NodeId, usize)> {
        self.nodes.iter().find_map(|(parent, node)| match node {
            DockNode::Split(split) => split
                .children
                .iter()
                .position(|&c| c == id)
                .map(|index| (parent, index)),
            DockNode::Tabs(_) => None,
        })
    }

    /// Dock `pane` at `edge` of the tab group `target`, or of the whole
    /// frame when `target` is `None`. Returns the tab group now holding it.
    pub fn insert(&mut self, pane: PaneId, target: Option<NodeId>, edge: Edge) -> Result<NodeId> {
        if self.contains(pane) {
            return Err(DockError::AlreadyEmbedded(pane));
        }
        if let Some(t) = target {
            if self.tab_group(t).is_none() {
                return Err(DockError::UnknownRegion(t));
            }
        }
        self.end_divider_drag();

        let Some((direction, insert_first)) = edge.split_placement() else {
            let target = target.ok_or(DockError::CenterWithoutRegion)?;
            if let Some(DockNode::Tabs(group)) = self.nodes.get_mut(target) {
                group.push(pane);
            }
            log::debug!("docked pane {pane} as a tab of {target:?}");
            return Ok(target);
        };

        let (container, target_index) = match target {
            Some(t) => {
                let (parent, index) = self.parent_of(t).ok_or(DockError::UnknownRegion(t))?;
                (parent, Some(index))
            }
            None => (self.root, None),
        };
        let (container_dir, len) = match self.split(container) {
            Some(split) => (split.direction, split.children.len()),
            None => return Err(DockError::UnknownRegion(container)),
        };

        let group = self.nodes.insert(DockNode::Tabs(TabGroup::new(pane)));

        let donor = if len == 0 {
            // Empty root: adopt the orientation and take the whole frame.
            if let Some(split) = self.split_mut(container) {
                split.direction = direction;
                split.children.push(group);
            }
            None
        } else if container_dir == direction {
            let anchor = target_index.unwrap_or(if insert_first { 0 } else { len - 1 });
            let at = if insert_first { anchor } else { anchor + 1 };
            let split = self
                .split_mut(container)
                .ok_or(DockError::UnknownRegion(container))?;
            let donor = split.children[anchor];
            let ratio = insertion_ratio(&split.ratios, anchor);
            split.children.insert(at, group);
            split.ratios.insert(anchor, ratio);
            Some(donor)
        } else {
            match target_index {
                Some(index) => {
                    let sibling = self.split(container).map(|s| s.children[index]);
                    let Some(sibling) = sibling else {
                        return Err(DockError::UnknownRegion(container));
                    };
                    let (first, second) = if insert_first { (group, sibling) } else { (sibling, group) };
                    let wrapper = self
                        .nodes
                        .insert(DockNode::Split(SplitContainer::pair(direction, first, second)));
                    if let Some(split) = self.split_mut(container) {
                        split.children[index] = wrapper;
                    }
                    Some(sibling)
                }
                None => {
                    // Wrap the whole tree. The root id stays stable; its old
                    // contents move into a fresh child container.
                    let old = match self.split_mut(container) {
                        Some(split) => std::mem::replace(split, SplitContainer::new(direction)),
                        None => return Err(DockError::UnknownRegion(container)),
                    };
                    let old_id = self.nodes.insert(DockNode::Split(old));
                    let (first, second) = if insert_first { (group, old_id) } else { (old_id, group) };
                    if let Some(split) = self.split_mut(container) {
                        *split = SplitContainer::pair(direction, first, second);
                    }
                    Some(old_id)
                }
            }
        };

        if let Some(DockNode::Tabs(tabs)) = self.nodes.get_mut(group) {
            tabs.donor = donor;
        }
        self.collapse();
        log::debug!("docked pane {pane} at {edge:?} of {target:?}");
        Ok(group)
    }

    /// Undock `pane`. Returns the rect its tab group occupied, taken from
    /// `geometry` or, failing that, from the tree's own layout.
    pub fn remove<G: GeometryProvider + ?Sized>(&mut self, pane: PaneId, geometry: &G) -> Result<Rect> {
        let group = self.group_of(pane).ok_or(DockError::NotEmbedded(pane))?;
        let prior = geometry
            .region_rect(group)
            .or_else(|| {
                self.last_frame
                    .and_then(|frame| self.compute(frame).region_rect(group))
            })
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        self.end_divider_drag();

        let (now_empty, donor) = match self.nodes.get_mut(group) {
            Some(DockNode::Tabs(tabs)) => {
                tabs.remove(pane);
                (tabs.panes.is_empty(), tabs.donor)
            }
            _ => (false, None),
        };

        if now_empty {
            if let Some((parent, index)) = self.parent_of(group) {
                if let Some(split) = self.split_mut(parent) {
                    let count = split.children.len();
                    let donor_index = donor.and_then(|d| split.children.iter().position(|&c| c == d));
                    let absorb = match donor_index {
                        Some(d) if d + 1 == index => Absorb::Before,
                        Some(d) if d == index + 1 => Absorb::After,
                        _ => Absorb::Even,
                    };
                    split.children.remove(index);
                    remove_ratio(&mut split.ratios, index, count, absorb);
                }
            }
            self.nodes.remove(group);
        }

        self.collapse();
        log::debug!("undocked pane {pane} from {group:?}");
        Ok(prior)
    }

    /// Make `pane` the active tab of its group.
    pub fn select(&mut self, pane: PaneId) -> Result<()> {
        let group = self.group_of(pane).ok_or(DockError::NotEmbedded(pane))?;
        if let Some(DockNode::Tabs(tabs)) = self.nodes.get_mut(group) {
            tabs.select(pane);
        }
        Ok(())
    }

    /// Reset every container's dividers to even spacing.
    pub fn reformat(&mut self) {
        for node in self.nodes.values_mut() {
            if let DockNode::Split(split) = node {
                split.ratios = uniform_ratios(split.children.len());
            }
        }
    }

    /// Restore the normal form: no empty or single-child containers below
    /// the root, no same-orientation parent/child pairs.
    pub fn collapse(&mut self) {
        let root = self.root;
        self.normalize_children(root);

        let lone = match self.split(root) {
            Some(split) if split.children.len() == 1 => split.children[0],
            _ => return,
        };
        if self.split(lone).is_some() {
            if let Some(DockNode::Split(child)) = self.nodes.remove(lone) {
                if let Some(split) = self.split_mut(root) {
                    *split = child;
                }
            }
        }
    }

    /// Post-order rebuild of one subtree. Returns the node that now stands
    /// in its slot, or `None` if the subtree vanished.
    fn normalize(&mut self, id: NodeId) -> Option<NodeId> {
        match self.nodes.get(id)? {
            DockNode::Tabs(group) => {
                if group.panes.is_empty() {
                    self.nodes.remove(id);
                    return None;
                }
                return Some(id);
            }
            DockNode::Split(_) => {}
        }

        self.normalize_children(id);
        let children = self.split(id).map(|s| s.children.clone()).unwrap_or_default();
        match children.as_slice() {
            [] => {
                self.nodes.remove(id);
                None
            }
            [only] => {
                self.nodes.remove(id);
                Some(*only)
            }
            _ => Some(id),
        }
    }

    fn normalize_children(&mut self, id: NodeId) {
        let Some(split) = self.split(id) else {
            return;
        };
        let direction = split.direction;
        let originals = split.children.clone();
        let mut ratios = split.ratios.clone();
        let total = originals.len();
        let mut children: Vec<NodeId> = Vec::with_capacity(total);

        for (i, child) in originals.into_iter().enumerate() {
            // `ratios` describes `children` followed by the unvisited originals.
            let pos = children.len();
            match self.normalize(child) {
                None => {
                    let count = pos + (total - i);
                    remove_ratio(&mut ratios, pos, count, Absorb::Even);
                }
                Some(c) => {
                    let same_axis = matches!(self.split(c), Some(s) if s.direction == direction);
                    if same_axis {
                        if let Some(DockNode::Split(absorbed)) = self.nodes.remove(c) {
                            ratios = splice_ratios(&ratios, pos, &absorbed.ratios);
                            children.extend(absorbed.children);
                        }
                    } else {
                        children.push(c);
                    }
                }
            }
        }

        let count = children.len();
        if let Some(split) = self.split_mut(id) {
            split.children = children;
            split.ratios = ratios;
            if repair_ratios(&mut split.ratios, count) {
                log::warn!("repaired degenerate divider ratios in {id:?}");
            }
        }
    }

    // ──────────────────────────────────────────
    // Geometry
    // ──────────────────────────────────────────

    /// Lay the tree out inside `frame`.
    pub fn compute(&self, frame: Rect) -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot::new(frame);
        self.layout_node(self.root, frame, &mut snapshot);
        snapshot
    }

    fn layout_node(&self, id: NodeId, rect: Rect, out: &mut LayoutSnapshot) {
        match self.nodes.get(id) {
            Some(DockNode::Tabs(_)) => out.regions.push((id, rect)),
            Some(DockNode::Split(split)) => {
                let rects = child_rects(rect, split.direction, &split.ratios, split.children.len());
                for (i, (&child, child_rect)) in split.children.iter().zip(rects).enumerate() {
                    if i > 0 {
                        let position = match split.direction {
                            SplitDirection::Horizontal => child_rect.x,
                            SplitDirection::Vertical => child_rect.y,
                        };
                        out.dividers.push(Divider {
                            handle: DividerHandle {
                                container: id,
                                index: i - 1,
                            },
                            direction: split.direction,
                            position,
                            extent: rect,
                        });
                    }
                    self.layout_node(child, child_rect, out);
                }
            }
            None => {}
        }
    }

    // ──────────────────────────────────────────
    // Divider dragging
    // ──────────────────────────────────────────

    /// Begin a divider drag if `position` is near a divider.
    pub fn begin_divider_drag(&mut self, position: Vec2, frame: Rect) -> bool {
        self.last_frame = Some(frame);
        let snapshot = self.compute(frame);
        self.active_divider = snapshot
            .divider_at(position, DIVIDER_HIT_THRESHOLD)
            .map(|d| d.handle);
        self.active_divider.is_some()
    }

    /// Move the active divider to follow `position`.
    pub fn drag_divider(&mut self, position: Vec2) {
        let (Some(handle), Some(frame)) = (self.active_divider, self.last_frame) else {
            return;
        };
        let snapshot = self.compute(frame);
        let Some(divider) = snapshot.dividers.iter().find(|d| d.handle == handle) else {
            self.active_divider = None;
            return;
        };
        let extent = divider.extent;
        let fraction = match divider.direction {
            SplitDirection::Horizontal => (position.x - extent.x) / extent.width,
            SplitDirection::Vertical => (position.y - extent.y) / extent.height,
        };
        self.set_divider(handle, fraction);
    }

    pub fn end_divider_drag(&mut self) {
        self.active_divider = None;
    }

    pub fn active_divider(&self) -> Option<DividerHandle> {
        self.active_divider
    }

    /// Place a divider at `fraction` of its container, keeping both
    /// neighbours at least `MIN_CHILD_FRACTION` wide.
    pub fn set_divider(&mut self, handle: DividerHandle, fraction: f32) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let Some(split) = self.split_mut(handle.container) else {
            return false;
        };
        if handle.index >= split.ratios.len() {
            return false;
        }
        let lo = if handle.index == 0 { 0.0 } else { split.ratios[handle.index - 1] };
        let hi = split.ratios.get(handle.index + 1).copied().unwrap_or(1.0);
        let (min, max) = (lo + MIN_CHILD_FRACTION, hi - MIN_CHILD_FRACTION);
        split.ratios[handle.index] = if min <= max {
            fraction.clamp(min, max)
        } else {
            (lo + hi) / 2.0
        };
        true
    }
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}
