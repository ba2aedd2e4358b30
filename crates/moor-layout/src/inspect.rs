use std::collections::HashSet;
use std::fmt::Write as _;

use moor_core::{NodeId, PaneId, SplitDirection};

use crate::node::{ratios_valid, DockNode};
use crate::DockTree;

// ──────────────────────────────────────────────
// Structural checks
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("root {0:?} is not a split container")]
    RootNotSplit(NodeId),
    #[error("root adopts a lone split child {0:?}")]
    RootWrapsSplit(NodeId),
    #[error("container {0:?} has {1} children")]
    Underfull(NodeId, usize),
    #[error("container {0:?} directly holds same-orientation container {1:?}")]
    SameOrientation(NodeId, NodeId),
    #[error("container {0:?} has malformed ratios {1:?}")]
    BadRatios(NodeId, Vec<f32>),
    #[error("tab group {0:?} is empty")]
    EmptyTabGroup(NodeId),
    #[error("tab group {0:?} has an out-of-range active tab")]
    BadActiveTab(NodeId),
    #[error("pane {0} appears more than once")]
    DuplicatePane(PaneId),
    #[error("node {0:?} is referenced but missing")]
    Dangling(NodeId),
    #[error("{0} nodes are unreachable from the root")]
    Orphans(usize),
}

impl DockTree {
    /// Check the structural invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let root = self.root();
        let split = self.split(root).ok_or(InvariantViolation::RootNotSplit(root))?;
        if let [only] = split.children() {
            if self.split(*only).is_some() {
                return Err(InvariantViolation::RootWrapsSplit(*only));
            }
        }

        let mut seen_nodes = HashSet::new();
        let mut seen_panes = HashSet::new();
        self.validate_node(root, true, &mut seen_nodes, &mut seen_panes)?;

        let orphans = self.node_count() - seen_nodes.len();
        if orphans > 0 {
            return Err(InvariantViolation::Orphans(orphans));
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        is_root: bool,
        seen_nodes: &mut HashSet<NodeId>,
        seen_panes: &mut HashSet<PaneId>,
    ) -> Result<(), InvariantViolation> {
        seen_nodes.insert(id);
        match self.node(id).ok_or(InvariantViolation::Dangling(id))? {
            DockNode::Tabs(group) => {
                if group.panes().is_empty() {
                    return Err(InvariantViolation::EmptyTabGroup(id));
                }
                if group.active().is_none() {
                    return Err(InvariantViolation::BadActiveTab(id));
                }
                for &pane in group.panes() {
                    if !seen_panes.insert(pane) {
                        return Err(InvariantViolation::DuplicatePane(pane));
                    }
                }
            }
            DockNode::Split(split) => {
                let count = split.children().len();
                if !is_root && count < 2 {
                    return Err(InvariantViolation::Underfull(id, count));
                }
                if !ratios_well_formed(split.ratios(), count) {
                    return Err(InvariantViolation::BadRatios(id, split.ratios().to_vec()));
                }
                for &child in split.children() {
                    if let Some(inner) = self.split(child) {
                        if inner.direction() == split.direction() {
                            return Err(InvariantViolation::SameOrientation(id, child));
                        }
                    }
                    self.validate_node(child, false, seen_nodes, seen_panes)?;
                }
            }
        }
        Ok(())
    }

    /// Compact structural rendering, e.g. `H[0.50](#1 | V[0.50](#2 | #3))`.
    /// Tabs of one group are joined with `+`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_node(self.root(), &mut out);
        out
    }

    fn describe_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Some(DockNode::Tabs(group)) => {
                let tabs: Vec<String> = group.panes().iter().map(|p| format!("#{p}")).collect();
                out.push_str(&tabs.join("+"));
            }
            Some(DockNode::Split(split)) => {
                out.push(match split.direction() {
                    SplitDirection::Horizontal => 'H',
                    SplitDirection::Vertical => 'V',
                });
                let ratios: Vec<String> = split.ratios().iter().map(|r| format!("{r:.2}")).collect();
                let _ = write!(out, "[{}](", ratios.join(","));
                for (i, &child) in split.children().iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    self.describe_node(child, out);
                }
                out.push(')');
            }
            None => out.push('?'),
        }
    }
}

fn ratios_well_formed(ratios: &[f32], child_count: usize) -> bool {
    ratios.len() == child_count.saturating_sub(1) && ratios_valid(ratios)
}
