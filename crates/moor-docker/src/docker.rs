use std::collections::BTreeMap;

use moor_core::{
    DockError, DockPosition, DockTarget, Edge, GeometryProvider, HitTest, NodeId, PaneId, Rect,
    Result, Size, Vec2,
};
use moor_layout::{nearest_edge, nearest_frame_side, resolve_edge, DockTree, EdgeResolution, LayoutSnapshot};

use crate::pane::{FloatingPane, Listener, Pane};
use crate::session::{indicator_rect, DockIndicator, DockSession, DragOutcome};
use crate::settings::DockSettings;

// ──────────────────────────────────────────────
// Docker: owns the tree, the panes and the drag session
// ──────────────────────────────────────────────

/// Where a pane currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockState {
    Embedded(NodeId),
    Floating,
}

#[derive(Debug)]
pub enum CloseOutcome<C> {
    /// The floating pane was re-docked at this frame edge.
    Docked(Edge),
    AlreadyDocked,
    /// The pane was removed; its content is handed back.
    Destroyed(C),
}

#[derive(Debug, Clone, Copy)]
enum PaneEvent {
    Dock,
    Undock,
    Close,
}

pub struct Docker<C> {
    tree: DockTree,
    panes: BTreeMap<PaneId, Pane<C>>,
    /// Floating panes in z-order, front-most last.
    floating: Vec<FloatingPane>,
    next_id: PaneId,
    frame: Rect,
    settings: DockSettings,
    session: DockSession,
}

impl<C> Docker<C> {
    pub fn new(frame: Rect) -> Self {
        Self::with_settings(frame, DockSettings::default())
    }

    pub fn with_settings(frame: Rect, settings: DockSettings) -> Self {
        let mut tree = DockTree::new();
        tree.set_frame(frame);
        Self {
            tree,
            panes: BTreeMap::new(),
            floating: Vec::new(),
            next_id: 1,
            frame,
            settings,
            session: DockSession::Idle,
        }
    }

    pub fn tree(&self) -> &DockTree {
        &self.tree
    }

    pub fn settings(&self) -> &DockSettings {
        &self.settings
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The main frame moved or resized.
    pub fn set_frame_rect(&mut self, frame: Rect) {
        self.frame = frame;
        self.tree.set_frame(frame);
    }

    // ── Panes ──

    pub fn create_pane(&mut self, title: impl Into<String>, content: C, position: DockPosition) -> PaneId {
        self.create_pane_sized(title, content, position, None)
    }

    /// Like `create_pane`, with the content's preferred floating size.
    pub fn create_pane_sized(
        &mut self,
        title: impl Into<String>,
        content: C,
        position: DockPosition,
        preferred: Option<Size>,
    ) -> PaneId {
        let id = self.next_id;
        self.next_id += 1;
        self.panes.insert(id, Pane::new(title.into(), content));

        let docked = position.edge().and_then(|edge| match self.tree.insert(id, None, edge) {
            Ok(group) => Some(group),
            Err(e) => {
                log::warn!("pane {id} could not dock at {edge:?}, floating instead: {e}");
                None
            }
        });
        match docked {
            Some(group) => log::debug!("created pane {id} docked in {group:?}"),
            None => {
                let size = preferred.unwrap_or(self.settings.default_floating_size);
                let rect = self.cascade_rect(size);
                self.floating.push(FloatingPane::new(id, rect));
                log::debug!("created floating pane {id} at {rect:?}");
            }
        }
        id
    }

    /// New floating rect centered on the frame, offset per existing floating pane.
    fn cascade_rect(&self, size: Size) -> Rect {
        let center = self.frame.center();
        let step = self.settings.floating_cascade * self.floating.len() as f32;
        Rect::new(
            center.x - size.width / 2.0 + step,
            center.y - size.height / 2.0 + step,
            size.width,
            size.height,
        )
    }

    pub fn pane(&self, pane: PaneId) -> Option<&Pane<C>> {
        self.panes.get(&pane)
    }

    pub fn pane_ids(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.panes.keys().copied()
    }

    fn pane_mut(&mut self, pane: PaneId) -> Result<&mut Pane<C>> {
        self.panes.get_mut(&pane).ok_or(DockError::UnknownPane(pane))
    }

    pub fn title(&self, pane: PaneId) -> Option<&str> {
        self.panes.get(&pane).map(|p| p.title())
    }

    pub fn set_title(&mut self, pane: PaneId, title: impl Into<String>) -> Result<()> {
        self.pane_mut(pane)?.title = title.into();
        Ok(())
    }

    pub fn content(&self, pane: PaneId) -> Option<&C> {
        self.panes.get(&pane).map(|p| p.content())
    }

    pub fn content_mut(&mut self, pane: PaneId) -> Option<&mut C> {
        self.panes.get_mut(&pane).map(|p| p.content_mut())
    }

    /// Swap in new content, returning the old.
    pub fn set_content(&mut self, pane: PaneId, content: C) -> Result<C> {
        Ok(std::mem::replace(&mut self.pane_mut(pane)?.content, content))
    }

    pub fn set_dock_on_close(&mut self, pane: PaneId, dock_on_close: bool) -> Result<()> {
        self.pane_mut(pane)?.dock_on_close = dock_on_close;
        Ok(())
    }

    pub fn set_on_close(&mut self, pane: PaneId, listener: impl FnMut(PaneId) + 'static) -> Result<()> {
        self.pane_mut(pane)?.listeners.on_close = Some(Box::new(listener) as Listener);
        Ok(())
    }

    pub fn set_on_dock(&mut self, pane: PaneId, listener: impl FnMut(PaneId) + 'static) -> Result<()> {
        self.pane_mut(pane)?.listeners.on_dock = Some(Box::new(listener) as Listener);
        Ok(())
    }

    pub fn set_on_undock(&mut self, pane: PaneId, listener: impl FnMut(PaneId) + 'static) -> Result<()> {
        self.pane_mut(pane)?.listeners.on_undock = Some(Box::new(listener) as Listener);
        Ok(())
    }

    fn notify(&mut self, pane: PaneId, event: PaneEvent) {
        let Some(p) = self.panes.get_mut(&pane) else {
            return;
        };
        let listener = match event {
            PaneEvent::Dock => &mut p.listeners.on_dock,
            PaneEvent::Undock => &mut p.listeners.on_undock,
            PaneEvent::Close => &mut p.listeners.on_close,
        };
        if let Some(callback) = listener.as_mut() {
            callback(pane);
        }
    }

    // ── Queries ──

    pub fn dock_state(&self, pane: PaneId) -> Option<DockState> {
        if !self.panes.contains_key(&pane) {
            return None;
        }
        match self.tree.group_of(pane) {
            Some(group) => Some(DockState::Embedded(group)),
            None => Some(DockState::Floating),
        }
    }

    /// Screen rect of a floating pane, or of the region an embedded pane
    /// occupies in the current frame.
    pub fn pane_rect(&self, pane: PaneId) -> Option<Rect> {
        if let Some(floating) = self.floating_pane(pane) {
            return Some(floating.rect);
        }
        let group = self.tree.group_of(pane)?;
        self.layout().region_rect(group)
    }

    pub fn layout(&self) -> LayoutSnapshot {
        self.tree.compute(self.frame)
    }

    pub fn floating(&self) -> &[FloatingPane] {
        &self.floating
    }

    pub fn floating_pane(&self, pane: PaneId) -> Option<&FloatingPane> {
        self.floating.iter().find(|f| f.pane == pane)
    }

    fn floating_mut(&mut self, pane: PaneId) -> Option<&mut FloatingPane> {
        self.floating.iter_mut().find(|f| f.pane == pane)
    }

    pub fn bring_to_front(&mut self, pane: PaneId) -> Result<()> {
        let Some(index) = self.floating.iter().position(|f| f.pane == pane) else {
            return Err(if self.tree.contains(pane) {
                DockError::AlreadyEmbedded(pane)
            } else {
                DockError::UnknownPane(pane)
            });
        };
        let record = self.floating.remove(index);
        self.floating.push(record);
        Ok(())
    }

    /// Tree invariants hold and every pane is either embedded or floating.
    pub fn is_consistent(&self) -> bool {
        self.tree.validate().is_ok()
            && self.panes.keys().all(|&id| {
                let embedded = self.tree.contains(id);
                let floating = self.floating.iter().filter(|f| f.pane == id).count();
                (embedded && floating == 0) || (!embedded && floating == 1)
            })
            && self.floating.iter().all(|f| self.panes.contains_key(&f.pane))
    }

    // ── Tree edits ──

    /// Dock a floating pane at `edge` of `region`, or of the frame.
    pub fn insert(&mut self, pane: PaneId, region: Option<NodeId>, edge: Edge) -> Result<NodeId> {
        if !self.panes.contains_key(&pane) {
            return Err(DockError::UnknownPane(pane));
        }
        let group = self.tree.insert(pane, region, edge)?;
        self.floating.retain(|f| f.pane != pane);
        if self.session.pane() == Some(pane) {
            self.session = DockSession::Idle;
        }
        self.notify(pane, PaneEvent::Dock);
        Ok(group)
    }

    /// Undock `pane` into a floating pane covering the rect it occupied.
    /// Returns that rect.
    pub fn remove<G: GeometryProvider + ?Sized>(&mut self, pane: PaneId, geometry: &G) -> Result<Rect> {
        if !self.panes.contains_key(&pane) {
            return Err(DockError::UnknownPane(pane));
        }
        let prior = self.tree.remove(pane, geometry)?;
        if self.session.pane() == Some(pane) {
            self.session = DockSession::Idle;
        }
        let rect = if prior.is_degenerate() {
            self.cascade_rect(self.settings.default_floating_size)
        } else {
            prior
        };
        self.floating.push(FloatingPane::new(pane, rect));
        self.notify(pane, PaneEvent::Undock);
        Ok(prior)
    }

    pub fn reformat(&mut self) {
        self.tree.reformat();
    }

    /// Resolve `point` against `candidates`, falling back to this frame.
    pub fn resolve_edge(&self, point: Vec2, candidates: &[Rect], include_center: bool) -> Option<EdgeResolution> {
        resolve_edge(point, candidates, self.frame, include_center)
    }

    fn dock_at(&mut self, pane: PaneId, target: DockTarget) -> Result<NodeId> {
        match target {
            DockTarget::Region(region, edge) => self.insert(pane, Some(region), edge),
            DockTarget::Frame(edge) => self.insert(pane, None, edge),
        }
    }

    // ── Closing ──

    pub fn close_pane(&mut self, pane: PaneId) -> Result<CloseOutcome<C>> {
        let dock_on_close = self
            .panes
            .get(&pane)
            .map(|p| p.dock_on_close)
            .ok_or(DockError::UnknownPane(pane))?;
        if self.session.pane() == Some(pane) {
            self.cancel();
        }

        if dock_on_close {
            let Some(floating) = self.floating_pane(pane) else {
                return Ok(CloseOutcome::AlreadyDocked);
            };
            let edge = nearest_frame_side(self.frame, floating.rect.center());
            self.insert(pane, None, edge)?;
            log::debug!("closing pane {pane} docked it at {edge:?}");
            return Ok(CloseOutcome::Docked(edge));
        }

        self.notify(pane, PaneEvent::Close);
        if self.tree.contains(pane) {
            let snapshot = self.layout();
            self.tree.remove(pane, &snapshot)?;
        }
        self.floating.retain(|f| f.pane != pane);
        let removed = self.panes.remove(&pane).ok_or(DockError::UnknownPane(pane))?;
        log::debug!("destroyed pane {pane}");
        Ok(CloseOutcome::Destroyed(removed.content))
    }

    /// The main frame is closing: abort any drag and destroy every floating
    /// pane. Returns their contents.
    pub fn close_frame(&mut self) -> Vec<(PaneId, C)> {
        self.cancel();
        let floating = std::mem::take(&mut self.floating);
        floating
            .into_iter()
            .filter_map(|f| self.panes.remove(&f.pane).map(|p| (f.pane, p.content)))
            .collect()
    }

    // ──────────────────────────────────────────
    // Drag session
    // ──────────────────────────────────────────

    pub fn session(&self) -> &DockSession {
        &self.session
    }

    /// The dock indicator to draw, if the current drag has one.
    pub fn indicator(&self) -> Option<&DockIndicator> {
        self.session.indicator()
    }

    /// Pointer pressed on a pane's tab or title bar.
    pub fn press(&mut self, pane: PaneId, point: Vec2) -> Result<()> {
        if self.session.is_active() {
            return Err(DockError::SessionActive);
        }
        if !self.panes.contains_key(&pane) {
            return Err(DockError::UnknownPane(pane));
        }

        if self.tree.contains(pane) {
            self.tree.select(pane)?;
            self.session = DockSession::DraggingEmbedded { pane, origin: point };
        } else {
            let origin = self
                .floating_pane(pane)
                .map(|f| f.rect.origin())
                .ok_or(DockError::UnknownPane(pane))?;
            self.bring_to_front(pane)?;
            self.session = DockSession::DraggingFloating {
                pane,
                grab_offset: point - origin,
                indicator: None,
            };
        }
        log::debug!("drag session started for pane {pane}");
        Ok(())
    }

    /// Pointer moved. `host` supplies current region geometry.
    pub fn drag<H: GeometryProvider + HitTest + ?Sized>(&mut self, point: Vec2, host: &H) -> Result<()> {
        match self.session {
            DockSession::Idle => Ok(()),
            DockSession::DraggingEmbedded { pane, origin } => {
                if point.distance(origin) <= self.settings.undock_threshold {
                    return Ok(());
                }
                self.tear_off(pane, origin, point, host)
            }
            DockSession::DraggingFloating { pane, grab_offset, .. } => {
                let opacity = self.drag_opacity();
                if let Some(floating) = self.floating_mut(pane) {
                    let origin = point - grab_offset;
                    floating.rect.x = origin.x;
                    floating.rect.y = origin.y;
                    floating.opacity = opacity;
                }
                let probed = self.probe(point, host);
                if let DockSession::DraggingFloating { indicator, .. } = &mut self.session {
                    *indicator = probed;
                }
                Ok(())
            }
        }
    }

    /// Undock the dragged pane and keep it under the pointer at the same
    /// offset it was grabbed at.
    fn tear_off<G: GeometryProvider + ?Sized>(
        &mut self,
        pane: PaneId,
        origin: Vec2,
        point: Vec2,
        geometry: &G,
    ) -> Result<()> {
        let prior = self.remove(pane, geometry)?;
        let opacity = self.drag_opacity();
        let Some(floating) = self.floating_mut(pane) else {
            self.session = DockSession::Idle;
            return Ok(());
        };
        let grab_offset = if prior.is_degenerate() {
            Vec2::new(floating.rect.width / 2.0, floating.rect.height / 2.0)
        } else {
            origin - prior.origin()
        };
        let top_left = point - grab_offset;
        floating.rect.x = top_left.x;
        floating.rect.y = top_left.y;
        floating.opacity = opacity;

        // Host geometry is stale until it lays out again; no indicator yet.
        self.session = DockSession::DraggingFloating {
            pane,
            grab_offset,
            indicator: None,
        };
        log::debug!("pane {pane} torn off into a floating pane");
        Ok(())
    }

    fn drag_opacity(&self) -> f32 {
        if self.settings.opaque_on_drag {
            1.0
        } else {
            self.settings.drag_opacity
        }
    }

    /// Dock target under `point`: a region edge (or center), nothing inside
    /// the frame body, or the nearest frame edge.
    fn probe<H: GeometryProvider + HitTest + ?Sized>(&self, point: Vec2, host: &H) -> Option<DockIndicator> {
        let size = self.settings.indicator_size;
        let region = host
            .region_at(point)
            .filter(|&id| self.tree.tab_group(id).is_some())
            .and_then(|id| host.region_rect(id).map(|rect| (id, rect)));
        if let Some((id, rect)) = region {
            if let Ok(edge) = nearest_edge(rect, point, true) {
                return Some(DockIndicator {
                    target: DockTarget::Region(id, edge),
                    rect: indicator_rect(rect, edge, self.settings.indicator_inner_shift, size),
                });
            }
        }

        if self.frame.inset(self.settings.dock_outside_offset).contains(point) {
            return None;
        }
        let edge = nearest_edge(self.frame, point, false).ok()?;
        log::trace!("frame edge {edge:?} offered at {point:?}");
        Some(DockIndicator {
            target: DockTarget::Frame(edge),
            rect: indicator_rect(self.frame, edge, -self.settings.indicator_outer_shift, size),
        })
    }

    /// Pointer released.
    pub fn release(&mut self, point: Vec2) -> Result<DragOutcome> {
        match std::mem::take(&mut self.session) {
            DockSession::Idle | DockSession::DraggingEmbedded { .. } => Ok(DragOutcome::Unchanged),
            DockSession::DraggingFloating { pane, indicator, .. } => {
                if let Some(floating) = self.floating_mut(pane) {
                    floating.opacity = 1.0;
                }
                // A tree edit during the drag may have removed the indicated region.
                let stale = indicator
                    .and_then(|i| i.target.region())
                    .is_some_and(|region| self.tree.tab_group(region).is_none());
                match indicator {
                    Some(_) if stale => {
                        log::debug!("pane {pane} released over a region that no longer exists");
                        Ok(DragOutcome::Floating)
                    }
                    Some(indicator) if indicator.rect.contains(point) => {
                        self.dock_at(pane, indicator.target)?;
                        log::debug!("pane {pane} docked at {:?}", indicator.target);
                        Ok(DragOutcome::Docked(indicator.target))
                    }
                    _ => Ok(DragOutcome::Floating),
                }
            }
        }
    }

    /// Abort the current drag without touching the tree.
    pub fn cancel(&mut self) {
        if let DockSession::DraggingFloating { pane, .. } = std::mem::take(&mut self.session) {
            if let Some(floating) = self.floating_mut(pane) {
                floating.opacity = 1.0;
            }
        }
    }
}
