use moor_core::{PaneId, Rect};

/// Callback invoked with the pane it concerns.
pub type Listener = Box<dyn FnMut(PaneId)>;

#[derive(Default)]
pub(crate) struct Listeners {
    pub(crate) on_dock: Option<Listener>,
    pub(crate) on_undock: Option<Listener>,
    pub(crate) on_close: Option<Listener>,
}

/// A dockable pane: host content plus a title.
pub struct Pane<C> {
    pub(crate) title: String,
    pub(crate) content: C,
    /// Closing re-docks the pane instead of destroying it.
    pub(crate) dock_on_close: bool,
    pub(crate) listeners: Listeners,
}

impl<C> Pane<C> {
    pub(crate) fn new(title: String, content: C) -> Self {
        Self {
            title,
            content,
            dock_on_close: true,
            listeners: Listeners::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn dock_on_close(&self) -> bool {
        self.dock_on_close
    }
}

/// A pane living outside the tree in its own window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingPane {
    pub pane: PaneId,
    pub rect: Rect,
    pub opacity: f32,
}

impl FloatingPane {
    pub(crate) fn new(pane: PaneId, rect: Rect) -> Self {
        Self {
            pane,
            rect,
            opacity: 1.0,
        }
    }
}
