// Docking facade: panes, floating windows and the pointer-drag session
// layered over the moor-layout tree.

mod docker;
mod pane;
mod session;
mod settings;
mod tests;

pub use docker::{CloseOutcome, DockState, Docker};
pub use pane::{FloatingPane, Listener, Pane};
pub use session::{DockIndicator, DockSession, DragOutcome};
pub use settings::{load_settings, load_settings_from, save_settings_to, settings_path, DockSettings};

pub use moor_core::{DockError, DockPosition, DockTarget, Edge, PaneId, Rect, Size, Vec2};
pub use moor_layout::{DockTree, LayoutSnapshot};
