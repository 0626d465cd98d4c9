// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer/keyboard interaction state.
//!
//! `Mode` is the selection state machine; `Gesture` tracks an in-flight press-drag-release. The
//! machine never touches the board. It reports intents (`PointerAction`, `DragEnd`) that the
//! caller turns into session operations.

use tracing::debug;

use super::context_menu::ContextMenu;
use super::viewport::Viewport;
use crate::model::{Board, NodeId, Point};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    NodeSelected(NodeId),
    /// Waiting for the second endpoint of a new connection.
    Connecting {
        source: NodeId,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    None,
    /// Dragging empty canvas; `last` is the previous pointer position in screen units.
    Panning { last: Point },
    /// Dragging a node. `grab` is the pointer offset from the node origin in canvas units and
    /// `origin` the node position at press time.
    Dragging {
        node_id: NodeId,
        grab: Point,
        origin: Point,
    },
}

/// What a primary press asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerAction {
    /// Selection cleared by a press on empty canvas.
    Cleared,
    Selected(NodeId),
    /// A press on `to` completed a pending connection from `from`.
    Connect { from: NodeId, to: NodeId },
}

/// End of a node drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub node_id: NodeId,
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("select a node before connecting")]
    NothingSelected,
    #[error("already connecting from {pending}; finish or cancel first")]
    AlreadyConnecting { pending: NodeId },
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    mode: Mode,
    gesture: Gesture,
    menu: Option<ContextMenu>,
    pointer: Option<Point>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    pub fn context_menu_mut(&mut self) -> Option<&mut ContextMenu> {
        self.menu.as_mut()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        match &self.mode {
            Mode::NodeSelected(node_id) => Some(node_id),
            _ => None,
        }
    }

    pub fn pending_source(&self) -> Option<&NodeId> {
        match &self.mode {
            Mode::Connecting { source } => Some(source),
            _ => None,
        }
    }

    /// Last pointer position seen, in canvas units.
    pub fn last_pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn track_pointer(&mut self, screen: Point, viewport: &Viewport) {
        self.pointer = Some(viewport.screen_to_canvas(screen));
    }

    /// Primary button down at `screen`.
    pub fn press(&mut self, screen: Point, board: &Board, viewport: &Viewport) -> PointerAction {
        let canvas = viewport.screen_to_canvas(screen);
        self.pointer = Some(canvas);
        self.menu = None;

        let Some(node) = board.node_at(canvas) else {
            self.gesture = Gesture::Panning { last: screen };
            self.mode = Mode::Idle;
            return PointerAction::Cleared;
        };

        let node_id = node.id.clone();
        self.gesture = Gesture::Dragging {
            node_id: node_id.clone(),
            grab: Point::new(canvas.x - node.x, canvas.y - node.y),
            origin: node.position(),
        };

        let previous = std::mem::replace(&mut self.mode, Mode::NodeSelected(node_id.clone()));
        match previous {
            Mode::Connecting { source } => PointerAction::Connect {
                from: source,
                to: node_id,
            },
            Mode::Idle | Mode::NodeSelected(_) => PointerAction::Selected(node_id),
        }
    }

    /// Pointer moved with the primary button held.
    ///
    /// Pans `viewport` while panning. While dragging a node, returns its new position.
    pub fn drag_to(&mut self, screen: Point, viewport: &mut Viewport) -> Option<(NodeId, Point)> {
        match &mut self.gesture {
            Gesture::None => {
                self.pointer = Some(viewport.screen_to_canvas(screen));
                None
            }
            Gesture::Panning { last } => {
                viewport.pan_by(screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.pointer = Some(viewport.screen_to_canvas(screen));
                None
            }
            Gesture::Dragging { node_id, grab, .. } => {
                let canvas = viewport.screen_to_canvas(screen);
                self.pointer = Some(canvas);
                Some((node_id.clone(), Point::new(canvas.x - grab.x, canvas.y - grab.y)))
            }
        }
    }

    /// Primary button up. Returns the finished node drag, if any.
    pub fn release(&mut self) -> Option<DragEnd> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging {
                node_id, origin, ..
            } => Some(DragEnd { node_id, origin }),
            Gesture::Panning { .. } | Gesture::None => None,
        }
    }

    /// Secondary press at `screen`. Opens the add-node menu on empty canvas; does nothing over a
    /// node. Returns whether a menu was opened.
    pub fn open_context_menu(&mut self, screen: Point, board: &Board, viewport: &Viewport) -> bool {
        let canvas = viewport.screen_to_canvas(screen);
        self.pointer = Some(canvas);
        if board.node_at(canvas).is_some() {
            return false;
        }
        self.menu = Some(ContextMenu::new(screen, canvas));
        true
    }

    pub fn close_context_menu(&mut self) -> Option<ContextMenu> {
        self.menu.take()
    }

    /// Starts a connection from the selected node.
    pub fn begin_connect(&mut self) -> Result<NodeId, ConnectError> {
        match &self.mode {
            Mode::Idle => Err(ConnectError::NothingSelected),
            Mode::Connecting { source } => Err(ConnectError::AlreadyConnecting {
                pending: source.clone(),
            }),
            Mode::NodeSelected(node_id) => {
                let source = node_id.clone();
                self.mode = Mode::Connecting {
                    source: source.clone(),
                };
                debug!(source = %source, "connect started");
                Ok(source)
            }
        }
    }

    /// Backs out one level: closes the menu, then a pending connection, then the selection.
    pub fn cancel(&mut self) {
        if self.menu.take().is_some() {
            return;
        }
        self.mode = match std::mem::take(&mut self.mode) {
            Mode::Connecting { source } => Mode::NodeSelected(source),
            Mode::NodeSelected(_) | Mode::Idle => Mode::Idle,
        };
    }

    pub fn select(&mut self, node_id: NodeId) {
        self.mode = Mode::NodeSelected(node_id);
    }

    /// Drops every reference to `node_id` after it was deleted.
    pub fn forget_node(&mut self, node_id: &NodeId) {
        let involved = match &self.mode {
            Mode::Idle => false,
            Mode::NodeSelected(selected) => selected == node_id,
            Mode::Connecting { source } => source == node_id,
        };
        if involved {
            self.mode = Mode::Idle;
        }
        if matches!(&self.gesture, Gesture::Dragging { node_id: dragged, .. } if dragged == node_id)
        {
            self.gesture = Gesture::None;
        }
    }

    /// Called after undo/redo replaced the board with `board`.
    ///
    /// Drops references to nodes that no longer exist and abandons any node drag, whose origin
    /// belongs to the replaced board.
    pub fn snapshot_restored(&mut self, board: &Board) {
        let missing = match &self.mode {
            Mode::Idle => None,
            Mode::NodeSelected(node_id) | Mode::Connecting { source: node_id } => {
                (!board.contains_node(node_id)).then(|| node_id.clone())
            }
        };
        if let Some(node_id) = missing {
            self.forget_node(&node_id);
        }
        if matches!(self.gesture, Gesture::Dragging { .. }) {
            self.gesture = Gesture::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{ConnectError, DragEnd, Gesture, Interaction, Mode, PointerAction};
    use crate::model::fixtures::investigation_small;
    use crate::model::{Board, NodeId, Point};
    use crate::view::Viewport;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[fixture]
    fn board() -> Board {
        investigation_small()
    }

    // n:suspect spans (400..600, 300..450); n:contact spans (900..1100, 300..450).
    const ON_SUSPECT: Point = Point::new(450.0, 350.0);
    const ON_CONTACT: Point = Point::new(950.0, 350.0);
    const EMPTY: Point = Point::new(50.0, 50.0);

    #[rstest]
    fn press_on_node_selects_and_starts_drag(board: Board) {
        let viewport = Viewport::default();
        let mut interaction = Interaction::new();

        let action = interaction.press(ON_SUSPECT, &board, &viewport);
        assert_eq!(action, PointerAction::Selected(nid("n:suspect")));
        assert_eq!(interaction.mode(), &Mode::NodeSelected(nid("n:suspect")));
        assert_eq!(
            interaction.gesture(),
            &Gesture::Dragging {
                node_id: nid("n:suspect"),
                grab: Point::new(50.0, 50.0),
                origin: Point::new(400.0, 300.0),
            }
        );
    }

    #[rstest]
    fn press_on_empty_canvas_clears_and_pans(board: Board) {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();
        interaction.press(ON_SUSPECT, &board, &viewport);
        interaction.release();

        assert_eq!(interaction.press(EMPTY, &board, &viewport), PointerAction::Cleared);
        assert_eq!(interaction.mode(), &Mode::Idle);

        assert_eq!(interaction.drag_to(Point::new(80.0, 30.0), &mut viewport), None);
        assert_eq!(viewport.pan(), Point::new(30.0, -20.0));
        assert_eq!(interaction.release(), None);
    }

    #[rstest]
    fn drag_follows_the_pointer_at_any_zoom(board: Board) {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        let mut interaction = Interaction::new();

        // Canvas (450, 350) at zoom 2 is screen (900, 700).
        interaction.press(Point::new(900.0, 700.0), &board, &viewport);
        let moved = interaction.drag_to(Point::new(1000.0, 800.0), &mut viewport);
        assert_eq!(moved, Some((nid("n:suspect"), Point::new(450.0, 350.0))));

        assert_eq!(
            interaction.release(),
            Some(DragEnd {
                node_id: nid("n:suspect"),
                origin: Point::new(400.0, 300.0),
            })
        );
        assert_eq!(interaction.gesture(), &Gesture::None);
    }

    #[rstest]
    fn connect_then_press_target_requests_connection(board: Board) {
        let viewport = Viewport::default();
        let mut interaction = Interaction::new();
        interaction.press(ON_SUSPECT, &board, &viewport);
        interaction.release();

        assert_eq!(interaction.begin_connect(), Ok(nid("n:suspect")));
        assert_eq!(interaction.pending_source(), Some(&nid("n:suspect")));

        let action = interaction.press(ON_CONTACT, &board, &viewport);
        assert_eq!(
            action,
            PointerAction::Connect {
                from: nid("n:suspect"),
                to: nid("n:contact"),
            }
        );
        assert_eq!(interaction.mode(), &Mode::NodeSelected(nid("n:contact")));
    }

    #[test]
    fn connect_requires_a_selection() {
        let mut interaction = Interaction::new();
        assert_eq!(interaction.begin_connect(), Err(ConnectError::NothingSelected));
    }

    #[test]
    fn second_connect_while_pending_is_rejected() {
        let mut interaction = Interaction::new();
        interaction.select(nid("n:a"));
        interaction.begin_connect().expect("first connect");

        assert_eq!(
            interaction.begin_connect(),
            Err(ConnectError::AlreadyConnecting { pending: nid("n:a") })
        );
        assert_eq!(interaction.pending_source(), Some(&nid("n:a")));
    }

    #[test]
    fn cancel_steps_back_one_level() {
        let mut interaction = Interaction::new();
        interaction.select(nid("n:a"));
        interaction.begin_connect().expect("connect");

        interaction.cancel();
        assert_eq!(interaction.mode(), &Mode::NodeSelected(nid("n:a")));
        interaction.cancel();
        assert_eq!(interaction.mode(), &Mode::Idle);
        interaction.cancel();
        assert_eq!(interaction.mode(), &Mode::Idle);
    }

    #[rstest]
    fn context_menu_opens_only_on_empty_canvas(board: Board) {
        let mut viewport = Viewport::default();
        viewport.set_zoom(0.5);
        viewport.pan_by(10.0, 20.0);
        let mut interaction = Interaction::new();

        assert!(!interaction.open_context_menu(Point::new(235.0, 195.0), &board, &viewport));
        assert!(interaction.context_menu().is_none());

        assert!(interaction.open_context_menu(Point::new(60.0, 70.0), &board, &viewport));
        let menu = interaction.context_menu().expect("menu");
        assert_eq!(menu.screen(), Point::new(60.0, 70.0));
        assert_eq!(menu.canvas(), Point::new(100.0, 100.0));

        interaction.cancel();
        assert!(interaction.context_menu().is_none());
    }

    #[test]
    fn forgetting_the_pending_source_returns_to_idle() {
        let mut interaction = Interaction::new();
        interaction.select(nid("n:a"));
        interaction.begin_connect().expect("connect");

        interaction.forget_node(&nid("n:b"));
        assert_eq!(interaction.pending_source(), Some(&nid("n:a")));
        interaction.forget_node(&nid("n:a"));
        assert_eq!(interaction.mode(), &Mode::Idle);
    }

    #[rstest]
    fn restored_snapshot_drops_vanished_selection(board: Board) {
        let mut interaction = Interaction::new();
        interaction.select(nid("n:gone"));
        interaction.snapshot_restored(&board);
        assert_eq!(interaction.mode(), &Mode::Idle);

        interaction.select(nid("n:office"));
        interaction.snapshot_restored(&board);
        assert_eq!(interaction.selected(), Some(&nid("n:office")));
    }

    #[rstest]
    fn restored_snapshot_abandons_a_node_drag(board: Board) {
        let mut viewport = Viewport::default();
        let mut interaction = Interaction::new();
        interaction.press(ON_SUSPECT, &board, &viewport);
        assert!(matches!(interaction.gesture(), Gesture::Dragging { .. }));

        interaction.snapshot_restored(&board);
        assert_eq!(interaction.gesture(), &Gesture::None);
        assert_eq!(interaction.selected(), Some(&nid("n:suspect")));
        assert_eq!(interaction.drag_to(ON_CONTACT, &mut viewport), None);
        assert_eq!(interaction.release(), None);
    }
}
