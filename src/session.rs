// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The live board session.
//!
//! Owns the board, its history and the persistence handle. Every committed change is applied as a
//! [`BoardOp`], recorded as one history snapshot and saved.

use tracing::{debug, error, info};

use crate::config::BoardConfig;
use crate::history::History;
use crate::model::{Board, CanvasBounds, ConnectionId, Node, NodeData, NodeId, NodeKind, Point};
use crate::ops::{apply_op, ApplyError, ApplyResult, BoardOp, NodePatch, Unchanged};
use crate::store::{load_board, save_board, KeyValueStore, LoadStatus, StoreError};

pub struct BoardSession {
    board: Board,
    history: History,
    config: BoardConfig,
    store: Option<Box<dyn KeyValueStore>>,
    save_error: Option<StoreError>,
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("nodes", &self.board.nodes().len())
            .field("connections", &self.board.connections().len())
            .field("history_len", &self.history.len())
            .field("history_cursor", &self.history.cursor())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl BoardSession {
    /// A session over `board` that is never saved.
    pub fn in_memory(config: BoardConfig, board: Board) -> Self {
        Self::with_board(config, board, None)
    }

    fn with_board(
        config: BoardConfig,
        board: Board,
        store: Option<Box<dyn KeyValueStore>>,
    ) -> Self {
        Self {
            history: History::new(board.clone()),
            board,
            config,
            store,
            save_error: None,
        }
    }

    /// Loads the board stored under the configured key. Malformed state starts an empty board.
    pub fn open(
        config: BoardConfig,
        store: Box<dyn KeyValueStore>,
    ) -> Result<(Self, LoadStatus), StoreError> {
        let loaded = load_board(&*store, &config.storage.key)?;
        Ok((Self::with_board(config, loaded.board, Some(store)), loaded.status))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.config.bounds()
    }

    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        self.store.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The most recent failed save, if any. Taking it clears it.
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }

    /// Adds a blank node of `kind` with its top-left corner at `at`.
    pub fn add_node(&mut self, kind: NodeKind, at: Point) -> Result<NodeId, ApplyError> {
        let node = Node::blank(NodeId::generate(), kind, at, self.config.node_size(kind));
        self.add_prepared(node)
    }

    /// Adds an image node showing `image_url` (typically a data URL).
    pub fn add_image_node(
        &mut self,
        title: impl Into<String>,
        image_url: impl Into<String>,
        at: Point,
    ) -> Result<NodeId, ApplyError> {
        let mut data = NodeData::titled(title);
        data.image_url = Some(image_url.into());
        let node = Node::new(
            NodeId::generate(),
            NodeKind::Image,
            at,
            self.config.node_size(NodeKind::Image),
            data,
        );
        self.add_prepared(node)
    }

    fn add_prepared(&mut self, node: Node) -> Result<NodeId, ApplyError> {
        let node_id = node.id.clone();
        let kind = node.kind;
        self.commit(&BoardOp::AddNode { node })?;
        info!(node_id = %node_id, %kind, "node added");
        Ok(node_id)
    }

    /// Merges `patch` into the node. Returns whether anything changed.
    pub fn update_node(&mut self, node_id: &NodeId, patch: NodePatch) -> Result<bool, ApplyError> {
        let result = self.commit(&BoardOp::UpdateNode {
            node_id: node_id.clone(),
            patch,
        })?;
        Ok(result.changed())
    }

    /// Moves a node while a drag is in flight. Neither recorded nor saved until
    /// [`Self::finish_drag`].
    pub fn drag_node(&mut self, node_id: &NodeId, position: Point) -> Result<(), ApplyError> {
        apply_op(
            &mut self.board,
            &BoardOp::UpdateNode {
                node_id: node_id.clone(),
                patch: NodePatch::position(position),
            },
            &self.config.bounds(),
        )?;
        Ok(())
    }

    /// Ends a drag that started with the node at `origin`. Records one snapshot if it moved.
    pub fn finish_drag(&mut self, node_id: &NodeId, origin: Point) -> bool {
        let Some(node) = self.board.node(node_id) else {
            return false;
        };
        if node.position() == origin {
            return false;
        }
        debug!(node_id = %node_id, x = node.x, y = node.y, "drag finished");
        self.record_and_save();
        true
    }

    /// Deletes the node and every connection touching it.
    pub fn delete_node(&mut self, node_id: &NodeId) -> Result<(), ApplyError> {
        self.commit(&BoardOp::RemoveNode {
            node_id: node_id.clone(),
        })?;
        info!(node_id = %node_id, "node deleted");
        Ok(())
    }

    /// Connects `from` and `to`. Returns `None` when the pair is a self connection or already
    /// connected; those requests leave the board alone.
    pub fn connect(
        &mut self,
        from: &NodeId,
        to: &NodeId,
    ) -> Result<Option<ConnectionId>, ApplyError> {
        let connection_id = ConnectionId::generate();
        let result = self.commit(&BoardOp::AddConnection {
            connection_id: connection_id.clone(),
            from: from.clone(),
            to: to.clone(),
            label: None,
        })?;

        match result.skipped.first() {
            Some(Unchanged::SelfConnection { node_id }) => {
                debug!(node_id = %node_id, "ignored self connection");
                Ok(None)
            }
            Some(Unchanged::DuplicateConnection { existing }) => {
                debug!(
                    from = %from,
                    to = %to,
                    existing = %existing,
                    "ignored duplicate connection"
                );
                Ok(None)
            }
            _ => {
                info!(connection_id = %connection_id, from = %from, to = %to, "connection added");
                Ok(Some(connection_id))
            }
        }
    }

    pub fn set_connection_label(
        &mut self,
        connection_id: &ConnectionId,
        label: Option<String>,
    ) -> Result<bool, ApplyError> {
        let label = label.filter(|label| !label.is_empty());
        let result = self.commit(&BoardOp::SetConnectionLabel {
            connection_id: connection_id.clone(),
            label,
        })?;
        Ok(result.changed())
    }

    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Result<(), ApplyError> {
        self.commit(&BoardOp::RemoveConnection {
            connection_id: connection_id.clone(),
        })?;
        Ok(())
    }

    /// Restores the previous snapshot. Returns `false` at the start of history.
    pub fn undo(&mut self) -> bool {
        let Some(board) = self.history.undo() else {
            return false;
        };
        self.board = board.clone();
        self.save();
        true
    }

    /// Restores the next snapshot. Returns `false` at the end of history.
    pub fn redo(&mut self) -> bool {
        let Some(board) = self.history.redo() else {
            return false;
        };
        self.board = board.clone();
        self.save();
        true
    }

    /// Replaces the whole board as one undoable step.
    pub fn replace_board(&mut self, board: Board) {
        if board == self.board {
            return;
        }
        self.board = board;
        self.record_and_save();
    }

    fn commit(&mut self, op: &BoardOp) -> Result<ApplyResult, ApplyError> {
        let result = apply_op(&mut self.board, op, &self.config.bounds())?;
        if result.changed() {
            self.record_and_save();
        }
        Ok(result)
    }

    fn record_and_save(&mut self) {
        self.history.record(&self.board);
        self.save();
    }

    fn save(&mut self) {
        let Some(store) = self.store.as_deref_mut() else {
            return;
        };
        if let Err(err) = save_board(store, &self.config.storage.key, &self.board) {
            error!(error = %err, "failed to save board");
            self.save_error = Some(err);
        }
    }
}
