// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for boards.
//!
//! Ops are applied atomically (all or nothing) and produce a minimal delta that the UI can use to
//! decide whether a history snapshot and a save are due.

use std::collections::HashSet;
use std::fmt;

use crate::model::{
    Board, CanvasBounds, Connection, ConnectionId, DataField, Node, NodeData, NodeId, Point,
};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardOp {
    AddNode {
        node: Node,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodePatch,
    },
    RemoveNode {
        node_id: NodeId,
    },
    AddConnection {
        connection_id: ConnectionId,
        from: NodeId,
        to: NodeId,
        label: Option<String>,
    },
    SetConnectionLabel {
        connection_id: ConnectionId,
        label: Option<String>,
    },
    RemoveConnection {
        connection_id: ConnectionId,
    },
}

/// Partial update for a node. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub data: NodeDataPatch,
}

impl NodePatch {
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    pub fn data(data: NodeDataPatch) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.data.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDataPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub aliases: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl NodeDataPatch {
    pub fn with(mut self, field: DataField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            DataField::Title => self.title = value,
            DataField::Content => self.content = value,
            DataField::Url => self.url = value,
            DataField::ImageUrl => self.image_url = value,
            DataField::Aliases => self.aliases = value,
            DataField::Description => self.description = value,
            DataField::Location => self.location = value,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn merge_into(&self, data: &mut NodeData) {
        if let Some(title) = &self.title {
            data.title = title.clone();
        }
        merge_field(&mut data.content, &self.content);
        merge_field(&mut data.url, &self.url);
        merge_field(&mut data.image_url, &self.image_url);
        merge_field(&mut data.aliases, &self.aliases);
        merge_field(&mut data.description, &self.description);
        merge_field(&mut data.location, &self.location);
    }
}

fn merge_field(target: &mut Option<String>, patch: &Option<String>) {
    if let Some(value) = patch {
        *target = Some(value.clone());
    }
}

/// A board object addressed by a delta.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Connection(ConnectionId),
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node_id) => write!(f, "node:{node_id}"),
            Self::Connection(connection_id) => write!(f, "connection:{connection_id}"),
        }
    }
}

/// Minimal delta describing which objects changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ObjectRef>,
    removed: HashSet<ObjectRef>,
    updated: HashSet<ObjectRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        self.removed.remove(&object_ref);
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_removed(&mut self, object_ref: ObjectRef) {
        // Added and removed within one batch cancels out.
        if self.added.remove(&object_ref) {
            self.updated.remove(&object_ref);
            return;
        }
        self.updated.remove(&object_ref);
        self.removed.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta { added, removed, updated }
    }
}

/// Why an op was accepted without touching the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unchanged {
    SelfConnection { node_id: NodeId },
    DuplicateConnection { existing: ConnectionId },
    NoChange { object: ObjectRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub skipped: Vec<Unchanged>,
    pub delta: Delta,
}

impl ApplyResult {
    pub fn changed(&self) -> bool {
        !self.delta.is_empty()
    }
}

/// Applies a single op. See [`apply_ops`].
pub fn apply_op(
    board: &mut Board,
    op: &BoardOp,
    bounds: &CanvasBounds,
) -> Result<ApplyResult, ApplyError> {
    apply_ops(board, std::slice::from_ref(op), bounds)
}

/// Applies `ops` in order. Either every op succeeds and the board is updated, or the first error
/// is returned and the board is left untouched.
pub fn apply_ops(
    board: &mut Board,
    ops: &[BoardOp],
    bounds: &CanvasBounds,
) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult { applied: 0, skipped: Vec::new(), delta: Delta::default() });
    }

    let mut next = board.clone();
    let mut delta = DeltaBuilder::default();
    let mut applied = 0usize;
    let mut skipped = Vec::new();

    for op in ops {
        match apply_board_op(&mut next, op, bounds, &mut delta)? {
            Some(reason) => skipped.push(reason),
            None => applied += 1,
        }
    }

    *board = next;
    Ok(ApplyResult { applied, skipped, delta: delta.finish() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Node,
    Connection,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    #[error("position ({x}, {y}) is outside the {}x{} canvas", bounds.width, bounds.height)]
    OutOfBounds { x: f64, y: f64, bounds: CanvasBounds },
    #[error("position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },
    #[error("invalid node size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("object already exists ({kind:?}, id={id})")]
    AlreadyExists { kind: ObjectKind, id: String },
    #[error("object not found ({kind:?}, id={id})")]
    NotFound { kind: ObjectKind, id: String },
}

impl ApplyError {
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

// Extracted per-op implementation for node/connection mutations.
include!("ops_impl.rs");
