// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Node/connection mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
///
/// Returns `Some(reason)` when the op was accepted but left the board as it was.
fn apply_board_op(
    board: &mut Board,
    op: &BoardOp,
    bounds: &CanvasBounds,
    delta: &mut DeltaBuilder,
) -> Result<Option<Unchanged>, ApplyError> {
    match op {
        BoardOp::AddNode { node } => {
            if !bounds.contains(node.position()) {
                return Err(ApplyError::OutOfBounds { x: node.x, y: node.y, bounds: *bounds });
            }
            validate_size(node.width, node.height)?;
            if board.contains_node(&node.id) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Node,
                    id: node.id.to_string(),
                });
            }
            board.nodes_mut().push(node.clone());
            delta.record_added(ObjectRef::Node(node.id.clone()));
            Ok(None)
        }
        BoardOp::UpdateNode { node_id, patch } => {
            let Some(existing) = board.node_mut(node_id) else {
                return Err(node_not_found(node_id));
            };

            let mut updated = existing.clone();
            if let Some(x) = patch.x {
                updated.x = x;
            }
            if let Some(y) = patch.y {
                updated.y = y;
            }
            if let Some(width) = patch.width {
                updated.width = width;
            }
            if let Some(height) = patch.height {
                updated.height = height;
            }
            patch.data.merge_into(&mut updated.data);

            if !updated.position().is_finite() {
                return Err(ApplyError::NonFinitePosition { x: updated.x, y: updated.y });
            }
            validate_size(updated.width, updated.height)?;

            if &updated == existing {
                return Ok(Some(Unchanged::NoChange { object: ObjectRef::Node(node_id.clone()) }));
            }
            *existing = updated;
            delta.record_updated(ObjectRef::Node(node_id.clone()));
            Ok(None)
        }
        BoardOp::RemoveNode { node_id } => {
            let before_len = board.nodes().len();
            board.nodes_mut().retain(|node| &node.id != node_id);
            if board.nodes().len() == before_len {
                return Err(node_not_found(node_id));
            }

            let removed_connection_ids = board
                .connections_of(node_id)
                .map(|conn| conn.id.clone())
                .collect::<Vec<_>>();
            board.connections_mut().retain(|conn| !conn.touches(node_id));
            for connection_id in removed_connection_ids {
                delta.record_removed(ObjectRef::Connection(connection_id));
            }
            delta.record_removed(ObjectRef::Node(node_id.clone()));
            Ok(None)
        }
        BoardOp::AddConnection { connection_id, from, to, label } => {
            if from == to {
                return Ok(Some(Unchanged::SelfConnection { node_id: from.clone() }));
            }
            if !board.contains_node(from) {
                return Err(node_not_found(from));
            }
            if !board.contains_node(to) {
                return Err(node_not_found(to));
            }
            if let Some(existing) = board.find_connection(from, to) {
                return Ok(Some(Unchanged::DuplicateConnection { existing: existing.id.clone() }));
            }
            if board.connection(connection_id).is_some() {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Connection,
                    id: connection_id.to_string(),
                });
            }

            let connection = Connection::new(connection_id.clone(), from.clone(), to.clone())
                .with_label(label.clone().unwrap_or_default());
            board.connections_mut().push(connection);
            delta.record_added(ObjectRef::Connection(connection_id.clone()));
            Ok(None)
        }
        BoardOp::SetConnectionLabel { connection_id, label } => {
            let Some(existing) =
                board.connections_mut().iter_mut().find(|conn| &conn.id == connection_id)
            else {
                return Err(connection_not_found(connection_id));
            };

            let label = label.clone().unwrap_or_default();
            if existing.label == label {
                return Ok(Some(Unchanged::NoChange {
                    object: ObjectRef::Connection(connection_id.clone()),
                }));
            }
            existing.label = label;
            delta.record_updated(ObjectRef::Connection(connection_id.clone()));
            Ok(None)
        }
        BoardOp::RemoveConnection { connection_id } => {
            let before_len = board.connections().len();
            board.connections_mut().retain(|conn| &conn.id != connection_id);
            if board.connections().len() == before_len {
                return Err(connection_not_found(connection_id));
            }
            delta.record_removed(ObjectRef::Connection(connection_id.clone()));
            Ok(None)
        }
    }
}

fn validate_size(width: f64, height: f64) -> Result<(), ApplyError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ApplyError::InvalidSize { width, height })
    }
}

fn node_not_found(node_id: &NodeId) -> ApplyError {
    ApplyError::NotFound { kind: ObjectKind::Node, id: node_id.to_string() }
}

fn connection_not_found(connection_id: &ConnectionId) -> ApplyError {
    ApplyError::NotFound { kind: ObjectKind::Connection, id: connection_id.to_string() }
}
