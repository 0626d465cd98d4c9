// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persisted board record: `{"nodes": [...], "connections": [...]}` under a single key.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::{KeyValueStore, StoreError};
use crate::model::{Board, NodeId};

pub const DEFAULT_STORAGE_KEY: &str = "caseboard-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing stored under the key yet.
    Missing,
    Loaded,
    /// The stored value did not parse; the board starts empty.
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBoard {
    pub board: Board,
    pub status: LoadStatus,
    /// Nodes and connections dropped while repairing an otherwise valid record.
    pub dropped: usize,
}

pub fn save_board(
    store: &mut dyn KeyValueStore,
    key: &str,
    board: &Board,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(board).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &json)?;
    debug!(
        key,
        nodes = board.nodes().len(),
        connections = board.connections().len(),
        "board saved"
    );
    Ok(())
}

/// Reads the board stored under `key`.
///
/// A malformed record yields an empty board with [`LoadStatus::Malformed`]; only store I/O
/// failures are errors.
pub fn load_board(store: &dyn KeyValueStore, key: &str) -> Result<LoadedBoard, StoreError> {
    let Some(raw) = store.get(key)? else {
        info!(key, "no stored board; starting empty");
        return Ok(LoadedBoard {
            board: Board::new(),
            status: LoadStatus::Missing,
            dropped: 0,
        });
    };

    let board = match serde_json::from_str::<Board>(&raw) {
        Ok(board) => board,
        Err(err) => {
            warn!(key, error = %err, "stored board is malformed; starting empty");
            return Ok(LoadedBoard {
                board: Board::new(),
                status: LoadStatus::Malformed,
                dropped: 0,
            });
        }
    };

    let (board, dropped) = sanitize(board);
    if dropped > 0 {
        warn!(key, dropped, "dropped invalid entries from stored board");
    }
    info!(
        key,
        nodes = board.nodes().len(),
        connections = board.connections().len(),
        "board loaded"
    );
    Ok(LoadedBoard {
        board,
        status: LoadStatus::Loaded,
        dropped,
    })
}

/// Drops repeated node ids, then every connection that dangles, loops, repeats an undirected pair
/// or reuses an id.
fn sanitize(board: Board) -> (Board, usize) {
    let mut nodes = Vec::with_capacity(board.nodes().len());
    let mut node_ids = BTreeSet::<NodeId>::new();
    let mut dropped = 0usize;

    for node in board.nodes() {
        if node_ids.insert(node.id.clone()) {
            nodes.push(node.clone());
        } else {
            debug!(node_id = %node.id, "dropping repeated node id");
            dropped += 1;
        }
    }

    let mut connections = Vec::with_capacity(board.connections().len());
    let mut pairs = BTreeSet::<(NodeId, NodeId)>::new();
    let mut connection_ids = BTreeSet::new();

    for conn in board.connections() {
        let dangling = !node_ids.contains(&conn.from) || !node_ids.contains(&conn.to);
        let pair = if conn.from <= conn.to {
            (conn.from.clone(), conn.to.clone())
        } else {
            (conn.to.clone(), conn.from.clone())
        };

        if dangling
            || conn.is_self_loop()
            || pairs.contains(&pair)
            || connection_ids.contains(&conn.id)
        {
            debug!(connection_id = %conn.id, dangling, "dropping invalid connection");
            dropped += 1;
            continue;
        }

        pairs.insert(pair);
        connection_ids.insert(conn.id.clone());
        connections.push(conn.clone());
    }

    (Board::from_parts(nodes, connections), dropped)
}
