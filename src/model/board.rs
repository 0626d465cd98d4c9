// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::geometry::Point;
use super::ids::{ConnectionId, NodeId};
use super::node::Node;

/// Board content: every node and every connection.
///
/// Vector order is render order; later nodes draw on top and win hit tests. This is also the
/// persisted record shape (`{"nodes": [...], "connections": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut Vec<Connection> {
        &mut self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == node_id)
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|conn| &conn.id == connection_id)
    }

    /// Finds the connection between `a` and `b` in either direction.
    pub fn find_connection(&self, a: &NodeId, b: &NodeId) -> Option<&Connection> {
        self.connections.iter().find(|conn| conn.joins(a, b))
    }

    pub fn connections_of<'a>(
        &'a self,
        node_id: &'a NodeId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |conn| conn.touches(node_id))
    }

    /// The topmost node containing `point` (canvas units).
    pub fn node_at(&self, point: Point) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| node.contains(point))
    }
}
