// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{ConnectionId, NodeId};

/// An undirected, optionally labeled edge between two nodes.
///
/// `from`/`to` keep the order the user picked them in, but two connections with swapped endpoints
/// describe the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub label: String,
}

impl Connection {
    pub fn new(id: ConnectionId, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            from,
            to,
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Empty labels are stored as `""` but read as "no label".
    pub fn label(&self) -> Option<&str> {
        if self.label.is_empty() {
            None
        } else {
            Some(&self.label)
        }
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.from == node_id || &self.to == node_id
    }

    pub fn joins(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::Connection;
    use crate::model::{ConnectionId, NodeId};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn joins_ignores_direction() {
        let conn = Connection::new(ConnectionId::new("c1").expect("id"), nid("a"), nid("b"));
        assert!(conn.joins(&nid("a"), &nid("b")));
        assert!(conn.joins(&nid("b"), &nid("a")));
        assert!(!conn.joins(&nid("a"), &nid("c")));
    }

    #[test]
    fn empty_label_reads_as_none() {
        let conn = Connection::new(ConnectionId::new("c1").expect("id"), nid("a"), nid("b"));
        assert_eq!(conn.label(), None);
        assert_eq!(conn.clone().with_label("knows").label(), Some("knows"));

        let json = serde_json::to_value(&conn).expect("serialize");
        assert_eq!(json["label"], "");
    }
}
