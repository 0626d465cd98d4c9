// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Board, ConnectionId, NodeId};

/// Lists one node's connections so they can be relabelled or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConnectionEditor {
    node_id: NodeId,
    rows: Vec<ConnectionRow>,
    focus: usize,
    /// Label being typed for the focused row.
    draft: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConnectionRow {
    pub(crate) connection_id: ConnectionId,
    /// Title of the node at the other end.
    pub(crate) other: String,
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConnectionOutcome {
    Browsing,
    SetLabel {
        connection_id: ConnectionId,
        label: Option<String>,
    },
    Remove(ConnectionId),
    Close,
}

impl ConnectionEditor {
    /// `None` when the node has no connections.
    pub(crate) fn open(board: &Board, node_id: &NodeId) -> Option<Self> {
        let mut editor = Self {
            node_id: node_id.clone(),
            rows: Vec::new(),
            focus: 0,
            draft: None,
        };
        editor.refresh(board).then_some(editor)
    }

    /// Re-reads the rows after the board changed. Returns `false` once nothing is left to show.
    pub(crate) fn refresh(&mut self, board: &Board) -> bool {
        self.rows = board
            .connections_of(&self.node_id)
            .map(|conn| {
                let other_id = if conn.from == self.node_id {
                    &conn.to
                } else {
                    &conn.from
                };
                let other = board
                    .node(other_id)
                    .map(|node| node.data.title.clone())
                    .filter(|title| !title.trim().is_empty())
                    .unwrap_or_else(|| other_id.to_string());
                ConnectionRow {
                    connection_id: conn.id.clone(),
                    other,
                    label: conn.label.clone(),
                }
            })
            .collect();
        self.focus = self.focus.min(self.rows.len().saturating_sub(1));
        self.draft = None;
        !self.rows.is_empty()
    }

    pub(crate) fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub(crate) fn rows(&self) -> &[ConnectionRow] {
        &self.rows
    }

    pub(crate) fn focus(&self) -> usize {
        self.focus
    }

    pub(crate) fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> ConnectionOutcome {
        if self.draft.is_some() {
            match key.code {
                KeyCode::Esc => self.draft = None,
                KeyCode::Enter => {
                    let label = self.draft.take().unwrap_or_default();
                    let label = label.trim();
                    if let Some(row) = self.rows.get(self.focus) {
                        return ConnectionOutcome::SetLabel {
                            connection_id: row.connection_id.clone(),
                            label: (!label.is_empty()).then(|| label.to_owned()),
                        };
                    }
                }
                KeyCode::Backspace => {
                    if let Some(draft) = self.draft.as_mut() {
                        draft.pop();
                    }
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Some(draft) = self.draft.as_mut() {
                        draft.push(ch);
                    }
                }
                _ => {}
            }
            return ConnectionOutcome::Browsing;
        }

        let len = self.rows.len().max(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ConnectionOutcome::Close,
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                self.focus = (self.focus + 1) % len;
            }
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.focus = (self.focus + len - 1) % len;
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                self.draft = self.rows.get(self.focus).map(|row| row.label.clone());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(row) = self.rows.get(self.focus) {
                    return ConnectionOutcome::Remove(row.connection_id.clone());
                }
            }
            _ => {}
        }
        ConnectionOutcome::Browsing
    }

    /// Appends pasted text to the label being typed, flattened to one line.
    pub(crate) fn paste(&mut self, text: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push_str(&text.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }
}
