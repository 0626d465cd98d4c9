// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{DataField, Node, NodeId, NodeKind};
use crate::ops::NodeDataPatch;

/// Field-by-field editor for one node's title and kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeEditor {
    node_id: NodeId,
    kind: NodeKind,
    fields: Vec<EditorField>,
    focus: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditorField {
    pub(crate) field: DataField,
    pub(crate) original: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditorOutcome {
    Editing,
    Commit(NodeDataPatch),
    Cancel,
}

impl NodeEditor {
    pub(crate) fn open(node: &Node) -> Self {
        let fields = std::iter::once(DataField::Title)
            .chain(node.kind.fields().iter().copied())
            .filter_map(|field| {
                let original = node.data.get(field).unwrap_or_default().to_owned();
                // Embedded images are replaced by dropping a new file, not by typing.
                if field == DataField::ImageUrl && original.starts_with("data:") {
                    return None;
                }
                Some(EditorField {
                    field,
                    value: original.clone(),
                    original,
                })
            })
            .collect();

        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            fields,
            focus: 0,
        }
    }

    pub(crate) fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn fields(&self) -> &[EditorField] {
        &self.fields
    }

    pub(crate) fn focus(&self) -> usize {
        self.focus
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> EditorOutcome {
        match key.code {
            KeyCode::Esc => return EditorOutcome::Cancel,
            KeyCode::Enter => return EditorOutcome::Commit(self.patch()),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len().max(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = self.fields.len().max(1);
                self.focus = (self.focus + len - 1) % len;
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(ch);
                }
            }
            _ => {}
        }
        EditorOutcome::Editing
    }

    /// Appends pasted text to the focused field, flattened to one line.
    pub(crate) fn paste(&mut self, text: &str) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field
                .value
                .push_str(&text.split_whitespace().collect::<Vec<_>>().join(" "));
        }
    }

    /// Only the fields whose value differs from what the node had when the editor opened.
    pub(crate) fn patch(&self) -> NodeDataPatch {
        self.fields
            .iter()
            .filter(|field| field.value != field.original)
            .fold(NodeDataPatch::default(), |patch, field| {
                patch.with(field.field, field.value.clone())
            })
    }
}
