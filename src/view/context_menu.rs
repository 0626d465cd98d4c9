// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NodeKind, Point};

/// "Add node" menu opened by a right-click on empty canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    screen: Point,
    canvas: Point,
    selected: usize,
}

impl ContextMenu {
    pub fn new(screen: Point, canvas: Point) -> Self {
        Self {
            screen,
            canvas,
            selected: 0,
        }
    }

    /// Where the menu was opened, in screen units.
    pub fn screen(&self) -> Point {
        self.screen
    }

    /// Where a chosen node is placed, in canvas units.
    pub fn canvas(&self) -> Point {
        self.canvas
    }

    pub fn items(&self) -> &'static [NodeKind] {
        &NodeKind::ALL
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_kind(&self) -> NodeKind {
        NodeKind::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % NodeKind::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(NodeKind::ALL.len() - 1);
    }

    /// Selects the item at `index`; returns its kind if the index is valid.
    pub fn select(&mut self, index: usize) -> Option<NodeKind> {
        let kind = NodeKind::ALL.get(index).copied()?;
        self.selected = index;
        Some(kind)
    }
}
