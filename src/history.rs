// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo history of full board snapshots.

use crate::model::Board;

/// Truncate-on-branch snapshot list.
///
/// The entry at `cursor` always equals the live board. Index 0 is the baseline the session
/// started from, so `N` recorded actions yield `N + 1` entries.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Board>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Board) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Captures `board` as the newest entry, discarding any redo tail.
    pub fn record(&mut self, board: &Board) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(board.clone());
        self.cursor = self.snapshots.len() - 1;
    }

    /// Steps back one entry and returns the board to restore.
    pub fn undo(&mut self) -> Option<&Board> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Steps forward one entry and returns the board to restore.
    pub fn redo(&mut self) -> Option<&Board> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Board {
        &self.snapshots[self.cursor]
    }
}
