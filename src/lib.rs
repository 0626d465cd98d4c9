// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caseboard: a terminal investigation board.
//!
//! Cards (notes, links, images, people, locations) live on a bounded canvas and are tied together
//! with labeled connections. Every change is a snapshot in an undo history and is persisted to a
//! key-value store.

pub mod config;
pub mod history;
pub mod logging;
pub mod media;
pub mod model;
pub mod ops;
pub mod render;
pub mod session;
pub mod store;
pub mod tui;
pub mod view;
