// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A board holds typed node cards and the undirected connections between them.

pub mod board;
pub mod connection;
pub mod fixtures;
pub mod geometry;
pub mod ids;
pub mod node;

pub use board::Board;
pub use connection::Connection;
pub use geometry::{CanvasBounds, Point, Size, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
pub use ids::{ConnectionId, Id, IdError, IdPrefix, NodeId};
pub use node::{DataField, Node, NodeData, NodeKind, ParseNodeKindError};
