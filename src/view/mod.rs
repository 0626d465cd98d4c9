// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! View state: the pan/zoom transform and the interaction state machine.
//!
//! Nothing here is persisted; a fresh session starts at zoom 1 with no pan.

pub mod context_menu;
pub mod interaction;
pub mod viewport;

pub use context_menu::ContextMenu;
pub use interaction::{ConnectError, DragEnd, Gesture, Interaction, Mode, PointerAction};
pub use viewport::{CellMetrics, Viewport, WheelDirection, ZoomLimits};
