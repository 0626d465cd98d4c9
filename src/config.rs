// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Board configuration, read from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields the stock 4000x3000 board.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{CanvasBounds, NodeKind, Size, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::store::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub canvas: CanvasConfig,
    pub zoom: ZoomConfig,
    pub nodes: NodeConfig,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    /// Factor applied per wheel-up step.
    pub step_in: f64,
    /// Factor applied per wheel-down step.
    pub step_out: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.25,
            max: 2.0,
            step_in: 1.1,
            step_out: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub width: f64,
    pub height: f64,
    pub image_width: f64,
    pub image_height: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 150.0,
            image_width: 200.0,
            image_height: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// Terminal projection. Screen units are what pan offsets are measured in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Screen units per terminal column.
    pub cell_width: f64,
    /// Screen units per terminal row.
    pub cell_height: f64,
    pub minimap_width: f64,
    pub minimap_height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_height: 20.0,
            minimap_width: 200.0,
            minimap_height: 150.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl BoardConfig {
    /// Loads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("zoom.min", self.zoom.min)?;
        positive("zoom.step_in", self.zoom.step_in)?;
        positive("zoom.step_out", self.zoom.step_out)?;
        if !(self.zoom.max.is_finite() && self.zoom.min <= self.zoom.max) {
            return Err(ConfigError::Invalid {
                field: "zoom.max",
                reason: "must be finite and at least zoom.min",
            });
        }
        positive("nodes.width", self.nodes.width)?;
        positive("nodes.height", self.nodes.height)?;
        positive("nodes.image_width", self.nodes.image_width)?;
        positive("nodes.image_height", self.nodes.image_height)?;
        positive("display.cell_width", self.display.cell_width)?;
        positive("display.cell_height", self.display.cell_height)?;
        positive("display.minimap_width", self.display.minimap_width)?;
        positive("display.minimap_height", self.display.minimap_height)?;
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage.key",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds {
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }

    /// Size of a node created from the context menu or an image drop.
    pub fn node_size(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Image => Size::new(self.nodes.image_width, self.nodes.image_height),
            _ => Size::new(self.nodes.width, self.nodes.height),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive number",
        })
    }
}
