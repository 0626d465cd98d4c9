// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Image files dropped onto the board.
//!
//! Terminals deliver a drag-and-drop as a bracketed paste of the file path. The path is checked by
//! extension, then the file is read on a worker thread and handed back as a `data:` URL.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use url::Url;

use crate::model::{NodeId, Point};

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("not an image file: {path}")]
    NotAnImage { path: PathBuf },
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start image loader: {0}")]
    Spawn(#[source] io::Error),
}

/// Where a loaded image ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTarget {
    /// A new image node with its top-left corner at this canvas position.
    NewNode(Point),
    /// An existing image node that has no picture yet.
    Node(NodeId),
}

/// An image file read to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// File name without directories.
    pub title: String,
    pub data_url: String,
    /// Captured when the request was made.
    pub target: ImageTarget,
}

/// Returns the `image/*` MIME type guessed from the file extension.
pub fn image_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .iter()
        .find(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_owned())
}

pub fn is_image_path(path: &Path) -> bool {
    image_mime(path).is_some()
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Extracts a single file path from pasted text.
///
/// Accepts `file:` URLs, plain paths, quoted paths and backslash-escaped spaces. Multi-line or
/// blank pastes are not paths.
pub fn parse_dropped_path(pasted: &str) -> Option<PathBuf> {
    let text = pasted.trim();
    if text.is_empty() || text.contains(['\n', '\r']) {
        return None;
    }

    let unquoted = ['\'', '"']
        .iter()
        .find_map(|quote| {
            text.strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(text);
    if unquoted.starts_with("file:") {
        return Url::parse(unquoted).ok()?.to_file_path().ok();
    }

    let mut out = String::with_capacity(unquoted.len());
    let mut chars = unquoted.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next @ (' ' | '\'' | '"' | '\\' | '(' | ')' | '&')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }

    (!out.is_empty()).then(|| PathBuf::from(out))
}

/// Reads an image file and encodes it as a `data:` URL.
pub fn load_image(path: &Path, target: ImageTarget) -> Result<LoadedImage, ImageLoadError> {
    let mime = image_mime(path).ok_or_else(|| ImageLoadError::NotAnImage {
        path: path.to_path_buf(),
    })?;
    let bytes = fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(LoadedImage {
        path: path.to_path_buf(),
        title,
        data_url: data_url(&mime, &bytes),
        target,
    })
}

/// Reads dropped images off the UI thread.
///
/// Every request gets its own worker. Results arrive in completion order and are collected with
/// [`ImageLoader::drain`].
#[derive(Debug)]
pub struct ImageLoader {
    sender: Sender<Result<LoadedImage, ImageLoadError>>,
    receiver: Receiver<Result<LoadedImage, ImageLoadError>>,
    pending: usize,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Starts loading `path`. Non-image paths are rejected immediately without spawning work.
    pub fn request(&mut self, path: PathBuf, target: ImageTarget) -> Result<(), ImageLoadError> {
        if !is_image_path(&path) {
            return Err(ImageLoadError::NotAnImage { path });
        }

        let sender = self.sender.clone();
        thread::Builder::new()
            .name("caseboard-image".to_owned())
            .spawn(move || {
                let result = load_image(&path, target);
                // The receiver is gone only when the app is shutting down.
                let _ = sender.send(result);
            })
            .map_err(ImageLoadError::Spawn)?;
        self.pending += 1;
        tracing::debug!(pending = self.pending, "image load started");
        Ok(())
    }

    /// Number of requests whose result has not been drained yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Collects every finished load without blocking.
    pub fn drain(&mut self) -> Vec<Result<LoadedImage, ImageLoadError>> {
        let done = self.receiver.try_iter().collect::<Vec<_>>();
        self.pending = self.pending.saturating_sub(done.len());
        done
    }

    /// Blocks until one load finishes. Returns `None` when nothing is pending.
    pub fn wait_one(&mut self) -> Option<Result<LoadedImage, ImageLoadError>> {
        if self.pending == 0 {
            return None;
        }
        let result = self.receiver.recv().ok()?;
        self.pending -= 1;
        Some(result)
    }
}
