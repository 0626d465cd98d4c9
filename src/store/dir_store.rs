// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{KeyValueStore, StoreError};

/// A key-value store with one `<key>.json` file per key inside `root`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    durability: WriteDurability,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Also syncs the written file and, on unix, its directory. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key_segment(key)))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for_key(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for_key(key);
        write_atomic(&self.root, &path, value.as_bytes(), self.durability)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for_key(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// Makes `key` usable as a file name on every platform. Keys that are already safe pass through
/// unchanged; anything else is hex-encoded behind a `~` marker.
fn encode_key_segment(key: &str) -> String {
    if !needs_encoding(key) {
        return key.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + key.len().saturating_mul(2));
    out.push('~');
    for &b in key.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn needs_encoding(key: &str) -> bool {
    if key.is_empty() || key.starts_with('~') || key.starts_with('.') {
        return true;
    }
    if key.ends_with(' ') || key.ends_with('.') {
        return true;
    }

    let base = key.split('.').next().unwrap_or(key);
    if is_windows_device_name(base) {
        return true;
    }

    key.chars().any(|ch| {
        matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || ch.is_control()
    })
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => base
            .strip_prefix("COM")
            .or_else(|| base.strip_prefix("LPT"))
            .is_some_and(|num| matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = root.join(format!(
        ".caseboard.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    if let Err(source) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(root).map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: root.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{encode_key_segment, DirStore, WriteDurability};
    use crate::store::{KeyValueStore, StoreError};

    #[fixture]
    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[rstest]
    #[case("caseboard-state", "caseboard-state")]
    #[case("a/b", "~612f62")]
    #[case("CON", "~434f4e")]
    #[case("~x", "~7e78")]
    #[case("", "~")]
    fn keys_are_encoded_into_safe_file_names(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(encode_key_segment(key), expected);
    }

    #[rstest]
    #[case(WriteDurability::BestEffort)]
    #[case(WriteDurability::Durable)]
    fn set_then_get_round_trips(tmp: TempDir, #[case] durability: WriteDurability) {
        let mut store = DirStore::new(tmp.path().join("nested")).with_durability(durability);
        assert_eq!(store.get("caseboard-state").expect("get"), None);

        store.set("caseboard-state", "{\"nodes\":[]}").expect("set");
        store.set("caseboard-state", "{\"nodes\":[],\"connections\":[]}").expect("overwrite");

        assert_eq!(
            store.get("caseboard-state").expect("get").as_deref(),
            Some("{\"nodes\":[],\"connections\":[]}")
        );
        assert!(store.path_for_key("caseboard-state").is_file());
    }

    #[rstest]
    fn writes_leave_no_temp_files_behind(tmp: TempDir) {
        let mut store = DirStore::new(tmp.path());
        store.set("k", "v").expect("set");

        let names = std::fs::read_dir(tmp.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["k.json".to_owned()]);
    }

    #[rstest]
    fn remove_deletes_and_tolerates_missing_keys(tmp: TempDir) {
        let mut store = DirStore::new(tmp.path());
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
        store.remove("k").expect("remove missing");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[cfg(unix)]
    #[rstest]
    fn writing_through_a_symlink_is_refused(tmp: TempDir) {
        let target = tmp.path().join("elsewhere.json");
        std::fs::write(&target, "{}").expect("write target");
        let mut store = DirStore::new(tmp.path().join("store"));
        std::fs::create_dir_all(store.root()).expect("mkdir");
        std::os::unix::fs::symlink(&target, store.path_for_key("k")).expect("symlink");

        let err = store.set("k", "v").expect_err("symlink refused");
        assert!(matches!(err, StoreError::SymlinkRefused { .. }));
        assert_eq!(std::fs::read_to_string(&target).expect("read"), "{}");
    }
}
