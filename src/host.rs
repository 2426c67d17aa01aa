// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host capability traits
//!
//! The loader never touches real storage or executes source text itself;
//! callers inject a [`FileSystem`] and a [`ScriptEvaluator`] at
//! construction. Two stock filesystems are provided: an in-memory one for
//! tests and embedders, and a thin `std::fs` adapter.

use crate::error::Result;
use crate::module_system::ModuleScope;
use std::collections::BTreeMap;

/// File-existence and file-read primitives
///
/// Paths are canonical `/`-joined strings as produced by the resolver.
/// `read_file` returning `None` means "does not exist".
pub trait FileSystem {
    /// Check whether `path` names an existing file
    fn exists_file(&self, path: &str) -> bool;

    /// Read the contents of `path`, or `None` if it does not exist
    fn read_file(&self, path: &str) -> Option<String>;
}

/// Script-evaluation primitive
///
/// Given source text and a display name, executes it with the bindings in
/// `scope` (require/exports/module/filename/dirname). The contract is
/// behavioral: an embedded interpreter, a host engine binding, or a table
/// of native closures all qualify. Side effects flow through the scope;
/// errors are surfaced to the original `require` caller unmodified.
pub trait ScriptEvaluator {
    /// Execute one module body
    fn evaluate(&self, source: &str, display_name: &str, scope: &ModuleScope<'_>) -> Result<()>;
}

impl<F> ScriptEvaluator for F
where
    F: Fn(&str, &str, &ModuleScope<'_>) -> Result<()>,
{
    fn evaluate(&self, source: &str, display_name: &str, scope: &ModuleScope<'_>) -> Result<()> {
        self(source, display_name, scope)
    }
}

/// An in-memory file system
///
/// Files are plain path → content entries; there is no directory
/// metadata, matching the loader's existence-check-only view of storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<String, String>,
}

impl MemoryFileSystem {
    /// Create an empty memory file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory file system pre-populated with files
    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// A `std::fs`-backed file system
///
/// Paths are passed to the OS verbatim; only regular files count as
/// existing, so directories fall through to the manifest/index cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists_file(&self, path: &str) -> bool {
        std::path::Path::new(path).is_file()
    }

    fn read_file(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(!fs.exists_file("/anything.js"));
        assert_eq!(fs.read_file("/anything.js"), None);
    }

    #[test]
    fn test_with_files() {
        let fs = MemoryFileSystem::with_files([("/a.js", "1"), ("/b.js", "2")]);
        assert!(fs.exists_file("/a.js"));
        assert_eq!(fs.read_file("/b.js").as_deref(), Some("2"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("/x.js", "first");
        fs.insert("/x.js", "second");
        assert_eq!(fs.read_file("/x.js").as_deref(), Some("second"));
    }

    #[test]
    fn test_exact_key_match_only() {
        let fs = MemoryFileSystem::with_files([("/dir/index.js", "x")]);
        assert!(!fs.exists_file("/dir"));
        assert!(!fs.exists_file("/dir/index"));
        assert!(fs.exists_file("/dir/index.js"));
    }
}
