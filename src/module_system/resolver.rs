// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution
//!
//! Classifies specifiers as relative/absolute or bare, runs the
//! file-vs-directory cascade over the injected filesystem, and walks the
//! `node_modules` ancestry for bare specifiers. Builtin overrides are
//! consulted before the ancestor walk.

use crate::error::{LoaderError, Result};
use crate::host::FileSystem;
use crate::module_system::module::Module;
use crate::path;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Result of module resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Evaluatable source module
    Source(String),
    /// Structured-data module, parsed instead of evaluated
    Json(String),
    /// Native binary module; resolvable, but never evaluated
    Native(String),
}

impl ResolveResult {
    /// The resolved canonical path
    pub fn canonical_path(&self) -> &str {
        match self {
            ResolveResult::Source(path)
            | ResolveResult::Json(path)
            | ResolveResult::Native(path) => path,
        }
    }

    /// Consume the result, yielding the canonical path
    pub fn into_canonical_path(self) -> String {
        match self {
            ResolveResult::Source(path)
            | ResolveResult::Json(path)
            | ResolveResult::Native(path) => path,
        }
    }
}

/// Forced replacements for bare specifiers
///
/// Maps a bare specifier's literal text to an override path fragment.
/// The table is immutable once the loader is constructed and always wins
/// over the `node_modules` ancestor search. Relative fragments resolve
/// against the configured base directory; bare fragments run the ancestor
/// search from there. The table is consulted at most once per resolution,
/// so overrides cannot chain into each other.
#[derive(Debug, Clone)]
pub struct BuiltinOverrides {
    entries: BTreeMap<String, String>,
    base_dir: Vec<String>,
}

impl BuiltinOverrides {
    /// Create an empty table with the filesystem root as base directory
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            base_dir: vec![String::new()],
        }
    }

    /// Create an empty table with an explicit base directory for
    /// relative and bare override fragments
    pub fn with_base_dir(base_dir: &str) -> Self {
        Self {
            base_dir: path::normalize(&path::split(base_dir))
                .unwrap_or_else(|| vec![String::new()]),
            ..Self::new()
        }
    }

    /// Read the optional `builtins` field of a manifest into a table
    ///
    /// Hosts that keep their override map in a root manifest call this at
    /// setup; resolution itself only consults the constructed table.
    pub fn from_manifest(content: &str, manifest_path: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|source| LoaderError::ManifestParse {
                path: manifest_path.to_string(),
                source,
            })?;

        let mut table = Self::new();
        let Some(builtins) = manifest.builtins else {
            return Ok(table);
        };
        let serde_json::Value::Object(map) = builtins else {
            return Err(LoaderError::ManifestField {
                path: manifest_path.to_string(),
                field: "builtins",
            });
        };
        for (name, fragment) in map {
            let serde_json::Value::String(fragment) = fragment else {
                return Err(LoaderError::ManifestField {
                    path: manifest_path.to_string(),
                    field: "builtins",
                });
            };
            table.entries.insert(name, fragment);
        }
        Ok(table)
    }

    /// Add an override entry
    pub fn insert(&mut self, specifier: impl Into<String>, fragment: impl Into<String>) {
        self.entries.insert(specifier.into(), fragment.into());
    }

    /// Look up the override fragment for a bare specifier
    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.entries.get(specifier).map(String::as_str)
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn base_dir(&self) -> &[String] {
        &self.base_dir
    }
}

impl Default for BuiltinOverrides {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal manifest structure for resolution
///
/// Fields are kept as raw JSON so wrong-shaped values can be reported as
/// field errors instead of parse errors.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    main: Option<serde_json::Value>,
    #[serde(default)]
    builtins: Option<serde_json::Value>,
}

/// Module resolver over an injected filesystem
pub struct ModuleResolver<'a> {
    fs: &'a dyn FileSystem,
    overrides: &'a BuiltinOverrides,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver borrowing the host filesystem and override table
    pub fn new(fs: &'a dyn FileSystem, overrides: &'a BuiltinOverrides) -> Self {
        Self { fs, overrides }
    }

    /// Resolve a specifier relative to a requesting module
    pub fn resolve(&self, from: &Module, specifier: &str) -> Result<ResolveResult> {
        let segments = path::split(specifier);
        let first = segments.first().map(String::as_str).unwrap_or("");

        let found = if path::is_relative_or_absolute(first) {
            self.resolve_path(from.dir_components(), &segments)?
        } else if let Some(fragment) = self.overrides.get(specifier) {
            tracing::debug!(specifier, fragment, "builtin override");
            self.resolve_override(fragment)?
        } else {
            self.search_node_modules(from.dir_components(), &segments)?
        };

        match found {
            Some(resolved) => {
                tracing::debug!(specifier, resolved = %resolved, "resolved");
                Ok(categorize(resolved))
            }
            None => Err(LoaderError::cannot_resolve(specifier, from.filename())),
        }
    }

    /// Relative/absolute resolution: combine, normalize, cascade
    fn resolve_path(&self, dir: &[String], segments: &[String]) -> Result<Option<String>> {
        let absolute = segments.first().is_some_and(String::is_empty);
        let combined: Vec<String> = if absolute {
            segments.to_vec()
        } else {
            dir.iter().chain(segments.iter()).cloned().collect()
        };

        let Some(normalized) = path::normalize(&combined) else {
            return Ok(None);
        };
        let candidate = path::join(&normalized);

        if let Some(hit) = self.load_as_file(&candidate) {
            return Ok(Some(hit));
        }
        self.load_as_directory(&candidate)
    }

    /// Resolve an override fragment by the same classification rules
    fn resolve_override(&self, fragment: &str) -> Result<Option<String>> {
        let segments = path::split(fragment);
        let first = segments.first().map(String::as_str).unwrap_or("");

        if path::is_relative_or_absolute(first) {
            self.resolve_path(self.overrides.base_dir(), &segments)
        } else {
            self.search_node_modules(self.overrides.base_dir(), &segments)
        }
    }

    /// Walk the directory ancestry probing `<level>/node_modules/<specifier>`
    ///
    /// The walk starts at the requesting module's own directory, includes
    /// the root, and stops there. Nearest hit wins.
    fn search_node_modules(
        &self,
        dir: &[String],
        specifier_segments: &[String],
    ) -> Result<Option<String>> {
        let mut level = dir.to_vec();
        while !level.is_empty() {
            let mut probe = level.clone();
            probe.push("node_modules".to_string());
            probe.extend(specifier_segments.iter().cloned());
            let candidate = path::join(&probe);
            tracing::trace!(%candidate, "probing node_modules");

            if let Some(hit) = self.load_as_file(&candidate) {
                return Ok(Some(hit));
            }
            if let Some(hit) = self.load_as_directory(&candidate)? {
                return Ok(Some(hit));
            }
            level.pop();
        }
        Ok(None)
    }

    /// Try the exact path, then synthesized `.js` and `.json` extensions
    fn load_as_file(&self, candidate: &str) -> Option<String> {
        if self.fs.exists_file(candidate) {
            return Some(candidate.to_string());
        }
        let js = format!("{candidate}.js");
        if self.fs.exists_file(&js) {
            return Some(js);
        }
        let json = format!("{candidate}.json");
        if self.fs.exists_file(&json) {
            return Some(json);
        }
        None
    }

    /// Resolve a directory through its manifest `main` or `index`
    fn load_as_directory(&self, dir_path: &str) -> Result<Option<String>> {
        let manifest_path = format!("{dir_path}/package.json");
        let entry = if self.fs.exists_file(&manifest_path) {
            self.manifest_main(&manifest_path)?
        } else {
            "index".to_string()
        };

        let mut combined = path::split(dir_path);
        combined.extend(path::split(&entry));
        let Some(normalized) = path::normalize(&combined) else {
            return Ok(None);
        };
        Ok(self.load_as_file(&path::join(&normalized)))
    }

    /// Read a manifest's `main` entry fragment
    ///
    /// Missing or null `main` falls back to `index`; an unparsable
    /// manifest or a non-string `main` is a hard error, not a fallback.
    fn manifest_main(&self, manifest_path: &str) -> Result<String> {
        let content = self
            .fs
            .read_file(manifest_path)
            .ok_or_else(|| LoaderError::cannot_load(manifest_path))?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| LoaderError::ManifestParse {
                path: manifest_path.to_string(),
                source,
            })?;

        match manifest.main {
            None | Some(serde_json::Value::Null) => Ok("index".to_string()),
            Some(serde_json::Value::String(main)) => Ok(main),
            Some(_) => Err(LoaderError::ManifestField {
                path: manifest_path.to_string(),
                field: "main",
            }),
        }
    }
}

/// Categorize a resolved path by extension
fn categorize(path: String) -> ResolveResult {
    if path.ends_with(".node") {
        ResolveResult::Native(path)
    } else if path.ends_with(".json") {
        ResolveResult::Json(path)
    } else {
        ResolveResult::Source(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryFileSystem;

    fn resolve(fs: &MemoryFileSystem, from: &str, specifier: &str) -> Result<ResolveResult> {
        let overrides = BuiltinOverrides::new();
        let module = Module::at(from);
        ModuleResolver::new(fs, &overrides).resolve(&module, specifier)
    }

    fn resolved_path(fs: &MemoryFileSystem, from: &str, specifier: &str) -> String {
        resolve(fs, from, specifier)
            .expect("resolution failed")
            .into_canonical_path()
    }

    #[test]
    fn test_exact_match_beats_synthesized_extensions() {
        let fs = MemoryFileSystem::with_files([("/a", "x"), ("/a.js", "x"), ("/a.json", "x")]);
        assert_eq!(resolved_path(&fs, "/main.js", "./a"), "/a");
    }

    #[test]
    fn test_extension_synthesis_order() {
        let fs = MemoryFileSystem::with_files([("/a.js", "x"), ("/a.json", "x")]);
        assert_eq!(resolved_path(&fs, "/main.js", "./a"), "/a.js");

        let fs = MemoryFileSystem::with_files([("/a.json", "x")]);
        assert!(matches!(
            resolve(&fs, "/main.js", "./a"),
            Ok(ResolveResult::Json(p)) if p == "/a.json"
        ));
    }

    #[test]
    fn test_relative_resolves_against_requester_directory() {
        let fs = MemoryFileSystem::with_files([("/dir/a.js", "x")]);
        assert_eq!(resolved_path(&fs, "/dir/module.js", "./a"), "/dir/a.js");
        assert_eq!(resolved_path(&fs, "/dir/sub/m.js", "../a"), "/dir/a.js");
    }

    #[test]
    fn test_normalization_grid() {
        let fs = MemoryFileSystem::with_files([("/dir/module.js", "x")]);
        for specifier in [
            "/dir/module.js",
            "/dir/module",
            "/dir/./././module",
            "/dir/a/b/c/../../../module",
        ] {
            assert_eq!(resolved_path(&fs, "/main.js", specifier), "/dir/module.js");
        }
    }

    #[test]
    fn test_underflow_is_cannot_resolve() {
        let fs = MemoryFileSystem::with_files([("/a.js", "x")]);
        let err = resolve(&fs, "/main.js", "../../a").unwrap_err();
        match err {
            LoaderError::CannotResolve { specifier, from } => {
                assert_eq!(specifier, "../../a");
                assert_eq!(from, "/main.js");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_directory_index_fallback() {
        let fs = MemoryFileSystem::with_files([("/dir/index.js", "x")]);
        assert_eq!(resolved_path(&fs, "/main.js", "./dir"), "/dir/index.js");
    }

    #[test]
    fn test_manifest_main_field() {
        let fs = MemoryFileSystem::with_files([
            ("/dir/package.json", r#"{"main":"abc.js"}"#),
            ("/dir/abc.js", "x"),
            ("/dir2/package.json", r#"{"main":"./abc.js"}"#),
            ("/dir2/abc.js", "x"),
        ]);
        assert_eq!(resolved_path(&fs, "/main.js", "./dir"), "/dir/abc.js");
        assert_eq!(resolved_path(&fs, "/main.js", "./dir2"), "/dir2/abc.js");
    }

    #[test]
    fn test_manifest_without_main_uses_index() {
        let fs = MemoryFileSystem::with_files([
            ("/dir/package.json", r#"{"name":"dir"}"#),
            ("/dir/index.js", "x"),
        ]);
        assert_eq!(resolved_path(&fs, "/main.js", "./dir"), "/dir/index.js");
    }

    #[test]
    fn test_malformed_manifest_is_hard_error() {
        let fs = MemoryFileSystem::with_files([
            ("/dir/package.json", "{not json"),
            ("/dir/index.js", "x"),
        ]);
        let err = resolve(&fs, "/main.js", "./dir").unwrap_err();
        match err {
            LoaderError::ManifestParse { path, .. } => assert_eq!(path, "/dir/package.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_main_is_field_error() {
        let fs = MemoryFileSystem::with_files([
            ("/dir/package.json", r#"{"main":{"path":"abc.js"}}"#),
            ("/dir/index.js", "x"),
        ]);
        let err = resolve(&fs, "/main.js", "./dir").unwrap_err();
        match err {
            LoaderError::ManifestField { path, field } => {
                assert_eq!(path, "/dir/package.json");
                assert_eq!(field, "main");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_node_modules_prefers_nearest_ancestor() {
        let fs = MemoryFileSystem::with_files([
            ("/a/node_modules/dep.js", "near"),
            ("/node_modules/dep.js", "far"),
        ]);
        assert_eq!(
            resolved_path(&fs, "/a/b/c.js", "dep"),
            "/a/node_modules/dep.js"
        );
        assert_eq!(resolved_path(&fs, "/main.js", "dep"), "/node_modules/dep.js");
    }

    #[test]
    fn test_bare_specifier_with_subpath() {
        let fs = MemoryFileSystem::with_files([("/node_modules/a/hello.js", "x")]);
        assert_eq!(
            resolved_path(&fs, "/main.js", "a/hello"),
            "/node_modules/a/hello.js"
        );
    }

    #[test]
    fn test_bare_specifier_directory_package() {
        let fs = MemoryFileSystem::with_files([
            ("/node_modules/a/package.json", r#"{"main":"lib/entry.js"}"#),
            ("/node_modules/a/lib/entry.js", "x"),
        ]);
        assert_eq!(
            resolved_path(&fs, "/main.js", "a"),
            "/node_modules/a/lib/entry.js"
        );
    }

    #[test]
    fn test_search_exhaustion_is_cannot_resolve() {
        let fs = MemoryFileSystem::new();
        let err = resolve(&fs, "/a/b/m.js", "ghost").unwrap_err();
        match err {
            LoaderError::CannotResolve { specifier, from } => {
                assert_eq!(specifier, "ghost");
                assert_eq!(from, "/a/b/m.js");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_override_wins_over_node_modules() {
        let fs = MemoryFileSystem::with_files([
            ("/node_modules/fs.js", "ancestor copy"),
            ("/shims/fs.js", "override"),
        ]);
        let mut overrides = BuiltinOverrides::new();
        overrides.insert("fs", "/shims/fs.js");
        let module = Module::at("/main.js");
        let resolved = ModuleResolver::new(&fs, &overrides)
            .resolve(&module, "fs")
            .unwrap();
        assert_eq!(resolved.canonical_path(), "/shims/fs.js");
    }

    #[test]
    fn test_relative_override_resolves_against_base_dir() {
        let fs = MemoryFileSystem::with_files([("/runtime/shims/net.js", "x")]);
        let mut overrides = BuiltinOverrides::with_base_dir("/runtime");
        overrides.insert("net", "./shims/net");
        let module = Module::at("/app/main.js");
        let resolved = ModuleResolver::new(&fs, &overrides)
            .resolve(&module, "net")
            .unwrap();
        assert_eq!(resolved.canonical_path(), "/runtime/shims/net.js");
    }

    #[test]
    fn test_bare_override_searches_from_base_dir() {
        let fs = MemoryFileSystem::with_files([("/runtime/node_modules/net-shim/index.js", "x")]);
        let mut overrides = BuiltinOverrides::with_base_dir("/runtime");
        overrides.insert("net", "net-shim");
        let module = Module::at("/app/main.js");
        let resolved = ModuleResolver::new(&fs, &overrides)
            .resolve(&module, "net")
            .unwrap();
        assert_eq!(
            resolved.canonical_path(),
            "/runtime/node_modules/net-shim/index.js"
        );
    }

    #[test]
    fn test_native_extension_is_categorized() {
        let fs = MemoryFileSystem::with_files([("/addon.node", "\0")]);
        assert!(matches!(
            resolve(&fs, "/main.js", "./addon.node"),
            Ok(ResolveResult::Native(p)) if p == "/addon.node"
        ));
    }

    #[test]
    fn test_overrides_from_manifest() {
        let table = BuiltinOverrides::from_manifest(
            r#"{"main":"index.js","builtins":{"fs":"/shims/fs.js","net":"./net"}}"#,
            "/package.json",
        )
        .unwrap();
        assert_eq!(table.get("fs"), Some("/shims/fs.js"));
        assert_eq!(table.get("net"), Some("./net"));
        assert_eq!(table.get("http"), None);

        let err =
            BuiltinOverrides::from_manifest(r#"{"builtins":{"fs":42}}"#, "/package.json")
                .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::ManifestField { field: "builtins", .. }
        ));
    }
}
