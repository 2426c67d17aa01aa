// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # astrolabe
//!
//! An embeddable CommonJS-style module resolver and loader.
//!
//! Given a requesting module's location and a require specifier,
//! astrolabe locates, loads, evaluates, and caches the target module:
//!
//! - relative and absolute specifiers with full `.`/`..` normalization
//! - directory indexes and `package.json` `main` entries
//! - bare specifiers through a `node_modules`-style ancestor search
//! - builtin override tables that shadow the ancestor search
//! - exactly-once evaluation with a live cache, so circular requires
//!   observe a partial-but-shared exports object instead of recursing
//!
//! The engine owns no I/O and no interpreter. Callers inject a
//! [`FileSystem`] (existence check + read) and a [`ScriptEvaluator`]
//! (executes source text against the module bindings), which makes the
//! loader usable over real disks, archives, or purely in-memory trees.
//!
//! ## Embedding
//!
//! ```rust,ignore
//! use astrolabe::{Loader, MemoryFileSystem, ModuleScope, Result, Value};
//!
//! let fs = MemoryFileSystem::with_files([
//!     ("/main.js", "module.exports = require('./a') + require('./a')"),
//!     ("/a.js", "module.exports = 2"),
//! ]);
//! // the evaluator is the host's script engine; it receives the source
//! // text and a scope exposing require/exports/module/filename/dirname
//! let loader = Loader::new(fs, my_engine);
//! let exports = loader.require("/main")?;
//! assert_eq!(exports, Value::from(4));
//! ```
//!
//! ## CLI usage
//!
//! ```bash
//! # print the canonical path a specifier resolves to
//! astrolabe ./lib/util --from /srv/app/main.js
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod host;
pub mod module_system;
pub mod path;
pub mod value;

// Re-exports
pub use error::{LoaderError, Result};
pub use host::{FileSystem, MemoryFileSystem, ScriptEvaluator, StdFileSystem};
pub use module_system::{
    BuiltinOverrides, Loader, Module, ModuleCache, ModuleResolver, ModuleScope, ResolveResult,
};
pub use value::Value;

/// Version of the astrolabe crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
