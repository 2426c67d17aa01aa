// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module record

use crate::path;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// One loaded (or loading) module
///
/// Identified by its canonical path; the registry guarantees a single
/// record per canonical path, so the `exports` container is shared by
/// reference with every requester.
#[derive(Debug)]
pub struct Module {
    path_components: Vec<String>,
    dir_components: Vec<String>,
    filename: String,
    dirname: String,
    exports: RefCell<Value>,
}

impl Module {
    /// Create a module record for a canonical segment sequence
    pub(crate) fn new(path_components: Vec<String>) -> Rc<Self> {
        let dir_components: Vec<String> = path_components
            [..path_components.len().saturating_sub(1)]
            .to_vec();
        let filename = path::join(&path_components);
        let dirname = if dir_components.len() > 1 {
            path::join(&dir_components)
        } else {
            "/".to_string()
        };

        Rc::new(Self {
            path_components,
            dir_components,
            filename,
            dirname,
            exports: RefCell::new(Value::object()),
        })
    }

    /// Create a detached module record for a canonical path string
    ///
    /// Used as a resolution origin: the synthetic root module and the
    /// CLI's `--from` origin are built this way and never registered.
    pub fn at(canonical_path: &str) -> Rc<Self> {
        Self::new(path::split(canonical_path))
    }

    /// The synthetic root module; its directory is the filesystem root
    pub(crate) fn root() -> Rc<Self> {
        Self::at("/")
    }

    /// Canonical path components
    pub fn path_components(&self) -> &[String] {
        &self.path_components
    }

    /// Directory components (canonical path minus the last segment)
    pub fn dir_components(&self) -> &[String] {
        &self.dir_components
    }

    /// Canonical path, the module's identity
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directory of the module, base for its relative requires
    pub fn dirname(&self) -> &str {
        &self.dirname
    }

    /// Current exports value
    ///
    /// Container values are shared: the returned clone aliases the same
    /// underlying object, and later in-place mutations remain visible.
    pub fn exports(&self) -> Value {
        self.exports.borrow().clone()
    }

    /// Replace the exports slot (`module.exports = ...`)
    ///
    /// Requesters that already hold the previous container keep it; only
    /// future requesters observe the new value.
    pub fn set_exports(&self, value: Value) {
        *self.exports.borrow_mut() = value;
    }
}
