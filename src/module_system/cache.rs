// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for require()

use crate::module_system::module::Module;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity map from canonical path to its module record
///
/// Holds at most one record per canonical path; records are inserted
/// before their body is evaluated and are never removed, so a requester
/// arriving mid-evaluation observes the in-progress record. Borrows of
/// the underlying map are confined to single calls and never held
/// across an evaluation.
#[derive(Debug, Default)]
pub struct ModuleCache {
    modules: RefCell<HashMap<String, Rc<Module>>>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached module by canonical path
    pub fn get(&self, path: &str) -> Option<Rc<Module>> {
        self.modules.borrow().get(path).cloned()
    }

    /// Check if a canonical path is cached
    pub fn has(&self, path: &str) -> bool {
        self.modules.borrow().contains_key(path)
    }

    /// Register a module record under its canonical path
    pub(crate) fn insert(&self, path: String, module: Rc<Module>) {
        self.modules.borrow_mut().insert(path, module);
    }

    /// All cached canonical paths
    pub fn keys(&self) -> Vec<String> {
        self.modules.borrow().keys().cloned().collect()
    }

    /// Number of cached modules
    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }
}
