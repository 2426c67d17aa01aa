// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, reads, and evaluates modules
//!
//! The loader owns the injected host capabilities and the module cache.
//! Each module is evaluated at most once; a require arriving while a
//! module is still evaluating returns its live, partially-populated
//! exports, which is how circular requires terminate.

use crate::error::{LoaderError, Result};
use crate::host::{FileSystem, ScriptEvaluator};
use crate::module_system::cache::ModuleCache;
use crate::module_system::module::Module;
use crate::module_system::resolver::{BuiltinOverrides, ModuleResolver, ResolveResult};
use crate::path;
use crate::value::Value;
use std::rc::Rc;

/// CommonJS-style module loader over injected host capabilities
pub struct Loader {
    fs: Box<dyn FileSystem>,
    evaluator: Box<dyn ScriptEvaluator>,
    overrides: BuiltinOverrides,
    cache: ModuleCache,
}

impl Loader {
    /// Create a loader from the host's filesystem and evaluator
    pub fn new(fs: impl FileSystem + 'static, evaluator: impl ScriptEvaluator + 'static) -> Self {
        Self {
            fs: Box::new(fs),
            evaluator: Box::new(evaluator),
            overrides: BuiltinOverrides::new(),
            cache: ModuleCache::new(),
        }
    }

    /// Install a builtin override table
    pub fn with_builtin_overrides(mut self, overrides: BuiltinOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Require a specifier from the synthetic root module
    ///
    /// The root module's directory is the filesystem root, so an initial
    /// bare or relative specifier resolves by the same rules as any
    /// nested require.
    pub fn require(&self, specifier: &str) -> Result<Value> {
        let root = Module::root();
        self.require_from(&root, specifier)
    }

    /// Require a specifier on behalf of a requesting module
    pub fn require_from(&self, from: &Module, specifier: &str) -> Result<Value> {
        let resolved =
            ModuleResolver::new(self.fs.as_ref(), &self.overrides).resolve(from, specifier)?;

        match resolved {
            ResolveResult::Native(path) => Err(LoaderError::NativeUnsupported { path }),
            ResolveResult::Json(path) => self.load_json(&path),
            ResolveResult::Source(path) => self.load_source(&path),
        }
    }

    /// Resolve a specifier from the root module without loading it
    pub fn resolve(&self, specifier: &str) -> Result<String> {
        let root = Module::root();
        ModuleResolver::new(self.fs.as_ref(), &self.overrides)
            .resolve(&root, specifier)
            .map(ResolveResult::into_canonical_path)
    }

    /// The module cache
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Load a source module, evaluating its body at most once
    fn load_source(&self, canonical: &str) -> Result<Value> {
        if let Some(module) = self.cache.get(canonical) {
            tracing::debug!(path = canonical, "cache hit");
            return Ok(module.exports());
        }

        // registered before evaluation so a recursive require of this
        // path sees the in-progress record
        let module = Module::new(path::split(canonical));
        self.cache.insert(canonical.to_string(), Rc::clone(&module));

        let source = self.read_content(canonical)?;
        tracing::debug!(path = canonical, "evaluating module");
        let scope = ModuleScope {
            loader: self,
            module: Rc::clone(&module),
        };
        self.evaluator.evaluate(&source, canonical, &scope)?;

        Ok(module.exports())
    }

    /// Load a `.json` module: parsed, never evaluated
    fn load_json(&self, canonical: &str) -> Result<Value> {
        if let Some(module) = self.cache.get(canonical) {
            tracing::debug!(path = canonical, "cache hit");
            return Ok(module.exports());
        }

        let module = Module::new(path::split(canonical));
        self.cache.insert(canonical.to_string(), Rc::clone(&module));

        let content = self.read_content(canonical)?;
        let parsed: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| LoaderError::JsonParse {
                path: canonical.to_string(),
                source,
            })?;
        module.set_exports(Value::from_json(&parsed));

        Ok(module.exports())
    }

    /// Read a module body; a missing or empty read is a fatal load error
    fn read_content(&self, canonical: &str) -> Result<String> {
        match self.fs.read_file(canonical) {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(LoaderError::cannot_load(canonical)),
        }
    }
}

/// The bindings visible to an evaluating module body
///
/// Handed to the [`ScriptEvaluator`] for each source module: a `require`
/// bound to that module, its exports container, the module record, and
/// its filename/dirname strings.
pub struct ModuleScope<'a> {
    loader: &'a Loader,
    module: Rc<Module>,
}

impl ModuleScope<'_> {
    /// Require a specifier relative to this module
    pub fn require(&self, specifier: &str) -> Result<Value> {
        self.loader.require_from(&self.module, specifier)
    }

    /// The module record being evaluated
    pub fn module(&self) -> &Rc<Module> {
        &self.module
    }

    /// Current exports value (`exports`)
    pub fn exports(&self) -> Value {
        self.module.exports()
    }

    /// Replace the exports slot (`module.exports = ...`)
    pub fn set_exports(&self, value: Value) {
        self.module.set_exports(value);
    }

    /// Set one property on the exports container (`exports.key = ...`)
    pub fn export(&self, key: impl Into<String>, value: Value) {
        self.module.exports().set(key, value);
    }

    /// Canonical filename of the module (`__filename`)
    pub fn filename(&self) -> &str {
        self.module.filename()
    }

    /// Directory of the module (`__dirname`)
    pub fn dirname(&self) -> &str {
        self.module.dirname()
    }
}
