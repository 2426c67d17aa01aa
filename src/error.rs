// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while resolving, loading, or evaluating a module
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Specifier did not resolve to anything loadable
    #[error("Cannot resolve require '{specifier}' from '{from}'")]
    CannotResolve {
        /// The specifier as passed to require()
        specifier: String,
        /// Canonical path of the requesting module
        from: String,
    },

    /// Content read returned nothing for a path the resolver believed existed
    #[error("Cannot load module '{path}'")]
    CannotLoad {
        /// Canonical path of the unreadable module
        path: String,
    },

    /// Package manifest content is not valid JSON
    #[error("Cannot parse manifest '{path}': {source}")]
    ManifestParse {
        /// Path of the offending manifest
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A recognized manifest field holds a value of the wrong shape
    #[error("Invalid value for field '{field}' in manifest '{path}'")]
    ManifestField {
        /// Path of the offending manifest
        path: String,
        /// Name of the malformed field
        field: &'static str,
    },

    /// A `.json` module body could not be parsed
    #[error("Cannot parse JSON module '{path}': {source}")]
    JsonParse {
        /// Canonical path of the module
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A resolved path is a native binary module, which is never evaluated
    #[error("Native modules (.node) are not supported: '{path}'")]
    NativeUnsupported {
        /// The resolved native module path
        path: String,
    },

    /// Error thrown while evaluating a module body, propagated verbatim
    #[error("{0}")]
    Evaluation(String),
}

impl LoaderError {
    /// Create a resolution failure for a specifier and its requester
    pub fn cannot_resolve(specifier: impl Into<String>, from: impl Into<String>) -> Self {
        Self::CannotResolve {
            specifier: specifier.into(),
            from: from.into(),
        }
    }

    /// Create a load failure for a canonical path
    pub fn cannot_load(path: impl Into<String>) -> Self {
        Self::CannotLoad { path: path.into() }
    }

    /// Create an evaluation failure with a message
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}
