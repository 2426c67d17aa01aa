// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS-style module system
//!
//! - specifier resolution (relative, absolute, and bare with
//!   `node_modules` ancestor search and builtin overrides)
//! - module cache with exactly-once evaluation
//! - circular-require handling via live partial exports

mod cache;
mod loader;
mod module;
mod resolver;

pub use cache::ModuleCache;
pub use loader::{Loader, ModuleScope};
pub use module::Module;
pub use resolver::{BuiltinOverrides, ModuleResolver, ResolveResult};
