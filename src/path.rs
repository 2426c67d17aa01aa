// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Slash-separated path segment utilities
//!
//! All loader paths are plain `/`-joined segment sequences handed to the
//! injected filesystem; nothing here touches `std::path` or the OS.

/// Split a path string into its segments
pub fn split(path: &str) -> Vec<String> {
    path.split('/').map(str::to_string).collect()
}

/// Join segments back into a path string
pub fn join(components: &[String]) -> String {
    components.join("/")
}

/// Normalize a segment sequence, resolving `.` and `..`
///
/// An empty segment is kept only as the very first output segment (the
/// absolute-path marker). `..` pops the previous output segment; popping
/// past the root returns `None`, which callers must treat as an
/// unresolvable specifier.
pub fn normalize<S: AsRef<str>>(components: &[S]) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(components.len());

    for component in components {
        match component.as_ref() {
            "" => {
                if out.is_empty() {
                    out.push(String::new());
                }
            }
            "." => {}
            ".." => {
                if out.pop().is_none() {
                    return None;
                }
            }
            c => out.push(c.to_string()),
        }
    }

    Some(out)
}

/// Whether a specifier's first segment marks it relative or absolute
///
/// True for specifiers starting with `/`, `./`, or `../`; anything else
/// is a bare specifier.
pub fn is_relative_or_absolute(first_segment: &str) -> bool {
    matches!(first_segment, "" | "." | "..")
}
