// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! astrolabe CLI - resolve CommonJS specifiers against the real filesystem

use astrolabe::{BuiltinOverrides, Module, ModuleResolver, StdFileSystem, VERSION};
use clap::Parser;
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(
    name = "astrolabe",
    about = "Resolve CommonJS module specifiers against a directory tree",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Specifier to resolve (relative, absolute, or bare)
    specifier: String,

    /// Canonical path of the requesting module
    #[arg(long, default_value = "/")]
    from: String,

    /// Builtin override entries, as NAME=PATH pairs
    #[arg(long = "override", value_name = "NAME=PATH")]
    overrides: Vec<String>,

    /// Base directory for relative override paths
    #[arg(long)]
    override_base: Option<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("astrolabe=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("astrolabe=warn")
            .init();
    }

    let mut overrides = match &cli.override_base {
        Some(base) => BuiltinOverrides::with_base_dir(base),
        None => BuiltinOverrides::new(),
    };
    for entry in &cli.overrides {
        let Some((name, path)) = entry.split_once('=') else {
            anyhow::bail!("invalid --override '{}', expected NAME=PATH", entry);
        };
        overrides.insert(name, path);
    }

    let fs = StdFileSystem;
    let from = Module::at(&cli.from);
    match ModuleResolver::new(&fs, &overrides).resolve(&from, &cli.specifier) {
        Ok(resolved) => {
            println!("{}", resolved.canonical_path());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
