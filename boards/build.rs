// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Build script shared by the EFM32/EFR32 board crates.
//!
//! On a cross build it hands the board's `layout.ld` to the linker. It also
//! rejects builds where the flags from the board's `.cargo/config.toml` were
//! replaced, because such an image links but does not boot. Every linker
//! script reached through `INCLUDE` is watched for changes.
//!
//! ```toml
//! [package]
//! # ...
//! build = "../build.rs"
//! ```

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const LINKER_SCRIPT: &str = "layout.ld";

/// Set next to the rustflags in every board `.cargo/config.toml`.
const FLAGS_SENTINEL: &str = "cfg_board_buildflagssentinel";

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let layout = manifest_dir.join(LINKER_SCRIPT);
    if !layout.is_file() {
        panic!(
            "{} has no `{}`; every board provides its memory map there",
            manifest_dir.display(),
            LINKER_SCRIPT
        );
    }

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    // Host builds are the unit tests and lint runs: nothing to link.
    if host != target {
        check_board_target(&target);
        check_rustflags();
        println!("cargo:rustc-link-arg=-L{}", manifest_dir.display());
        println!("cargo:rustc-link-arg=-T{}", LINKER_SCRIPT);
    }

    println!("cargo:rerun-if-env-changed=RUSTFLAGS");
    for script in linker_scripts(&layout) {
        println!("cargo:rerun-if-changed={}", script.display());
    }
}

/// The boards only run on Cortex-M4 (Series 1) and Cortex-M33 (Series 2).
fn check_board_target(target: &str) {
    if !target.starts_with("thumbv7em-") && !target.starts_with("thumbv8m.main-") {
        panic!("{target} is not a Cortex-M4 or Cortex-M33 target; build from the board directory");
    }
}

/// `RUSTFLAGS` from the environment silently replaces the board's
/// `.cargo/config.toml` flags; the sentinel is missing when that happened.
fn check_rustflags() {
    let flags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    if !flags.split('\x1f').any(|flag| flag.contains(FLAGS_SENTINEL)) {
        panic!(
            "Board rustflags were overridden (is RUSTFLAGS set?). \
             Unset it or add `--cfg {FLAGS_SENTINEL}` to the replacement flags."
        );
    }
}

/// `root` and every script it pulls in through `INCLUDE`, each once.
fn linker_scripts(root: &Path) -> BTreeSet<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(script) = pending.pop() {
        let script = match std::path::absolute(&script) {
            Ok(path) => path,
            Err(e) => panic!("cannot resolve {}: {e}", script.display()),
        };
        if !seen.insert(script.clone()) {
            continue;
        }
        let text = match fs::read_to_string(&script) {
            Ok(text) => text,
            Err(e) => panic!("cannot read linker script {}: {e}", script.display()),
        };
        let dir = script.parent().map(Path::to_path_buf).unwrap_or_default();
        pending.extend(includes(&text).map(|include| dir.join(include)));
    }
    seen
}

/// Paths named by `INCLUDE` lines, quoted or not.
fn includes(script: &str) -> impl Iterator<Item = &str> {
    script
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("INCLUDE"))
        .map(|rest| rest.trim().trim_matches('"'))
        .filter(|path| !path.is_empty())
}
