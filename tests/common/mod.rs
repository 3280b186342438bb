//! Shared helpers for tests that load real shared libraries
//!
//! The plugin crates under `tests/fixtures` are built with the same cargo
//! and compiler that build the tests, once per test binary.

#![allow(dead_code)]

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Declares `JsonWriter: IWriter` (constructible), an abstract and a private type
pub const WRITER_PLUGIN: &str = "writer_plugin";

/// Exports an ABI version of 0 and no registration function
pub const STALE_PLUGIN: &str = "stale_plugin";

fn build_fixture(name: &str, target_dir: &Path) {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .join("Cargo.toml");

    let build = |offline: bool| {
        let mut cmd = Command::new(env!("CARGO"));
        cmd.args(["build", "--quiet", "--manifest-path"])
            .arg(&manifest)
            .env("CARGO_TARGET_DIR", target_dir);
        if offline {
            cmd.arg("--offline");
        }
        cmd.status().map(|s| s.success()).unwrap_or(false)
    };

    // Dependencies are already cached from building plugwire itself
    assert!(
        build(true) || build(false),
        "failed to build fixture plugin {name}"
    );
}

/// Directory holding the compiled fixture libraries
fn fixture_libs() -> &'static Path {
    static LIBS: OnceLock<PathBuf> = OnceLock::new();
    LIBS.get_or_init(|| {
        let target_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join("fixtures");
        build_fixture(WRITER_PLUGIN, &target_dir);
        build_fixture(STALE_PLUGIN, &target_dir);
        target_dir.join("debug")
    })
}

/// Copies a compiled fixture plugin into `dir` as `file_name`
pub fn install_plugin(fixture: &str, dir: &Path, file_name: &str) -> PathBuf {
    let built = fixture_libs().join(format!("{DLL_PREFIX}{fixture}{DLL_SUFFIX}"));
    let dest = dir.join(file_name);
    fs::copy(&built, &dest).unwrap_or_else(|e| panic!("copying {}: {e}", built.display()));
    dest
}
