//! Stamp `cadence --version` with the source revision.
//!
//! `CADENCE_BUILD_SHA` in the build environment wins, for builds from a
//! tarball. Otherwise ask git, and fall back to "unknown".

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git_revision(root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let root = manifest_dir.join("..");

    println!("cargo:rerun-if-env-changed=CADENCE_BUILD_SHA");
    let head = root.join(".git/HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let rev = env::var("CADENCE_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_revision(&root))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=CADENCE_BUILD_SHA={rev}");
}
