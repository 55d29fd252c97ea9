//! Embeds build identification for the ada-mock startup banner
//!
//! Exports `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` as compile-time
//! environment variables read with `env!`.

use std::process::Command;

/// Placeholder used when a value cannot be determined (no git, tarball build)
const UNKNOWN: &str = "unknown";

fn main() {
    emit("GIT_HASH", &git_revision().unwrap_or_else(|| UNKNOWN.to_string()));
    emit("BUILD_TIMESTAMP", &build_timestamp());
    emit(
        "BUILD_PROFILE",
        &std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );

    // Re-stamp when the checked-out commit moves
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/heads");
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// Short commit id, suffixed `-dirty` when the work tree has local edits
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8", "--exclude=*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}

/// UTC build time, e.g. `2026-10-19T08:15:02Z`
fn build_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
