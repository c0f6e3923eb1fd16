//! Stamp the binary with where and when it was built.
//!
//! Sets two compile-time variables read by `pulsenet --version`:
//! - `PULSENET_BUILD_TIMESTAMP`: RFC 3339 UTC time, taken from
//!   `SOURCE_DATE_EPOCH` when set so packaged builds are reproducible
//! - `PULSENET_GIT_COMMIT`: short hash, suffixed `-dirty` for uncommitted
//!   changes, or "unknown" outside a git checkout

use std::process::Command;

use chrono::{DateTime, SecondsFormat, Utc};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    println!("cargo:rustc-env=PULSENET_BUILD_TIMESTAMP={}", build_time());

    let commit = git(&["rev-parse", "--short", "HEAD"])
        .map(|hash| {
            let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|status| !status.is_empty());
            if dirty { format!("{}-dirty", hash) } else { hash }
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PULSENET_GIT_COMMIT={}", commit);
}

fn build_time() -> String {
    let epoch = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    epoch
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Run git and return trimmed stdout, or None when git fails
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8(output.stdout).ok()?.trim().to_string())
}
