//! Build script for NutriTrack
//!
//! Bumps the local build counter and embeds build metadata for the status tool.

use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

/// Read the last recorded build number, treating a missing or garbled file as 0
fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    // Only rerun when src/ files change (not on every cargo build)
    println!("cargo:rerun-if-changed=src");

    let build_number_path = Path::new(BUILD_NUMBER_FILE);
    let new_build = read_build_number(build_number_path) + 1;

    fs::write(build_number_path, new_build.to_string())
        .expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=NUTRITRACK_BUILD_NUMBER={}", new_build);
    println!("cargo:rustc-env=NUTRITRACK_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:warning=NutriTrack Build #{} at {}", new_build, timestamp);
}
