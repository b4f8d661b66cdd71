//! Build script for MacroTrack
//!
//! Bumps a persistent build counter and exposes it, together with the
//! compile time, to the crate through `rustc-env`.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn read_counter(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter_path = Path::new(COUNTER_FILE);
    let build_number = read_counter(counter_path) + 1;

    // A read-only checkout still builds; the counter just stops advancing.
    if let Err(e) = fs::write(counter_path, build_number.to_string()) {
        println!("cargo:warning=could not persist build number: {}", e);
    }

    let compiled_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=MACROTRACK_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=MACROTRACK_BUILD_TIMESTAMP={}", compiled_at);
}
