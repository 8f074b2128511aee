//! Build script for storefront crate.
//!
//! Hashes the static assets so templates can append `?v=<hash>` and browsers
//! drop stale copies after a deploy.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

const ASSETS: &[(&str, &str)] = &[
    ("CSS_HASH", "static/css/main.css"),
    ("JS_HASH", "static/js/site.js"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");

    for (var, relative) in ASSETS {
        let path = Path::new(&manifest_dir).join(relative);
        println!("cargo:rerun-if-changed={}", path.display());
        println!("cargo:rustc-env={var}={}", short_hash(&path));
    }
}

/// First 8 hex chars of the file's SHA-256, or empty if it cannot be read.
fn short_hash(path: &Path) -> String {
    match fs::read(path) {
        Ok(content) => {
            let hash = format!("{:x}", Sha256::digest(&content));
            hash.chars().take(8).collect()
        }
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            String::new()
        }
    }
}
