//! Build script for storefront crate.
//!
//! Fingerprints the stylesheet and the storefront script so they can be
//! served with immutable cache headers.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    fingerprint(&static_dir, "css", "main.css", "CSS_HASH");
    fingerprint(&static_dir, "js", "storefront.js", "JS_HASH");
}

/// Hash `static/<kind>/<file>` and copy it to `static/<kind>/derived/` with the
/// hash in its name.
///
/// Sets `env_var` for use with `env!(...)`. An empty value means the asset was
/// missing at build time.
fn fingerprint(static_dir: &Path, kind: &str, file: &str, env_var: &str) {
    let source = static_dir.join(kind).join(file);
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {file}: {e}");
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={env_var}={short_hash}");

    let (stem, extension) = file.rsplit_once('.').unwrap_or((file, kind));
    let derived_dir = static_dir.join(kind).join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(
        &source,
        derived_dir.join(format!("{stem}.{short_hash}.{extension}")),
    )
    .expect("Failed to copy asset to derived directory");
}
