//! build script for aigdepth.
//! This generates a small rust file that lets the aig-opt tool
//! report what options were used for compilation.
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let opt_level = env::var("OPT_LEVEL").unwrap_or_else(|_| "?".to_string());
    let version = env!("CARGO_PKG_VERSION");
    let dest_path = Path::new(&out_dir).join("aigdepth-build-info.rs");
    fs::write(
        &dest_path,
        format!("
        const AIGDEPTH_VERSION : &str = {version:?};
        const AIGDEPTH_OPT_LEVEL : &str = {opt_level:?};
        ")
    ).unwrap();
    println!("cargo:rerun-if-changed=build.rs");
}
