use std::env;

fn main() {
    let mut build = cc::Build::new();

    build
        .include("native")
        .file("native/worker.c")
        .flag_if_supported("-std=c11")
        .warnings(true);

    // Keep the worker optimized even in debug builds so the boundary cost dominates
    let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
    if target_env == "msvc" {
        build.flag_if_supported("/O2");
    } else {
        build.flag_if_supported("-O2");
    }

    // cc emits the link-search and static link-lib directives itself
    build.compile("interop_worker");

    println!("cargo:rerun-if-changed=native/worker.h");
    println!("cargo:rerun-if-changed=native/worker.c");
}
