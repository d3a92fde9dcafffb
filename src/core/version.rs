//! Build metadata generated by the build script

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Version of this crate, recorded in result metadata
pub fn tool_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// `<version> (<git hash>, built <time>)` for `--version`
pub fn long_version() -> String {
    format!("{} ({}, built {})", tool_version(), git_hash(), build_time())
}
