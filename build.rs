//! Build script: embeds the git hash and checks GPU toolkits.
//!
//! GPU features pull in whisper-rs-sys builds that fail late and noisily when
//! the toolkit is missing, so probe for the matching tool first.

use std::process::Command;

fn main() {
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") {
        require_tool("cuda", "nvcc", &["--version"]);
    }
    if cfg!(feature = "vulkan") {
        require_tool("vulkan", "vulkaninfo", &["--summary"]);
    }
    if cfg!(feature = "hipblas") {
        require_tool("hipblas", "rocminfo", &[]);
    }
    if cfg!(feature = "openblas") {
        let found = Command::new("pkg-config")
            .args(["--exists", "openblas"])
            .status()
            .is_ok_and(|s| s.success());
        if !found {
            panic!(
                "\n\nOpenBLAS not found (pkg-config openblas).\n\
                 Install libopenblas-dev or build without `--features openblas`.\n"
            );
        }
    }
}

fn require_tool(feature: &str, tool: &str, args: &[&str]) {
    if Command::new(tool).args(args).output().is_err() {
        panic!(
            "\n\n`{tool}` not found, required by the `{feature}` feature.\n\
             Install the toolkit or build without `--features {feature}`.\n"
        );
    }
    println!("cargo::warning={feature}: found {tool}");
}
