use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Version string of the current checkout as given by `git describe`, if available.
fn git_version() -> Option<String> {
    let output = Command::new("git").args(["describe", "--tags", "--dirty"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8(output.stdout).ok()?;
    Some(version.trim().to_owned()).filter(|v| !v.is_empty())
}

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is always set by cargo for build scripts");
    let cargo_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    let version = git_version().unwrap_or(cargo_version);
    fs::write(Path::new(&out_dir).join("version"), version)
        .expect("could not write version file");

    println!("cargo:rerun-if-changed=build.rs");
}
