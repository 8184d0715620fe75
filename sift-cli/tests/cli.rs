//! End-to-end tests driving the `sift` binary.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;
use tempfile::TempDir;

fn sift(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sift"))
        .args(args)
        .env_remove("SIFT_PLUGINS_DIR")
        .env_remove("SIFT_DEBUG")
        .env_remove("SIFT_MAX_PLUGINS")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sift")
}

fn stdout_names(output: &Output) -> Vec<String> {
    let mut names: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| Path::new(l).file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// a.txt (50 B), b.txt (200 B), c.log (300 B)
fn tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), vec![b'a'; 50]).unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    fs::write(tmp.path().join("sub/b.txt"), vec![b'b'; 200]).unwrap();
    fs::write(tmp.path().join("c.log"), vec![b'c'; 300]).unwrap();
    tmp
}

/// Build the bundled plugin libraries once per test process, into a target
/// directory of their own, and return the directory holding them
fn built_plugins() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap();
        // <target>/debug/deps/<test binary>
        let exe = std::env::current_exe().unwrap();
        let target = exe.ancestors().nth(3).unwrap().join("plugin-libs");

        let status = Command::new(env!("CARGO"))
            .args(["build", "--quiet", "-p", "sift-size", "-p", "sift-name"])
            .arg("--manifest-path")
            .arg(workspace.join("Cargo.toml"))
            .arg("--target-dir")
            .arg(&target)
            .status()
            .expect("failed to run cargo");
        assert!(status.success(), "building the plugin libraries failed");
        target.join("debug")
    })
}

/// Fresh plugin directory holding only the bundled plugins
fn bundled_plugins() -> TempDir {
    let dir = TempDir::new().unwrap();
    for crate_name in ["sift_size", "sift_name"] {
        let file = format!("{}{}{}", DLL_PREFIX, crate_name, DLL_SUFFIX);
        let built = built_plugins().join(&file);
        assert!(built.is_file(), "{} was not built", built.display());
        fs::copy(&built, dir.path().join(&file)).unwrap();
    }
    dir
}

#[test]
fn test_missing_plugin_dir_fails() {
    let data = tree();
    let output = sift(&["-P", "/definitely/not/here", data.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open plugin directory"), "{}", stderr);
}

#[test]
fn test_version() {
    let output = sift(&["-v"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("sift "));
}

#[test]
fn test_version_ignores_unopenable_plugin_dir() {
    let output = sift(&["-P", "/definitely/not/here", "-v"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("sift "));
}

#[test]
fn test_help_without_root() {
    let plugins = TempDir::new().unwrap();
    let output = sift(&["-P", plugins.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage: "));
    assert!(stdout.contains("No plugins loaded."));
}

#[test]
fn test_no_plugins_and_matches_all_or_matches_none() {
    let plugins = TempDir::new().unwrap();
    let data = tree();
    let p = plugins.path().to_str().unwrap();
    let d = data.path().to_str().unwrap();

    let and = sift(&["-P", p, "-A", d]);
    assert!(and.status.success());
    assert_eq!(stdout_names(&and), ["a.txt", "b.txt", "c.log"]);

    let or = sift(&["-P", p, "-O", d]);
    assert!(or.status.success());
    assert!(or.stdout.is_empty());
}

#[test]
fn test_garbage_library_is_skipped() {
    let plugins = TempDir::new().unwrap();
    fs::write(plugins.path().join(format!("junk{}", DLL_SUFFIX)), b"junk").unwrap();
    let data = tree();

    let output = sift(&[
        "-P",
        plugins.path().to_str().unwrap(),
        "--unknown-flag",
        data.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_names(&output).len(), 3);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load plugin"), "{}", stderr);
}

#[test]
fn test_size_and_name_plugins() {
    let plugins = bundled_plugins();
    let data = tree();
    let p = plugins.path().to_str().unwrap();
    let d = data.path().to_str().unwrap();
    let flags = ["--min-size", "100", "--ext", "txt"];

    let run = |mode: &[&str]| {
        let mut args = vec!["-P", p];
        args.extend_from_slice(mode);
        args.extend_from_slice(&flags);
        args.push(d);
        let output = sift(&args);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        stdout_names(&output)
    };

    assert_eq!(run(&["-A"]), ["b.txt"]);
    assert_eq!(run(&["-A", "-N"]), ["a.txt", "c.log"]);
    // a.txt is under 100 bytes but is a .txt
    assert_eq!(run(&["-O"]), ["a.txt", "b.txt", "c.log"]);
}

#[test]
fn test_option_value_that_looks_like_a_flag() {
    let plugins = bundled_plugins();
    let data = tree();
    fs::write(data.path().join("odd.-N"), b"").unwrap();

    let output = sift(&[
        "-P",
        plugins.path().to_str().unwrap(),
        "--ext",
        "-N",
        data.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    // "-N" is the extension, not the invert flag
    assert_eq!(stdout_names(&output), ["odd.-N"]);
}

#[test]
fn test_help_and_listing_show_loaded_plugins() {
    let plugins = bundled_plugins();
    let p = plugins.path().to_str().unwrap();

    let help = sift(&["-P", p, "-h"]);
    assert!(help.status.success());
    let text = String::from_utf8_lossy(&help.stdout);
    assert!(text.contains("--min-size <value>"));
    assert!(text.contains("--ext <value>"));

    let list = sift(&["-P", p, "-L"]);
    assert!(list.status.success());
    let json: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    let mut names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["name", "size"]);
    assert!(json.as_array().unwrap().iter().all(|p| p["origin"]["kind"] == "library"));
}
