use std::fs;
use std::io::BufReader;
use std::path::Path;

use assert_cmd::Command;
use flate2::read::GzDecoder;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use dotkeep::archive::ManifestEntry;
use dotkeep::formats::Format;

/// Command wired to an isolated home directory
fn dotkeep(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dotkeep").unwrap();
    cmd.env("HOME", home);
    cmd
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("dotkeep").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("dotkeep").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_subcommand() {
    let mut cmd = Command::cargo_bin("dotkeep").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand() {
    let mut cmd = Command::cargo_bin("dotkeep").unwrap();
    cmd.arg("unknown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_format() {
    let home = TempDir::new().unwrap();
    dotkeep(home.path())
        .args(["export", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'xml'"));
}

#[test]
fn test_dry_run_conflicts_with_tar() {
    let home = TempDir::new().unwrap();
    dotkeep(home.path())
        .args(["export", "--dry-run", "--tar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_help_for_subcommands() {
    for subcommand in &["export", "import"] {
        let mut cmd = Command::cargo_bin("dotkeep").unwrap();
        cmd.args([subcommand, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn test_verbose_flag() {
    let home = TempDir::new().unwrap();
    dotkeep(home.path())
        .args(["--verbose", "--no-config", "export"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Verbose mode enabled"))
        .stderr(predicate::str::contains("exporter"));
}

#[test]
fn test_export_stdout_json() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();

    let assert = dotkeep(home.path())
        .args(["--no-config", "export"])
        .assert()
        .success();

    let stdout = &assert.get_output().stdout;
    let payload: serde_json::Value = serde_json::from_slice(stdout).unwrap();

    let vimrc = home.path().join(".vimrc");
    let key = vimrc.to_str().unwrap();
    let expected = json!({ "vim": { key: "set number" } });
    assert_eq!(payload, expected);
}

#[test]
fn test_export_dry_run_lists_without_writing() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    let workdir = TempDir::new().unwrap();

    dotkeep(home.path())
        .current_dir(workdir.path())
        .args(["--no-config", "export", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".vimrc"));

    // Dry run must not leave anything behind.
    assert_eq!(fs::read_dir(workdir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_to_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".gitconfig"), "[user]").unwrap();

    let out = home.path().join("payload.json");
    dotkeep(home.path())
        .args(["--no-config", "export", "--output"])
        .arg(&out)
        .assert()
        .success();

    let payload = fs::read(&out).unwrap();
    let set = Format::Json.decode(&payload).unwrap();
    assert!(set.contains_key("git"));
}

#[test]
fn test_export_binary_format() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".tmux.conf"), "set -g mouse on").unwrap();

    let out = home.path().join("payload.bin");
    dotkeep(home.path())
        .args(["--no-config", "export", "--format", "binary", "--output"])
        .arg(&out)
        .assert()
        .success();

    let payload = fs::read(&out).unwrap();
    let set = Format::Binary.decode(&payload).unwrap();
    let files = &set["tmux"];
    assert_eq!(files.values().next().unwrap(), "set -g mouse on");
}

#[test]
fn test_import_stdin_restores_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();

    // Export, wipe the home directory, then import the payload back.
    let assert = dotkeep(home.path())
        .args(["--no-config", "export"])
        .assert()
        .success();
    let payload = assert.get_output().stdout.clone();

    fs::remove_file(home.path().join(".vimrc")).unwrap();

    dotkeep(home.path())
        .args(["--no-config", "import"])
        .write_stdin(payload)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(home.path().join(".vimrc")).unwrap(),
        "set number"
    );
}

#[test]
fn test_import_expands_home_shorthand() {
    let home = TempDir::new().unwrap();
    let payload = json!({ "vim": { "~/.vimrc": "set ruler" } }).to_string();

    dotkeep(home.path())
        .args(["--no-config", "import"])
        .write_stdin(payload)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(home.path().join(".vimrc")).unwrap(),
        "set ruler"
    );
}

#[test]
fn test_import_from_file() {
    let home = TempDir::new().unwrap();
    let payload = json!({ "git": { "~/.gitconfig": "[alias]" } }).to_string();
    let input = home.path().join("payload.json");
    fs::write(&input, payload).unwrap();

    dotkeep(home.path())
        .args(["--no-config", "import", "--input"])
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(home.path().join(".gitconfig")).unwrap(),
        "[alias]"
    );
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let home = TempDir::new().unwrap();
    let payload = json!({ "vim": { "~/.vimrc": "set number" } }).to_string();

    dotkeep(home.path())
        .args(["--no-config", "import", "--dry-run"])
        .write_stdin(payload)
        .assert()
        .success()
        .stdout(predicate::str::contains(".vimrc"));

    assert!(!home.path().join(".vimrc").exists());
}

#[test]
fn test_import_malformed_payload_fails() {
    let home = TempDir::new().unwrap();

    dotkeep(home.path())
        .args(["--no-config", "import"])
        .write_stdin("{broken")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode payload"));
}

fn write_two_program_config(dir: &Path) -> std::path::PathBuf {
    let config = dir.join("config.toml");
    fs::write(
        &config,
        r#"
use_builtins = false

[programs]
vim = ["~/.vimrc"]
git = ["~/.gitconfig"]
"#,
    )
    .unwrap();
    config
}

#[test]
fn test_tar_export_layout_and_manifest() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    fs::write(home.path().join(".gitconfig"), "[user]").unwrap();
    let config = write_two_program_config(home.path());

    let workdir = TempDir::new().unwrap();
    dotkeep(home.path())
        .current_dir(workdir.path())
        .args(["export", "--tar", "--config"])
        .arg(&config)
        .assert()
        .success();

    let archive_path = workdir.path().join("dotkeep-export.tar.gz");
    assert!(archive_path.is_file());

    // One subdirectory per program, files flattened to their base names.
    let file = fs::File::open(&archive_path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut manifest: Option<Vec<ManifestEntry>> = None;
    let mut entry_paths = Vec::new();

    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().into_owned();
        if path.ends_with("metadata.json") {
            let mut content = String::new();
            std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
            manifest = Some(serde_json::from_str(&content).unwrap());
        }
        entry_paths.push(path);
    }

    assert!(entry_paths.iter().any(|p| p == "dotkeep-export/vim/.vimrc"));
    assert!(entry_paths
        .iter()
        .any(|p| p == "dotkeep-export/git/.gitconfig"));

    let manifest = manifest.expect("archive carries a manifest");
    assert_eq!(manifest.len(), 2);
    assert!(manifest
        .iter()
        .any(|e| e.archived_path == "vim/.vimrc" && e.original_path == "~/.vimrc"));
    assert!(manifest
        .iter()
        .any(|e| e.archived_path == "git/.gitconfig" && e.original_path == "~/.gitconfig"));
}

#[test]
fn test_tar_round_trip_restores_files() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    fs::write(home.path().join(".gitconfig"), "[user]").unwrap();
    let config = write_two_program_config(home.path());

    let workdir = TempDir::new().unwrap();
    let archive_path = workdir.path().join("backup.tar.gz");
    dotkeep(home.path())
        .current_dir(workdir.path())
        .args(["export", "--config"])
        .arg(&config)
        .arg("--tar")
        .arg(&archive_path)
        .assert()
        .success();

    // Restore into a fresh home directory.
    let new_home = TempDir::new().unwrap();
    let import_dir = TempDir::new().unwrap();
    dotkeep(new_home.path())
        .current_dir(import_dir.path())
        .args(["--no-config", "import", "--tar"])
        .arg(&archive_path)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(new_home.path().join(".vimrc")).unwrap(),
        "set number"
    );
    assert_eq!(
        fs::read_to_string(new_home.path().join(".gitconfig")).unwrap(),
        "[user]"
    );

    // No extracted staging directory is left behind.
    assert_eq!(fs::read_dir(import_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_tar_export_fails_on_missing_declared_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    // .gitconfig is declared but missing: archive mode must fail hard.
    let config = write_two_program_config(home.path());

    let workdir = TempDir::new().unwrap();
    dotkeep(home.path())
        .current_dir(workdir.path())
        .args(["export", "--tar", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to copy"));
}

#[test]
fn test_text_export_tolerates_missing_declared_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    // Same registry as the failing tar case, but text export skips the
    // missing file and succeeds.
    let config = write_two_program_config(home.path());

    let assert = dotkeep(home.path())
        .args(["export", "--config"])
        .arg(&config)
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert!(payload.get("vim").is_some());
    assert!(payload.get("git").is_none());
}

#[test]
fn test_config_without_builtins_limits_registry() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join(".vimrc"), "set number").unwrap();
    fs::write(home.path().join(".bashrc"), "alias ll='ls -l'").unwrap();

    let config = home.path().join("config.toml");
    fs::write(
        &config,
        "use_builtins = false\n\n[programs]\nvim = [\"~/.vimrc\"]\n",
    )
    .unwrap();

    let assert = dotkeep(home.path())
        .args(["export", "--config"])
        .arg(&config)
        .assert()
        .success();

    let payload: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert!(payload.get("vim").is_some());
    assert!(payload.get("bash").is_none());
}
