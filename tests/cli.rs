use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn notetree(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("notetree").unwrap();
    // keep the test away from any real ~/.notetree
    cmd.env("HOME", home);
    cmd
}

#[test]
fn test_path_view_prints_outline_with_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/work/todo.txt", "+ deadline (now)\ncall back\n");

    notetree(dir.path())
        .args(["--root"])
        .arg(dir.path().join("data"))
        .args(["--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("work 1"))
        .stdout(predicate::str::contains("todo.txt 2"))
        .stdout(predicate::str::contains("+ deadline (now) 2-1"));
}

#[test]
fn test_tags_view_groups_by_tag() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "data/n.txt",
        "+ a (red)\n+ b (blue)\n+ untagged\n",
    );

    notetree(dir.path())
        .args(["--root"])
        .arg(dir.path().join("data"))
        .args(["--view", "tags", "--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blue 1"))
        .stdout(predicate::str::contains("red 2"))
        // the no-tag bucket sorts last
        .stdout(predicate::str::contains("~ 3"));
}

#[test]
fn test_find_prints_matching_notes() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "data/n.txt",
        "+ wine (red)\ncellar\n\n+ sky (blue)\nclouds\n",
    );

    notetree(dir.path())
        .args(["--root"])
        .arg(dir.path().join("data"))
        .args(["--find", "!red", "--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ wine (red) 1-1"))
        .stdout(predicate::str::contains("sky").not());
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    notetree(dir.path())
        .args(["--root"])
        .arg(dir.path().join("absent"))
        .assert()
        .failure();
}
