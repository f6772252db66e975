use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::{create_layout, create_valid_dataset, write_image, write_label};

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("-V");
    cmd.assert()
        .success()
        .stdout(format!("yolo-verify {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn verify_valid_dataset_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[OK] Dataset looks good."))
        .stdout(predicate::str::contains("[OK] Images: 4 | Total objects: 5"));
}

#[test]
fn verify_missing_paths_fails_with_listing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    fs::create_dir_all(temp.path().join("images/train")).expect("create dir");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path());
    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("[FAIL] Missing required paths:"))
        .stdout(predicate::str::contains("data.yaml"))
        .stdout(predicate::str::contains("labels").and(predicate::str::contains("val")));
}

#[test]
fn verify_missing_label_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());
    write_image(temp.path(), "val", "orphan.jpg");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path());
    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains(
            "[FAIL] Missing label files for 1 images.",
        ))
        .stdout(predicate::str::contains("Create empty .txt files"));
}

#[test]
fn verify_label_errors_fail() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());
    write_label(temp.path(), "train", "img_b", "3 0.5 0.5 0.2 0.2\n");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path());
    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains(
            "[FAIL] Found 1 label errors across 4 images.",
        ));
}

#[test]
fn verify_details_lists_each_issue() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());
    write_label(temp.path(), "train", "img_b", "1 0.5 0.5 0.2 0.2\n0 0.5 0.5 0 0.1\n");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path()).arg("--details");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("DegenerateBox"))
        .stdout(predicate::str::contains("img_b.txt:2"));
}

#[test]
fn verify_empty_split_warns_but_passes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_layout(temp.path());
    write_image(temp.path(), "train", "a.jpg");
    write_label(temp.path(), "train", "a", "0 0.5 0.5 0.5 0.5\n");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[WARN] No images found in"));
}

#[test]
fn verify_strict_fails_on_empty_split() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_layout(temp.path());
    write_image(temp.path(), "train", "a.jpg");
    write_label(temp.path(), "train", "a", "");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path()).arg("--strict");
    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("strict mode"));
}

#[test]
fn verify_classes_flag_widens_allowed_set() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());
    write_label(temp.path(), "train", "img_b", "3 0.5 0.5 0.2 0.2\n");

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify")
        .arg(temp.path())
        .args(["--classes", "0,1,2,3"]);
    cmd.assert().success();
}

#[test]
fn verify_json_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path()).args(["--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"verdict\": \"pass\""))
        .stdout(predicate::str::contains("\"objects\": 5"));
}

#[test]
fn verify_parallel_jobs_succeeds() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path()).args(["--jobs", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total objects: 5"));
}

#[test]
fn verify_dataset_dir_from_env() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").env("YOLO_VERIFY_DATASET", temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[OK] Dataset looks good."));
}

#[test]
fn verify_unsupported_output_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_valid_dataset(temp.path());

    let mut cmd = Command::cargo_bin("yolo-verify").unwrap();
    cmd.arg("verify").arg(temp.path()).args(["--output", "yaml"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported output format"));
}
