use filetime::FileTime;
use predicates::prelude::*;

use super::common::{TestEnv, artkeep_cmd, stdout_json};

#[test]
fn stage_copies_into_fresh_directory() {
  let env = TestEnv::new();
  let source = env.temp.path().join("lib.a");
  std::fs::write(&source, b"archive").unwrap();
  let dest = env.temp.path().join("stage");

  artkeep_cmd()
    .arg("stage")
    .arg(&source)
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Staged"));

  assert_eq!(std::fs::read(dest.join("lib.a")).unwrap(), b"archive");
}

#[test]
fn second_stage_is_a_no_op() {
  let env = TestEnv::new();
  let source = env.temp.path().join("lib.a");
  std::fs::write(&source, b"archive").unwrap();
  let dest = env.temp.path().join("stage");

  artkeep_cmd().arg("stage").arg(&source).arg(&dest).assert().success();

  artkeep_cmd()
    .arg("stage")
    .arg(&source)
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Already up to date"));
}

#[test]
fn stale_destination_is_overwritten() {
  let env = TestEnv::new();
  let source = env.temp.path().join("lib.a");
  let dest = env.temp.path().join("stage");
  std::fs::create_dir_all(&dest).unwrap();
  std::fs::write(&source, b"new").unwrap();
  std::fs::write(dest.join("lib.a"), b"old").unwrap();
  filetime::set_file_mtime(dest.join("lib.a"), FileTime::from_unix_time(100, 0)).unwrap();
  filetime::set_file_mtime(&source, FileTime::from_unix_time(500, 0)).unwrap();

  artkeep_cmd()
    .arg("stage")
    .arg(&source)
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Staged"));

  assert_eq!(std::fs::read(dest.join("lib.a")).unwrap(), b"new");
}

#[test]
fn stage_json_output_reports_copied_flag() {
  let env = TestEnv::new();
  let source = env.temp.path().join("lib.a");
  std::fs::write(&source, b"archive").unwrap();
  let dest = env.temp.path().join("stage");

  let first = artkeep_cmd()
    .arg("stage")
    .arg(&source)
    .arg(&dest)
    .args(["-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();
  assert_eq!(stdout_json(&first)["copied"], true);

  let second = artkeep_cmd()
    .arg("stage")
    .arg(&source)
    .arg(&dest)
    .args(["-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();
  assert_eq!(stdout_json(&second)["copied"], false);
}
