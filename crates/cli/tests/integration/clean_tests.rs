use predicates::prelude::*;

use super::common::{TestEnv, artkeep_cmd, exists, stdout_json};

#[test]
fn clean_removes_orphans_and_prunes_empty_dirs() {
  let env = TestEnv::new();
  env.touch_artifact("a/x.bin");
  env.touch_artifact("a/z.bin");
  std::fs::create_dir_all(env.root().join("a/empty")).unwrap();
  let manifest = env.write_manifest("manifest.json", &["a/x.bin", "a/y.bin"]);

  artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(&manifest)
    .assert()
    .success()
    .stdout(predicate::str::contains("a/z.bin"))
    .stdout(predicate::str::contains("Orphan cleanup complete"));

  let root = env.root();
  assert!(exists(&root, "a/x.bin"));
  assert!(!exists(&root, "a/z.bin"));
  assert!(!exists(&root, "a/empty"));
}

#[test]
fn clean_unions_public_and_private_manifests() {
  let env = TestEnv::new();
  env.touch_artifact("pub.bin");
  env.touch_artifact("priv.bin");
  env.touch_artifact("orphan.bin");
  let public = env.write_manifest("public.json", &["pub.bin"]);
  let private = env.write_manifest("private.json", &["priv.bin"]);

  artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(&public)
    .arg("--manifest")
    .arg(&private)
    .assert()
    .success();

  let root = env.root();
  assert!(exists(&root, "pub.bin"));
  assert!(exists(&root, "priv.bin"));
  assert!(!exists(&root, "orphan.bin"));
}

#[test]
fn clean_with_everything_declared_removes_nothing() {
  let env = TestEnv::new();
  env.touch_artifact("a/x.bin");
  let manifest = env.write_manifest("manifest.json", &["a/x.bin"]);

  artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(&manifest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Files removed: 0"));

  assert!(exists(&env.root(), "a/x.bin"));
}

#[test]
fn clean_dry_run_leaves_filesystem_untouched() {
  let env = TestEnv::new();
  env.touch_artifact("orphan.bin");
  let manifest = env.write_manifest("manifest.json", &[]);

  artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(&manifest)
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("orphan.bin"))
    .stdout(predicate::str::contains("Dry run"));

  assert!(exists(&env.root(), "orphan.bin"));
}

#[test]
fn clean_json_output_reports_stats_and_removed_set() {
  let env = TestEnv::new();
  env.touch_artifact("orphan.bin");
  let manifest = env.write_manifest("manifest.json", &[]);

  let output = artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(&manifest)
    .args(["-o", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let json = stdout_json(&output);
  assert_eq!(json["stats"]["files_removed"], 1);
  assert_eq!(json["removed"][0], "orphan.bin");
}

#[test]
fn clean_missing_manifest_fails_before_deleting() {
  let env = TestEnv::new();
  env.touch_artifact("orphan.bin");

  artkeep_cmd()
    .arg("clean")
    .arg("--root")
    .arg(env.root())
    .arg("--manifest")
    .arg(env.temp.path().join("missing.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to read manifest"));

  assert!(exists(&env.root(), "orphan.bin"));
}

#[test]
fn clean_twice_is_idempotent() {
  let env = TestEnv::new();
  env.touch_artifact("keep.bin");
  env.touch_artifact("orphan.bin");
  let manifest = env.write_manifest("manifest.json", &["keep.bin"]);

  for expected in ["Files removed: 1", "Files removed: 0"] {
    artkeep_cmd()
      .arg("clean")
      .arg("--root")
      .arg(env.root())
      .arg("--manifest")
      .arg(&manifest)
      .assert()
      .success()
      .stdout(predicate::str::contains(expected));
  }
}
