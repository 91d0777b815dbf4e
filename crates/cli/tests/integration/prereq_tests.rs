use predicates::prelude::*;

use super::common::{TestEnv, artkeep_cmd};

#[test]
fn list_shows_fixed_and_matching_targets() {
  let env = TestEnv::new();
  let meta = env.write_manifest("meta.json", &["gen/mgen/foo.h", "docs/readme.md"]);

  artkeep_cmd()
    .arg("prereqs")
    .arg("--meta-manifest")
    .arg(&meta)
    .arg("--target")
    .arg("T1")
    .arg("--rule")
    .arg("gen/:/mgen/")
    .arg("--list")
    .assert()
    .success()
    .stdout(predicate::str::contains("T1"))
    .stdout(predicate::str::contains("gen/mgen/foo.h"))
    .stdout(predicate::str::contains("docs/readme.md").not());
}

#[test]
fn list_dedupes_across_partitions() {
  let env = TestEnv::new();
  let public = env.write_manifest("public.json", &["gen/mgen/shared.h"]);
  let private = env.write_manifest("private.json", &["gen/mgen/shared.h"]);

  let output = artkeep_cmd()
    .arg("prereqs")
    .arg("--meta-manifest")
    .arg(&public)
    .arg("--meta-manifest")
    .arg(&private)
    .arg("--rule")
    .arg("gen/:/mgen/")
    .arg("--list")
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let listed = String::from_utf8(output).unwrap();
  assert_eq!(listed.matches("gen/mgen/shared.h").count(), 1);
}

#[test]
#[cfg(unix)]
fn fetch_materializes_every_target() {
  let env = TestEnv::new();
  let workdir = env.temp.path().join("work");
  std::fs::create_dir_all(workdir.join("gen/mgen")).unwrap();
  let meta = env.write_manifest("meta.json", &["gen/mgen/foo.h", "docs/readme.md"]);

  artkeep_cmd()
    .arg("prereqs")
    .arg("--meta-manifest")
    .arg(&meta)
    .arg("--target")
    .arg("fixed.bin")
    .arg("--rule")
    .arg("gen/:/mgen/")
    .arg("--workdir")
    .arg(&workdir)
    .args(["--fetch-with", "touch"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Targets fetched: 2"));

  assert!(workdir.join("fixed.bin").exists());
  assert!(workdir.join("gen/mgen/foo.h").exists());
  assert!(!workdir.join("docs/readme.md").exists());
}

#[test]
#[cfg(unix)]
fn failing_fetch_aborts_with_nonzero_exit() {
  let env = TestEnv::new();
  let workdir = env.temp.path().join("work");
  std::fs::create_dir_all(&workdir).unwrap();
  let meta = env.write_manifest("meta.json", &[]);

  artkeep_cmd()
    .arg("prereqs")
    .arg("--meta-manifest")
    .arg(&meta)
    .arg("--target")
    .arg("needed.bin")
    .arg("--workdir")
    .arg(&workdir)
    .args(["--fetch-with", "false"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("needed.bin"));
}

#[test]
fn missing_meta_manifest_fails() {
  let env = TestEnv::new();

  artkeep_cmd()
    .arg("prereqs")
    .arg("--meta-manifest")
    .arg(env.temp.path().join("missing.json"))
    .arg("--list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to read manifest"));
}
