//! artkeep-lib: core logic for the artkeep build-artifact manager.
//!
//! This crate provides the pieces the `artkeep` binary is built from:
//! - `manifest`: declared-artifact manifests (JSON lists of relative paths)
//! - `scan`: filesystem enumeration of actually-present artifacts
//! - `reconcile`: orphan deletion and empty-directory pruning
//! - `stage`: mtime-gated incremental copy of a built artifact
//! - `fetch`: the external cache-by-key fetch capability
//! - `prereq`: minimal-CI prerequisite resolution over meta-manifests
//! - `lock`: advisory per-root locking for mutating operations

pub mod fetch;
pub mod lock;
pub mod manifest;
pub mod prereq;
pub mod reconcile;
pub mod scan;
pub mod stage;
