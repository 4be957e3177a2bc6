//! Manifest loading, resolution, and validation for apkspec.
//!
//! This crate is the schema layer of the build pipeline: raw section/key-value
//! manifest text is loaded into a `RawManifest`, resolved field-by-field into a
//! typed [`BuildDescriptor`], and checked against cross-field invariants. The
//! caller receives either a fully valid descriptor or the complete ordered list
//! of [`Diagnostic`]s; no partial descriptor ever escapes.
//!
//! Everything here is pure computation over the manifest text. Fetching the
//! declared requirements, invoking the NDK per architecture, and assembling the
//! package are the packaging toolchain's job, not ours.

pub mod descriptor;
pub mod diagnostics;
pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use descriptor::{Arch, BuildDescriptor, Orientation, Permission, Requirement, Version};
pub use diagnostics::{Diagnostic, Diagnostics, Stage};
pub use loader::{load_file, load_str, ParseError, RawManifest};
pub use resolve::{resolve, ResolutionError};
pub use schema::{FieldSpec, FIELDS};
pub use validate::{validate, ConsistencyError};

use std::fs;
use std::path::Path;

/// Run the full pipeline over manifest text: load, resolve, validate.
///
/// Loader failures short-circuit (no mapping means nothing downstream can
/// run); resolution and validation failures are each collected exhaustively
/// so one invocation reports every problem.
pub fn resolve_manifest_str(input: &str) -> Result<BuildDescriptor, Diagnostics> {
    let raw = load_str(input).map_err(Diagnostics::from)?;
    let descriptor = resolve(&raw).map_err(Diagnostics::from_resolution)?;
    validate(&descriptor).map_err(Diagnostics::from_consistency)?;
    Ok(descriptor)
}

/// Read a manifest file and run the full pipeline over its contents.
pub fn resolve_manifest_file(path: impl AsRef<Path>) -> Result<BuildDescriptor, Diagnostics> {
    let content = fs::read_to_string(path).map_err(|e| Diagnostics::from(ParseError::Io(e)))?;
    resolve_manifest_str(&content)
}
