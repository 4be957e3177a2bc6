//! Stage 3: cross-field consistency checks over a resolved descriptor.
//!
//! Pure and side-effect-free. Whether `source.dir` or the entry point exist
//! on disk is the packaging toolchain's problem, checked with its own
//! diagnostics at build time; nothing here touches the filesystem.

use crate::descriptor::BuildDescriptor;
use std::collections::BTreeMap;
use thiserror::Error;

/// A violated cross-field invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("android.minapi ({min_api}) exceeds android.api ({api})")]
    MinApiAboveTarget { min_api: u32, api: u32 },
    #[error("requirement '{name}' is pinned to both {first} and {second}")]
    ConflictingRequirement {
        name: String,
        first: String,
        second: String,
    },
    #[error("at least one target architecture must be declared")]
    NoArchitectures,
    #[error("at least one packaged file extension must be declared")]
    NoIncludedExtensions,
}

impl ConsistencyError {
    /// The field the diagnostic is addressed to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MinApiAboveTarget { .. } => "android.minapi",
            Self::ConflictingRequirement { .. } => "requirements",
            Self::NoArchitectures => "android.archs",
            Self::NoIncludedExtensions => "source.include_exts",
        }
    }
}

/// Check every invariant, collecting all violations rather than stopping at
/// the first.
pub fn validate(descriptor: &BuildDescriptor) -> Result<(), Vec<ConsistencyError>> {
    let mut errors = Vec::new();

    if descriptor.min_api_level > descriptor.api_level {
        errors.push(ConsistencyError::MinApiAboveTarget {
            min_api: descriptor.min_api_level,
            api: descriptor.api_level,
        });
    }

    // Identical duplicates are tolerated; only differing exact pins for the
    // same (case-insensitive) name conflict. One report per name.
    let mut pins: BTreeMap<String, &str> = BTreeMap::new();
    let mut reported: Vec<String> = Vec::new();
    for req in &descriptor.requirements {
        let Some(version) = &req.version else {
            continue;
        };
        let key = req.key();
        match pins.get(&key) {
            Some(first) if *first != version.as_str() && !reported.contains(&key) => {
                errors.push(ConsistencyError::ConflictingRequirement {
                    name: req.name.clone(),
                    first: (*first).to_owned(),
                    second: version.clone(),
                });
                reported.push(key);
            }
            Some(_) => {}
            None => {
                pins.insert(key, version.as_str());
            }
        }
    }

    if descriptor.architectures.is_empty() {
        errors.push(ConsistencyError::NoArchitectures);
    }

    if descriptor.include_exts.is_empty() {
        errors.push(ConsistencyError::NoIncludedExtensions);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
