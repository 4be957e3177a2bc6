//! The unified diagnostic surface: every pipeline failure renders into an
//! ordered list of stage-tagged, field-addressed records.

use crate::loader::ParseError;
use crate::resolve::ResolutionError;
use crate::validate::ConsistencyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Loader,
    Resolver,
    Validator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loader => "loader",
            Self::Resolver => "resolver",
            Self::Validator => "validator",
        })
    }
}

/// One user-facing problem report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {field}: {}", self.stage, self.message),
            None => write!(f, "{}: {}", self.stage, self.message),
        }
    }
}

/// Non-empty ordered list of diagnostics, one complete report per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false in practice: a `Diagnostics` is only constructed from a
    /// failed stage.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }

    pub(crate) fn from_resolution(errors: Vec<ResolutionError>) -> Self {
        Self(
            errors
                .into_iter()
                .map(|e| Diagnostic {
                    stage: Stage::Resolver,
                    field: Some(e.field().to_owned()),
                    message: e.to_string(),
                })
                .collect(),
        )
    }

    pub(crate) fn from_consistency(errors: Vec<ConsistencyError>) -> Self {
        Self(
            errors
                .into_iter()
                .map(|e| Diagnostic {
                    stage: Stage::Validator,
                    field: Some(e.field().to_owned()),
                    message: e.to_string(),
                })
                .collect(),
        )
    }
}

impl From<ParseError> for Diagnostics {
    fn from(error: ParseError) -> Self {
        Self(vec![Diagnostic {
            stage: Stage::Loader,
            field: None,
            message: error.to_string(),
        }])
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for diagnostic in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
