//! Stage 1: raw manifest text to an unordered section/key/value mapping.
//!
//! The grammar is INI-like: `# comment` lines, `[section]` headers, and
//! `key = value` entries. A value may continue onto following indented lines;
//! fragments are trimmed and joined with a comma so that list-valued fields
//! split uniformly downstream. Continuation syntax never leaks out of this
//! module: resolvers only ever see fully joined values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: key-value entry before any section header: '{text}'")]
    EntryBeforeSection { line: usize, text: String },
    #[error("line {line}: continuation line before any key: '{text}'")]
    ContinuationBeforeKey { line: usize, text: String },
    #[error("line {line}: malformed section header: '{text}'")]
    MalformedSection { line: usize, text: String },
    #[error("line {line}: expected 'key = value': '{text}'")]
    MalformedEntry { line: usize, text: String },
}

/// Parsed but untyped manifest: section name to key to joined raw value.
///
/// Duplicate keys within a section keep the last occurrence, matching how
/// the packaging toolchain's own config reader treats the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawManifest {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl RawManifest {
    /// Look up a raw value. An empty value is present but means "unset" for
    /// optional fields, so callers filter it themselves.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

fn is_section_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Parse manifest text into a [`RawManifest`].
pub fn load_str(input: &str) -> Result<RawManifest, ParseError> {
    let mut manifest = RawManifest::default();
    // (section, key) of the entry a continuation line would extend.
    let mut current_section: Option<String> = None;
    let mut current_key: Option<String> = None;

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indented = raw_line.starts_with(' ') || raw_line.starts_with('\t');
        if indented {
            // Indented content extends the previous entry's value.
            let (Some(section), Some(key)) = (&current_section, &current_key) else {
                return Err(ParseError::ContinuationBeforeKey {
                    line,
                    text: trimmed.to_owned(),
                });
            };
            let entries = manifest
                .sections
                .entry(section.clone())
                .or_default();
            let value = entries.entry(key.clone()).or_default();
            if value.is_empty() {
                trimmed.clone_into(value);
            } else {
                value.push(',');
                value.push_str(trimmed);
            }
            continue;
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            let Some(name) = inner.strip_suffix(']') else {
                return Err(ParseError::MalformedSection {
                    line,
                    text: trimmed.to_owned(),
                });
            };
            if !is_section_name(name) {
                return Err(ParseError::MalformedSection {
                    line,
                    text: trimmed.to_owned(),
                });
            }
            manifest.sections.entry(name.to_owned()).or_default();
            current_section = Some(name.to_owned());
            current_key = None;
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(ParseError::MalformedEntry {
                    line,
                    text: trimmed.to_owned(),
                });
            }
            let Some(section) = &current_section else {
                return Err(ParseError::EntryBeforeSection {
                    line,
                    text: trimmed.to_owned(),
                });
            };
            manifest
                .sections
                .entry(section.clone())
                .or_default()
                .insert(key.to_owned(), value.to_owned());
            current_key = Some(key.to_owned());
            continue;
        }

        return Err(ParseError::MalformedEntry {
            line,
            text: trimmed.to_owned(),
        });
    }

    Ok(manifest)
}

/// Read and parse a manifest file.
pub fn load_file(path: impl AsRef<Path>) -> Result<RawManifest, ParseError> {
    let content = fs::read_to_string(path)?;
    load_str(&content)
}
