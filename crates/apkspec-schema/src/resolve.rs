//! Stage 2: raw mapping to typed [`BuildDescriptor`].
//!
//! Resolution never stops at the first problem: every malformed field is
//! recorded and the full list is returned in one pass. Fields that fail to
//! resolve get placeholder values inside the partially built descriptor, but
//! that descriptor is only returned when the error list is empty.

use crate::descriptor::{BuildDescriptor, Orientation, Requirement, Version};
use crate::loader::RawManifest;
use crate::schema::{self, FieldSpec};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// A single field-level type or shape mismatch.
///
/// Display renders the reason only; the field name is exposed separately via
/// [`ResolutionError::field`] so diagnostics do not repeat it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("required field is missing")]
    Missing { field: &'static str },
    #[error("not semantic: '{value}' (expected major.minor.patch)")]
    NotSemantic { field: &'static str, value: String },
    #[error("unknown enum value '{value}'")]
    UnknownEnumValue { field: &'static str, value: String },
    #[error("not an integer: '{value}'")]
    NotAnInteger { field: &'static str, value: String },
    #[error("value {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("not a boolean: '{value}' (expected true/false/1/0/yes/no)")]
    NotBoolean { field: &'static str, value: String },
    #[error("'{value}' is not a lowercase identifier")]
    BadIdentifier { field: &'static str, value: String },
    #[error("'{value}' is not a dotted domain identifier")]
    BadDomain { field: &'static str, value: String },
    #[error("'{value}' is not a bare lowercase file extension")]
    BadExtension { field: &'static str, value: String },
    #[error("malformed requirement '{value}'")]
    BadRequirement { field: &'static str, value: String },
}

impl ResolutionError {
    /// The schema field this error is addressed to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NotSemantic { field, .. }
            | Self::UnknownEnumValue { field, .. }
            | Self::NotAnInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotBoolean { field, .. }
            | Self::BadIdentifier { field, .. }
            | Self::BadDomain { field, .. }
            | Self::BadExtension { field, .. }
            | Self::BadRequirement { field, .. } => field,
        }
    }
}

/// Resolve a raw mapping into a typed descriptor, or the complete list of
/// field-level errors.
pub fn resolve(raw: &RawManifest) -> Result<BuildDescriptor, Vec<ResolutionError>> {
    let mut r = Resolver {
        manifest: raw,
        errors: Vec::new(),
    };

    let descriptor = BuildDescriptor {
        title: r.required_text(&schema::TITLE),
        package_name: r.package_name(),
        package_domain: r.package_domain(),
        version: r.version(),
        source_dir: PathBuf::from(r.text_or_default(&schema::SOURCE_DIR)),
        entry_point: r.required_text(&schema::SOURCE_MAIN),
        include_exts: r.extensions(),
        requirements: r.requirements(),
        orientation: r.orientation(),
        fullscreen: r.boolean(&schema::FULLSCREEN),
        permissions: r.enum_set(&schema::ANDROID_PERMISSIONS),
        api_level: r.unsigned(&schema::ANDROID_API, 1, 100),
        min_api_level: r.unsigned(&schema::ANDROID_MINAPI, 1, 100),
        sdk_version: r.unsigned(&schema::ANDROID_SDK, 1, 100),
        ndk_version: r.text_or_default(&schema::ANDROID_NDK),
        architectures: r.enum_set(&schema::ANDROID_ARCHS),
        enable_androidx: r.boolean(&schema::ANDROID_ENABLE_ANDROIDX),
        accept_sdk_license: r.boolean(&schema::ANDROID_ACCEPT_SDK_LICENSE),
        gradle_dependencies: r.verbatim_list(&schema::ANDROID_GRADLE_DEPENDENCIES),
        icon: r.optional_path(&schema::ICON_FILENAME),
        presplash: r.optional_path(&schema::PRESPLASH_FILENAME),
        log_level: r.log_level(),
        warn_on_root: r.boolean(&schema::WARN_ON_ROOT),
    };

    if r.errors.is_empty() {
        Ok(descriptor)
    } else {
        Err(r.errors)
    }
}

struct Resolver<'a> {
    manifest: &'a RawManifest,
    errors: Vec<ResolutionError>,
}

/// Split a joined list value on commas, trimming fragments and discarding
/// empty ones (continuation joining may produce doubled commas).
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl<'a> Resolver<'a> {
    /// The effective raw value for a field: the manifest entry if present and
    /// non-empty (an empty value means "unset"), else the schema default.
    fn raw(&self, spec: &FieldSpec) -> Option<&'a str> {
        match self.manifest.get(spec.section, spec.key) {
            Some(value) if !value.is_empty() => Some(value),
            _ => spec.default,
        }
    }

    fn required_text(&mut self, spec: &'static FieldSpec) -> String {
        match self.raw(spec) {
            Some(value) => value.to_owned(),
            None => {
                self.errors.push(ResolutionError::Missing { field: spec.name() });
                String::new()
            }
        }
    }

    fn text_or_default(&self, spec: &'static FieldSpec) -> String {
        // Only called for fields whose schema entry carries a default.
        self.raw(spec).unwrap_or_default().to_owned()
    }

    fn optional_path(&self, spec: &'static FieldSpec) -> Option<PathBuf> {
        self.raw(spec).map(PathBuf::from)
    }

    fn package_name(&mut self) -> String {
        let value = self.required_text(&schema::PACKAGE_NAME);
        let ok = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !value.is_empty() && !ok {
            self.errors.push(ResolutionError::BadIdentifier {
                field: schema::PACKAGE_NAME.name(),
                value: value.clone(),
            });
        }
        value
    }

    fn package_domain(&mut self) -> String {
        let value = self.required_text(&schema::PACKAGE_DOMAIN);
        if value.is_empty() {
            return value;
        }
        let mut segments = value.split('.');
        let ok = value.split('.').count() >= 2
            && segments.all(|seg| {
                !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !ok {
            self.errors.push(ResolutionError::BadDomain {
                field: schema::PACKAGE_DOMAIN.name(),
                value: value.clone(),
            });
        }
        value
    }

    fn version(&mut self) -> Version {
        let Some(raw) = self.raw(&schema::VERSION) else {
            self.errors.push(ResolutionError::Missing {
                field: schema::VERSION.name(),
            });
            return Version::new(0, 0, 0);
        };
        raw.parse().unwrap_or_else(|()| {
            self.errors.push(ResolutionError::NotSemantic {
                field: schema::VERSION.name(),
                value: raw.to_owned(),
            });
            Version::new(0, 0, 0)
        })
    }

    fn extensions(&mut self) -> BTreeSet<String> {
        let mut exts = BTreeSet::new();
        let Some(raw) = self.raw(&schema::SOURCE_INCLUDE_EXTS) else {
            return exts;
        };
        for ext in split_list(raw) {
            let lowered = ext.to_ascii_lowercase();
            let ok = !lowered.starts_with('.')
                && lowered
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
            if ok {
                exts.insert(lowered);
            } else {
                self.errors.push(ResolutionError::BadExtension {
                    field: schema::SOURCE_INCLUDE_EXTS.name(),
                    value: ext.to_owned(),
                });
            }
        }
        exts
    }

    fn requirements(&mut self) -> Vec<Requirement> {
        let Some(raw) = self.raw(&schema::REQUIREMENTS) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for entry in split_list(raw) {
            match parse_requirement(entry) {
                Some(req) => out.push(req),
                None => self.errors.push(ResolutionError::BadRequirement {
                    field: schema::REQUIREMENTS.name(),
                    value: entry.to_owned(),
                }),
            }
        }
        out
    }

    fn orientation(&mut self) -> Orientation {
        // Schema default guarantees a value.
        let Some(raw) = self.raw(&schema::ORIENTATION) else {
            return Orientation::Portrait;
        };
        raw.parse().unwrap_or_else(|()| {
            self.errors.push(ResolutionError::UnknownEnumValue {
                field: schema::ORIENTATION.name(),
                value: raw.to_owned(),
            });
            Orientation::Portrait
        })
    }

    fn boolean(&mut self, spec: &'static FieldSpec) -> bool {
        let Some(raw) = self.raw(spec) else {
            return false;
        };
        schema::parse_bool(raw).unwrap_or_else(|| {
            self.errors.push(ResolutionError::NotBoolean {
                field: spec.name(),
                value: raw.to_owned(),
            });
            spec.default.and_then(schema::parse_bool).unwrap_or(false)
        })
    }

    fn integer(&mut self, spec: &'static FieldSpec, min: i64, max: i64) -> i64 {
        let fallback = spec.default.and_then(|d| d.parse().ok()).unwrap_or(min);
        let Some(raw) = self.raw(spec) else {
            return fallback;
        };
        let Ok(value) = raw.parse::<i64>() else {
            self.errors.push(ResolutionError::NotAnInteger {
                field: spec.name(),
                value: raw.to_owned(),
            });
            return fallback;
        };
        if value < min || value > max {
            self.errors.push(ResolutionError::OutOfRange {
                field: spec.name(),
                value,
                min,
                max,
            });
            return fallback;
        }
        value
    }

    fn unsigned(&mut self, spec: &'static FieldSpec, min: u32, max: u32) -> u32 {
        let value = self.integer(spec, i64::from(min), i64::from(max));
        u32::try_from(value).unwrap_or(min)
    }

    fn log_level(&mut self) -> u8 {
        let value = self.integer(&schema::LOG_LEVEL, 0, 2);
        u8::try_from(value).unwrap_or(0)
    }

    fn verbatim_list(&mut self, spec: &'static FieldSpec) -> Vec<String> {
        match self.raw(spec) {
            Some(raw) => split_list(raw).map(str::to_owned).collect(),
            None => Vec::new(),
        }
    }

    fn enum_set<T>(&mut self, spec: &'static FieldSpec) -> BTreeSet<T>
    where
        T: FromStr<Err = ()> + Ord,
    {
        let mut set = BTreeSet::new();
        let Some(raw) = self.raw(spec) else {
            return set;
        };
        for entry in split_list(raw) {
            match entry.parse() {
                Ok(value) => {
                    set.insert(value);
                }
                Err(()) => self.errors.push(ResolutionError::UnknownEnumValue {
                    field: spec.name(),
                    value: entry.to_owned(),
                }),
            }
        }
        set
    }
}

fn parse_requirement(entry: &str) -> Option<Requirement> {
    let (name, version) = match entry.split_once("==") {
        Some((name, version)) => {
            let name = name.trim();
            let version = version.trim();
            if name.is_empty() || version.is_empty() {
                return None;
            }
            (name, Some(version.to_owned()))
        }
        None => (entry, None),
    };
    if name.chars().any(char::is_whitespace) {
        return None;
    }
    Some(Requirement {
        name: name.to_owned(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Arch, Permission};
    use crate::loader::load_str;

    fn resolve_text(input: &str) -> Result<BuildDescriptor, Vec<ResolutionError>> {
        resolve(&load_str(input).expect("manifest text should parse"))
    }

    const MINIMAL: &str = "[app]\ntitle = App\npackage.name = app\npackage.domain = org.example\nsource.main = main.py\nversion = 1.0.0\n";

    #[test]
    fn minimal_manifest_gets_defaults() {
        let d = resolve_text(MINIMAL).expect("should resolve");
        assert_eq!(d.source_dir, PathBuf::from("."));
        assert_eq!(d.orientation, Orientation::Portrait);
        assert!(!d.fullscreen);
        assert_eq!(d.api_level, 33);
        assert_eq!(d.min_api_level, 21);
        assert_eq!(d.sdk_version, 33);
        assert_eq!(d.ndk_version, "25b");
        assert_eq!(d.log_level, 2);
        assert!(d.warn_on_root);
        assert!(d.permissions.is_empty());
        assert!(d.requirements.is_empty());
        let archs: Vec<_> = d.architectures.iter().map(|a| a.as_str()).collect();
        assert_eq!(archs, vec!["armeabi-v7a", "arm64-v8a"]);
        let exts: Vec<_> = d.include_exts.iter().map(String::as_str).collect();
        assert_eq!(exts, vec!["atlas", "jpg", "kv", "png", "py"]);
    }

    #[test]
    fn missing_required_fields_are_each_reported() {
        let errors = resolve_text("[app]\ntitle = App\n").unwrap_err();
        let missing: Vec<_> = errors.iter().map(ResolutionError::field).collect();
        assert_eq!(
            missing,
            vec!["package.name", "package.domain", "version", "source.main"]
        );
        assert!(errors
            .iter()
            .all(|e| matches!(e, ResolutionError::Missing { .. })));
    }

    #[test]
    fn two_component_version_is_not_semantic() {
        let errors = resolve_text(&MINIMAL.replace("1.0.0", "1.0")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ResolutionError::NotSemantic { field: "version", value } if value == "1.0"
        ));
    }

    #[test]
    fn scenario_valid_android_block() {
        let input = format!(
            "{MINIMAL}android.api = 33\nandroid.minapi = 21\nandroid.archs = arm64-v8a, armeabi-v7a\nandroid.permissions = RECORD_AUDIO, INTERNET\n"
        );
        let d = resolve_text(&input).expect("should resolve");
        assert_eq!(d.version, Version::new(1, 0, 0));
        assert!(d.architectures.contains(&Arch::Arm64V8a));
        assert!(d.architectures.contains(&Arch::ArmeabiV7a));
        assert_eq!(d.architectures.len(), 2);
        assert!(d.permissions.contains(&Permission::RecordAudio));
        assert!(d.permissions.contains(&Permission::Internet));
        assert_eq!(d.permissions.len(), 2);
    }

    #[test]
    fn permission_casing_is_ignored_but_set_is_closed() {
        let ok = resolve_text(&format!("{MINIMAL}android.permissions = record_audio\n"));
        assert!(ok.is_ok());
        let errors =
            resolve_text(&format!("{MINIMAL}android.permissions = RECORD_AUDI\n")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::UnknownEnumValue { field: "android.permissions", value } if value == "RECORD_AUDI"
        ));
    }

    #[test]
    fn requirements_preserve_declaration_order() {
        let input = format!("{MINIMAL}requirements = python3,kivy==2.3.0,kivymd,numpy\n");
        let d = resolve_text(&input).unwrap();
        let names: Vec<_> = d.requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["python3", "kivy", "kivymd", "numpy"]);
        assert_eq!(d.requirements[1].version.as_deref(), Some("2.3.0"));
    }

    #[test]
    fn dangling_requirement_pin_is_malformed() {
        let errors = resolve_text(&format!("{MINIMAL}requirements = kivy==\n")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::BadRequirement { value, .. } if value == "kivy=="
        ));
    }

    #[test]
    fn uppercase_package_name_is_rejected() {
        let errors = resolve_text(&MINIMAL.replace("= app", "= MyApp")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::BadIdentifier { field: "package.name", .. }
        ));
    }

    #[test]
    fn undotted_domain_is_rejected() {
        let errors = resolve_text(&MINIMAL.replace("org.example", "example")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::BadDomain { field: "package.domain", .. }
        ));
    }

    #[test]
    fn leading_dot_extension_is_rejected() {
        let errors =
            resolve_text(&format!("{MINIMAL}source.include_exts = py,.png\n")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::BadExtension { value, .. } if value == ".png"
        ));
    }

    #[test]
    fn log_level_bounds_are_enforced() {
        let input = format!("{MINIMAL}\n[buildozer]\nlog_level = 3\n");
        let errors = resolve_text(&input).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::OutOfRange { field: "log_level", value: 3, min: 0, max: 2 }
        ));
    }

    #[test]
    fn non_numeric_api_level_is_an_error() {
        let errors = resolve_text(&format!("{MINIMAL}android.api = latest\n")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::NotAnInteger { field: "android.api", value } if value == "latest"
        ));
    }

    #[test]
    fn boolean_tokens_accepted_and_rejected() {
        let d = resolve_text(&format!("{MINIMAL}fullscreen = YES\n")).unwrap();
        assert!(d.fullscreen);
        let errors = resolve_text(&format!("{MINIMAL}fullscreen = definitely\n")).unwrap_err();
        assert!(matches!(
            &errors[0],
            ResolutionError::NotBoolean { field: "fullscreen", .. }
        ));
    }

    #[test]
    fn gradle_dependencies_keep_order_and_text() {
        let input = format!(
            "{MINIMAL}android.gradle_dependencies = com.google.firebase:firebase-core:21.1.1, androidx.appcompat:appcompat:1.6.1\n"
        );
        let d = resolve_text(&input).unwrap();
        assert_eq!(
            d.gradle_dependencies,
            vec![
                "com.google.firebase:firebase-core:21.1.1",
                "androidx.appcompat:appcompat:1.6.1"
            ]
        );
    }

    #[test]
    fn empty_optional_value_falls_back_to_default() {
        let d = resolve_text(&format!("{MINIMAL}orientation =\n")).unwrap();
        assert_eq!(d.orientation, Orientation::Portrait);
        assert!(d.icon.is_none());
    }

    #[test]
    fn error_collection_is_exhaustive_across_fields() {
        let input = "[app]\ntitle = App\npackage.name = BAD NAME\npackage.domain = nodots\nsource.main = main.py\nversion = 1.0\norientation = sideways\nandroid.api = many\n";
        let errors = resolve_text(input).unwrap_err();
        let fields: Vec<_> = errors.iter().map(ResolutionError::field).collect();
        assert_eq!(
            fields,
            vec![
                "package.name",
                "package.domain",
                "version",
                "orientation",
                "android.api"
            ]
        );
    }
}
