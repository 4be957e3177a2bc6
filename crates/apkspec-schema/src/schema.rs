//! The closed field schema: one declarative table of every key the manifest
//! may carry, with section, requiredness, and default. Both the resolver and
//! the CLI's `fields` listing iterate this table, so the accepted surface has
//! a single source of truth.

pub const APP: &str = "app";
pub const BUILDOZER: &str = "buildozer";

/// One entry in the field schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub section: &'static str,
    pub key: &'static str,
    pub required: bool,
    /// Raw-text default applied when the field is absent or empty. Required
    /// fields have none; optional fields without one resolve to "unset".
    pub default: Option<&'static str>,
    /// Expected shape, for user-facing listings.
    pub doc: &'static str,
}

impl FieldSpec {
    /// Fully qualified name used in diagnostics, e.g. `android.api`.
    pub fn name(&self) -> &'static str {
        self.key
    }
}

pub static TITLE: FieldSpec = FieldSpec {
    section: APP,
    key: "title",
    required: true,
    default: None,
    doc: "application display name",
};

pub static PACKAGE_NAME: FieldSpec = FieldSpec {
    section: APP,
    key: "package.name",
    required: true,
    default: None,
    doc: "lowercase package identifier ([a-z0-9_])",
};

pub static PACKAGE_DOMAIN: FieldSpec = FieldSpec {
    section: APP,
    key: "package.domain",
    required: true,
    default: None,
    doc: "reverse-DNS dotted identifier, e.g. org.example",
};

pub static VERSION: FieldSpec = FieldSpec {
    section: APP,
    key: "version",
    required: true,
    default: None,
    doc: "semantic version (major.minor.patch)",
};

pub static SOURCE_MAIN: FieldSpec = FieldSpec {
    section: APP,
    key: "source.main",
    required: true,
    default: None,
    doc: "entry point filename under source.dir",
};

pub static SOURCE_DIR: FieldSpec = FieldSpec {
    section: APP,
    key: "source.dir",
    required: false,
    default: Some("."),
    doc: "directory containing application source",
};

pub static SOURCE_INCLUDE_EXTS: FieldSpec = FieldSpec {
    section: APP,
    key: "source.include_exts",
    required: false,
    default: Some("py,png,jpg,kv,atlas"),
    doc: "comma list of packaged file extensions, no leading dot",
};

pub static REQUIREMENTS: FieldSpec = FieldSpec {
    section: APP,
    key: "requirements",
    required: false,
    default: None,
    doc: "ordered comma list of dependencies, name or name==version",
};

pub static ORIENTATION: FieldSpec = FieldSpec {
    section: APP,
    key: "orientation",
    required: false,
    default: Some("portrait"),
    doc: "portrait, landscape, or all",
};

pub static FULLSCREEN: FieldSpec = FieldSpec {
    section: APP,
    key: "fullscreen",
    required: false,
    default: Some("0"),
    doc: "boolean",
};

pub static ANDROID_PERMISSIONS: FieldSpec = FieldSpec {
    section: APP,
    key: "android.permissions",
    required: false,
    default: None,
    doc: "comma list of Android permission names",
};

pub static ANDROID_API: FieldSpec = FieldSpec {
    section: APP,
    key: "android.api",
    required: false,
    default: Some("33"),
    doc: "target API level (integer)",
};

pub static ANDROID_MINAPI: FieldSpec = FieldSpec {
    section: APP,
    key: "android.minapi",
    required: false,
    default: Some("21"),
    doc: "minimum API level (integer, at most android.api)",
};

pub static ANDROID_SDK: FieldSpec = FieldSpec {
    section: APP,
    key: "android.sdk",
    required: false,
    default: Some("33"),
    doc: "SDK version (integer)",
};

pub static ANDROID_NDK: FieldSpec = FieldSpec {
    section: APP,
    key: "android.ndk",
    required: false,
    default: Some("25b"),
    doc: "NDK release token, e.g. 25b",
};

pub static ANDROID_ARCHS: FieldSpec = FieldSpec {
    section: APP,
    key: "android.archs",
    required: false,
    default: Some("arm64-v8a,armeabi-v7a"),
    doc: "comma list of target architectures",
};

pub static ANDROID_ENABLE_ANDROIDX: FieldSpec = FieldSpec {
    section: APP,
    key: "android.enable_androidx",
    required: false,
    default: Some("0"),
    doc: "boolean",
};

pub static ANDROID_ACCEPT_SDK_LICENSE: FieldSpec = FieldSpec {
    section: APP,
    key: "android.accept_sdk_license",
    required: false,
    default: Some("0"),
    doc: "boolean",
};

pub static ANDROID_GRADLE_DEPENDENCIES: FieldSpec = FieldSpec {
    section: APP,
    key: "android.gradle_dependencies",
    required: false,
    default: None,
    doc: "comma list of Maven coordinates, order preserved",
};

pub static ICON_FILENAME: FieldSpec = FieldSpec {
    section: APP,
    key: "icon.filename",
    required: false,
    default: None,
    doc: "optional icon path",
};

pub static PRESPLASH_FILENAME: FieldSpec = FieldSpec {
    section: APP,
    key: "presplash.filename",
    required: false,
    default: None,
    doc: "optional presplash image path",
};

pub static LOG_LEVEL: FieldSpec = FieldSpec {
    section: BUILDOZER,
    key: "log_level",
    required: false,
    default: Some("2"),
    doc: "integer in [0, 2]",
};

pub static WARN_ON_ROOT: FieldSpec = FieldSpec {
    section: BUILDOZER,
    key: "warn_on_root",
    required: false,
    default: Some("1"),
    doc: "boolean",
};

/// Every field the schema knows, in manifest order.
pub static FIELDS: &[&FieldSpec] = &[
    &TITLE,
    &PACKAGE_NAME,
    &PACKAGE_DOMAIN,
    &VERSION,
    &SOURCE_DIR,
    &SOURCE_MAIN,
    &SOURCE_INCLUDE_EXTS,
    &REQUIREMENTS,
    &ORIENTATION,
    &FULLSCREEN,
    &ANDROID_PERMISSIONS,
    &ANDROID_API,
    &ANDROID_MINAPI,
    &ANDROID_SDK,
    &ANDROID_NDK,
    &ANDROID_ARCHS,
    &ANDROID_ENABLE_ANDROIDX,
    &ANDROID_ACCEPT_SDK_LICENSE,
    &ANDROID_GRADLE_DEPENDENCIES,
    &ICON_FILENAME,
    &PRESPLASH_FILENAME,
    &LOG_LEVEL,
    &WARN_ON_ROOT,
];

/// Case-insensitive boolean token set accepted by boolean fields.
pub fn parse_bool(value: &str) -> Option<bool> {
    const TRUE: &[&str] = &["true", "1", "yes"];
    const FALSE: &[&str] = &["false", "0", "no"];
    if TRUE.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}
