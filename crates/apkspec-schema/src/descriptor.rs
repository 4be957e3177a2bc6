//! The typed build descriptor handed to the packaging toolchain, plus the
//! closed enumerations it is built from.
//!
//! Set-valued fields use `BTreeSet` and serialization is field-ordered, so an
//! accepted descriptor serializes byte-identically across runs.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resolved, validated build configuration. Immutable once validation
/// succeeds; constructed once per build invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub title: String,
    pub package_name: String,
    pub package_domain: String,
    pub version: Version,
    pub source_dir: PathBuf,
    pub entry_point: String,
    pub include_exts: BTreeSet<String>,
    /// Declaration order is preserved: the packaging toolchain installs
    /// requirements in the order they were written.
    pub requirements: Vec<Requirement>,
    pub orientation: Orientation,
    pub fullscreen: bool,
    pub permissions: BTreeSet<Permission>,
    pub api_level: u32,
    pub min_api_level: u32,
    pub sdk_version: u32,
    pub ndk_version: String,
    pub architectures: BTreeSet<Arch>,
    pub enable_androidx: bool,
    pub accept_sdk_license: bool,
    pub gradle_dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub presplash: Option<PathBuf>,
    pub log_level: u8,
    pub warn_on_root: bool,
}

impl BuildDescriptor {
    /// Deterministic JSON form consumed by the packaging toolchain.
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Three-component semantic version. Serializes as `major.minor.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let &[major, minor, patch] = parts.as_slice() else {
            return Err(());
        };
        let component = |p: &str| -> Result<u32, ()> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(());
            }
            p.parse().map_err(|_| ())
        };
        Ok(Self::new(component(major)?, component(minor)?, component(patch)?))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|()| D::Error::custom(format!("not a semantic version: '{s}'")))
    }
}

/// A declared dependency: a name with an optional exact version pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Stored verbatim for display; compared case-insensitively.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
}

impl Requirement {
    /// Lowercased name used when checking for duplicates.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}=={version}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Screen orientation the application locks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    All,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::All => "all",
        }
    }

    pub const ALL_VALUES: &'static [Self] = &[Self::Portrait, Self::Landscape, Self::All];
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_VALUES
            .iter()
            .copied()
            .find(|o| s.eq_ignore_ascii_case(o.as_str()))
            .ok_or(())
    }
}

/// Recognized target architecture (ABI) aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArmeabiV7a => "armeabi-v7a",
            Self::Arm64V8a => "arm64-v8a",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        }
    }

    pub const ALL_VALUES: &'static [Self] =
        &[Self::ArmeabiV7a, Self::Arm64V8a, Self::X86, Self::X86_64];
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_VALUES
            .iter()
            .copied()
            .find(|a| s.eq_ignore_ascii_case(a.as_str()))
            .ok_or(())
    }
}

/// The platform permission enumeration the manifest may draw from. Unknown
/// names are a resolution error, never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    AccessCoarseLocation,
    AccessFineLocation,
    AccessNetworkState,
    AccessWifiState,
    Bluetooth,
    BluetoothAdmin,
    BluetoothConnect,
    Camera,
    ForegroundService,
    Internet,
    ModifyAudioSettings,
    PostNotifications,
    ReadExternalStorage,
    ReceiveBootCompleted,
    RecordAudio,
    Vibrate,
    WakeLock,
    WriteExternalStorage,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessCoarseLocation => "ACCESS_COARSE_LOCATION",
            Self::AccessFineLocation => "ACCESS_FINE_LOCATION",
            Self::AccessNetworkState => "ACCESS_NETWORK_STATE",
            Self::AccessWifiState => "ACCESS_WIFI_STATE",
            Self::Bluetooth => "BLUETOOTH",
            Self::BluetoothAdmin => "BLUETOOTH_ADMIN",
            Self::BluetoothConnect => "BLUETOOTH_CONNECT",
            Self::Camera => "CAMERA",
            Self::ForegroundService => "FOREGROUND_SERVICE",
            Self::Internet => "INTERNET",
            Self::ModifyAudioSettings => "MODIFY_AUDIO_SETTINGS",
            Self::PostNotifications => "POST_NOTIFICATIONS",
            Self::ReadExternalStorage => "READ_EXTERNAL_STORAGE",
            Self::ReceiveBootCompleted => "RECEIVE_BOOT_COMPLETED",
            Self::RecordAudio => "RECORD_AUDIO",
            Self::Vibrate => "VIBRATE",
            Self::WakeLock => "WAKE_LOCK",
            Self::WriteExternalStorage => "WRITE_EXTERNAL_STORAGE",
        }
    }

    pub const ALL_VALUES: &'static [Self] = &[
        Self::AccessCoarseLocation,
        Self::AccessFineLocation,
        Self::AccessNetworkState,
        Self::AccessWifiState,
        Self::Bluetooth,
        Self::BluetoothAdmin,
        Self::BluetoothConnect,
        Self::Camera,
        Self::ForegroundService,
        Self::Internet,
        Self::ModifyAudioSettings,
        Self::PostNotifications,
        Self::ReadExternalStorage,
        Self::ReceiveBootCompleted,
        Self::RecordAudio,
        Self::Vibrate,
        Self::WakeLock,
        Self::WriteExternalStorage,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_VALUES
            .iter()
            .copied()
            .find(|p| s.eq_ignore_ascii_case(p.as_str()))
            .ok_or(())
    }
}
