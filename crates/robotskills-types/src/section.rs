//! Section payload types.
//!
//! A submission is authored in five sections. Each section is validated
//! independently and replaced wholesale on every edit; the types here are the
//! normalized output of the validators in `robotskills-core::validation`.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Declares a lowercase string enum with `ALL`, `as_str`, Display and FromStr.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Comma-separated list of accepted values, for error messages.
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("invalid {}: '{other}'", $label)),
                }
            }
        }
    };
}

string_enum!(
    /// The five independently validated parts of a submission.
    SectionKind, "section kind" {
        Identity => "identity",
        Assets => "assets",
        Compatibility => "compatibility",
        Permissions => "permissions",
        Package => "package",
    }
);

string_enum!(
    /// Storefront category of a skill.
    SkillCategory, "category" {
        Navigation => "navigation",
        Manipulation => "manipulation",
        Voice => "voice",
        Vision => "vision",
        Entertainment => "entertainment",
        Education => "education",
        Utility => "utility",
        Security => "security",
    }
);

string_enum!(
    /// Hardware a skill needs on the robot.
    Hardware, "hardware" {
        Camera => "camera",
        Lidar => "lidar",
        Microphone => "microphone",
        Speaker => "speaker",
        Arm => "arm",
        Wheels => "wheels",
        Display => "display",
        TouchSensor => "touch_sensor",
    }
);

string_enum!(
    /// Runtime permissions a skill may request from the robot owner.
    Permission, "permission" {
        Camera => "camera",
        Microphone => "microphone",
        Location => "location",
        Network => "network",
        MotionControl => "motion_control",
        PersonalData => "personal_data",
        Contacts => "contacts",
        Speaker => "speaker",
    }
);

string_enum!(
    /// Execution runtime of the skill package.
    Runtime, "runtime" {
        Python => "python",
        Wasm => "wasm",
        Ros2 => "ros2",
        Native => "native",
    }
);

impl SectionKind {
    pub const COUNT: usize = 5;
}

impl Permission {
    /// Permissions touching personal data; these require a privacy policy.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Permission::Camera
                | Permission::Microphone
                | Permission::Location
                | Permission::PersonalData
                | Permission::Contacts
        )
    }

    /// Hardware that must be declared for this permission to be meaningful.
    pub fn required_hardware(&self) -> Option<Hardware> {
        match self {
            Permission::Camera => Some(Hardware::Camera),
            Permission::Microphone => Some(Hardware::Microphone),
            Permission::Speaker => Some(Hardware::Speaker),
            _ => None,
        }
    }
}

/// Public identity of the skill version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySection {
    pub name: String,
    /// URL-safe storefront slug.
    pub slug: String,
    pub summary: String,
    pub description: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub version: Version,
}

/// Storefront media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsSection {
    pub icon_url: String,
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// One supported robot model and firmware range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotCompatibility {
    pub oem: String,
    pub model: String,
    pub min_firmware: Version,
    /// Inclusive upper bound; open-ended when absent.
    #[serde(default)]
    pub max_firmware: Option<Version>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilitySection {
    pub robots: Vec<RobotCompatibility>,
    #[serde(default)]
    pub required_hardware: Vec<Hardware>,
}

impl CompatibilitySection {
    pub fn requires(&self, hardware: Hardware) -> bool {
        self.required_hardware.contains(&hardware)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub permission: Permission,
    /// Why the skill needs it, shown to the robot owner at install time.
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionsSection {
    #[serde(default)]
    pub permissions: Vec<PermissionRequest>,
    #[serde(default)]
    pub collects_data: bool,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
}

impl PermissionsSection {
    pub fn requests(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|p| p.permission == permission)
    }

    pub fn has_sensitive(&self) -> bool {
        self.permissions.iter().any(|p| p.permission.is_sensitive())
    }
}

/// The uploaded skill artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSection {
    pub artifact_url: String,
    /// Lowercase hex SHA-256 of the artifact.
    pub sha256: String,
    pub size_bytes: u64,
    pub runtime: Runtime,
    pub entrypoint: String,
    pub min_sdk: Version,
}

/// A validated section payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionPayload {
    Identity(IdentitySection),
    Assets(AssetsSection),
    Compatibility(CompatibilitySection),
    Permissions(PermissionsSection),
    Package(PackageSection),
}

impl SectionPayload {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionPayload::Identity(_) => SectionKind::Identity,
            SectionPayload::Assets(_) => SectionKind::Assets,
            SectionPayload::Compatibility(_) => SectionKind::Compatibility,
            SectionPayload::Permissions(_) => SectionKind::Permissions,
            SectionPayload::Package(_) => SectionKind::Package,
        }
    }

    /// The section's fields as an untyped JSON object (no kind tag).
    pub fn to_value(&self) -> serde_json::Value {
        let result = match self {
            SectionPayload::Identity(s) => serde_json::to_value(s),
            SectionPayload::Assets(s) => serde_json::to_value(s),
            SectionPayload::Compatibility(s) => serde_json::to_value(s),
            SectionPayload::Permissions(s) => serde_json::to_value(s),
            SectionPayload::Package(s) => serde_json::to_value(s),
        };
        result.unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild a payload from stored fields whose kind is known out-of-band.
    pub fn from_value(
        kind: SectionKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            SectionKind::Identity => SectionPayload::Identity(serde_json::from_value(value)?),
            SectionKind::Assets => SectionPayload::Assets(serde_json::from_value(value)?),
            SectionKind::Compatibility => {
                SectionPayload::Compatibility(serde_json::from_value(value)?)
            }
            SectionKind::Permissions => {
                SectionPayload::Permissions(serde_json::from_value(value)?)
            }
            SectionKind::Package => SectionPayload::Package(serde_json::from_value(value)?),
        })
    }
}
