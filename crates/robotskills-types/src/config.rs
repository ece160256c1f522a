//! Global configuration types for RobotSkills.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! API listener, automated review thresholds, and post-transition hooks.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.robotskills/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub revalidation: RevalidationConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Thresholds used by the automated platform review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Packages above this size fail the automated review.
    #[serde(default = "default_max_package_bytes")]
    pub max_package_bytes: u64,

    /// Fewer screenshots than this produce an informational finding.
    #[serde(default = "default_min_recommended_screenshots")]
    pub min_recommended_screenshots: usize,

    /// Treat pre-release versions (`1.0.0-beta.1`) as errors instead of warnings.
    #[serde(default)]
    pub reject_prerelease: bool,
}

fn default_max_package_bytes() -> u64 {
    512 * 1024 * 1024
}

fn default_min_recommended_screenshots() -> usize {
    3
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_package_bytes: default_max_package_bytes(),
            min_recommended_screenshots: default_min_recommended_screenshots(),
            reject_prerelease: false,
        }
    }
}

/// Storefront cache revalidation webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevalidationConfig {
    /// Endpoint receiving `POST {"paths": [...]}`. Disabled when absent.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the shared secret sent as `x-revalidate-secret`.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_secret_env() -> String {
    "ROBOTSKILLS_REVALIDATE_SECRET".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for RevalidationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            secret_env: default_secret_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Developer notifications written on every transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
