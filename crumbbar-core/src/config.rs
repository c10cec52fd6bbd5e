// SPDX-License-Identifier: LGPL-3.0-only
use crate::error::{BreadcrumbError, BreadcrumbResult};
use serde::Deserialize;
use std::path::Path;

/// Width margin required on top of the exact recovery width before every
/// collapsed item is restored at once.
pub const DEFAULT_RECOVERY_GRACE_WIDTH: f32 = 5.0;

/// Which primary item survives when a shrink would collapse every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// Keep the oldest item (logical index 0 of the primary view).
    #[default]
    KeepFirst,
    /// Keep the most recent item.
    KeepLast,
}

impl RetentionPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "keep-first" | "keep_first" | "first" => Some(Self::KeepFirst),
            "keep-last" | "keep_last" | "last" => Some(Self::KeepLast),
            _ => None,
        }
    }
}

/// Breadcrumb bar configuration.
///
/// Can be loaded from TOML and then adjusted through environment variables:
/// - `CRUMBBAR_RECOVERY_GRACE` - a non-negative width
/// - `CRUMBBAR_RETENTION` - `keep-first` (default) or `keep-last`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfig {
    /// Hysteresis margin used when deciding on a full recovery.
    pub recovery_grace_width: f32,
    /// Item kept when shrinking would otherwise empty the primary list.
    pub retention: RetentionPolicy,
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            recovery_grace_width: DEFAULT_RECOVERY_GRACE_WIDTH,
            retention: RetentionPolicy::default(),
        }
    }
}

impl BreadcrumbConfig {
    /// Parse a configuration from a TOML document.
    ///
    /// Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> BreadcrumbResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> BreadcrumbResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        log::debug!("Loading breadcrumb config from {:?}", path);
        Self::from_toml_str(&source)
    }

    /// Apply `CRUMBBAR_*` environment variable overrides.
    pub fn with_env_overrides(self) -> BreadcrumbResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup, using the same keys as
    /// [`with_env_overrides`](Self::with_env_overrides).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BreadcrumbResult<Self> {
        if let Some(value) = lookup("CRUMBBAR_RECOVERY_GRACE") {
            self.recovery_grace_width = value.trim().parse().map_err(|_| {
                BreadcrumbError::config(format!(
                    "CRUMBBAR_RECOVERY_GRACE must be a number, got {:?}",
                    value
                ))
            })?;
            log::info!("CRUMBBAR_RECOVERY_GRACE={} detected", value);
        }

        if let Some(value) = lookup("CRUMBBAR_RETENTION") {
            self.retention = RetentionPolicy::parse(&value).ok_or_else(|| {
                BreadcrumbError::config(format!(
                    "CRUMBBAR_RETENTION must be keep-first or keep-last, got {:?}",
                    value
                ))
            })?;
            log::info!("CRUMBBAR_RETENTION={} detected", value);
        }

        self.validated()
    }

    fn validated(self) -> BreadcrumbResult<Self> {
        if !self.recovery_grace_width.is_finite() || self.recovery_grace_width < 0.0 {
            return Err(BreadcrumbError::config(format!(
                "recovery_grace_width must be a finite, non-negative width, got {}",
                self.recovery_grace_width
            )));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BreadcrumbConfig::default();
        assert_eq!(config.recovery_grace_width, 5.0);
        assert_eq!(config.retention, RetentionPolicy::KeepFirst);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BreadcrumbConfig::from_toml_str("retention = \"keep-last\"").unwrap();
        assert_eq!(config.retention, RetentionPolicy::KeepLast);
        assert_eq!(config.recovery_grace_width, DEFAULT_RECOVERY_GRACE_WIDTH);
    }

    #[test]
    fn test_toml_rejects_negative_grace() {
        let err = BreadcrumbConfig::from_toml_str("recovery_grace_width = -1.0").unwrap_err();
        assert!(matches!(err, BreadcrumbError::Config { .. }));
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = BreadcrumbConfig::from_toml_str("recovery_grace_width = ").unwrap_err();
        assert!(matches!(err, BreadcrumbError::Toml(_)));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = BreadcrumbConfig::from_toml_str("max_layout_passes = 0").unwrap();
        assert_eq!(config, BreadcrumbConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = BreadcrumbConfig::default()
            .with_overrides(|key| match key {
                "CRUMBBAR_RECOVERY_GRACE" => Some("12.5".to_string()),
                "CRUMBBAR_RETENTION" => Some("Keep_Last".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.recovery_grace_width, 12.5);
        assert_eq!(config.retention, RetentionPolicy::KeepLast);
    }

    #[test]
    fn test_bad_override() {
        let result = BreadcrumbConfig::default().with_overrides(|key| {
            (key == "CRUMBBAR_RETENTION").then(|| "middle".to_string())
        });
        assert!(result.is_err());
    }
}
