// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Session configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do with an instance whose definition cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Drop the instance, record an issue, keep going
    #[default]
    Skip,
    /// Abort the pass on the first unresolved reference
    Fail,
}

impl ReferencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferencePolicy::Skip => "skip",
            ReferencePolicy::Fail => "fail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Some(ReferencePolicy::Skip),
            "fail" | "strict" => Some(ReferencePolicy::Fail),
            _ => None,
        }
    }
}

/// Configuration shared by one import or export session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Carry surface tessellation meshes through import
    pub include_meshes: bool,
    /// Handling of unresolved instance references
    pub reference_policy: ReferencePolicy,
    /// Emit a warning for every recorded issue
    pub log_issues: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            include_meshes: false,
            reference_policy: ReferencePolicy::Skip,
            log_issues: true,
        }
    }
}

impl SessionConfig {
    /// Strict configuration: any unresolved reference fails the pass
    pub fn strict() -> Self {
        Self {
            reference_policy: ReferencePolicy::Fail,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: SessionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `scene.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("scene.toml").exists() {
            Self::from_file("scene.toml")?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(include) = std::env::var("SCENE_INCLUDE_MESHES") {
            self.include_meshes = include.parse().unwrap_or(self.include_meshes);
        }

        if let Ok(policy) = std::env::var("SCENE_REFERENCE_POLICY") {
            if let Some(policy) = ReferencePolicy::from_str(&policy) {
                self.reference_policy = policy;
            }
        }

        if let Ok(log) = std::env::var("SCENE_LOG_ISSUES") {
            self.log_issues = log.parse().unwrap_or(self.log_issues);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
