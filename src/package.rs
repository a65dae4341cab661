//! Package node data model
//!
//! A package is a unit of modular code with its own asset trees, nested in
//! a tree of packages rooted at a host application. Configuration is an
//! explicit immutable struct fixed at construction; composition logic only
//! reads it, nothing mutates it mid-build.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigWarning;
use crate::registry::AssetImport;
use crate::tree::AssetTree;

/// Loading-mode configuration for a package
///
/// `lazy_loading` is tri-state: `None` means the package never declared a
/// loading mode, which degrades to eager but must be surfaced to the
/// operator via [`PackageConfig::validate`]. `dynamically_loaded` is only
/// meaningful for lazy packages: when set, routing modules ship as a
/// separate fetchable artifact instead of being promoted into the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Unique package identifier within a build
    pub name: String,

    #[serde(default)]
    pub lazy_loading: Option<bool>,

    #[serde(default)]
    pub dynamically_loaded: bool,
}

impl PackageConfig {
    /// Create a configuration with no declared loading mode
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lazy_loading: None,
            dynamically_loaded: false,
        }
    }

    /// Effective loading mode; undeclared degrades to eager
    pub fn is_lazy(&self) -> bool {
        self.lazy_loading == Some(true)
    }

    /// Surface the undeclared-loading-mode warning, if applicable
    pub fn validate(&self) -> Option<ConfigWarning> {
        if self.lazy_loading.is_some() {
            return None;
        }
        Some(ConfigWarning {
            package: self.name.clone(),
            message: format!(
                "package '{}' must declare `lazy_loading` as true or false; defaulting to eager",
                self.name
            ),
            suggestion: Some("set `lazy_loading` in the package metadata".to_string()),
        })
    }
}

/// A package and its raw asset trees
///
/// Constructed once per build invocation from external package metadata and
/// immutable for the remainder of the build. All derived trees are
/// ephemeral values produced when an output is requested.
#[derive(Debug, Clone, Default)]
pub struct PackageNode {
    pub config: PackageConfig,

    /// Engine configuration settings, merged into children's at compose time
    pub settings: serde_json::Value,

    /// Own script modules, package-relative paths
    pub modules: AssetTree,

    /// Files this package contributes to the consuming engine's namespace
    pub app: AssetTree,

    /// Compiled styles
    pub styles: AssetTree,

    /// Public/static assets
    pub public: AssetTree,

    /// On-disk vendor directory whose contents are copied verbatim
    pub vendor_dir: Option<PathBuf>,

    /// Declared vendor asset imports
    pub imports: Vec<AssetImport>,

    pub children: Vec<PackageNode>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl PackageNode {
    pub fn new(config: PackageConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_lazy(&self) -> bool {
        self.config.is_lazy()
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_modules(mut self, modules: AssetTree) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_app(mut self, app: AssetTree) -> Self {
        self.app = app;
        self
    }

    pub fn with_styles(mut self, styles: AssetTree) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_public(mut self, public: AssetTree) -> Self {
        self.public = public;
        self
    }

    pub fn with_vendor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vendor_dir = Some(dir.into());
        self
    }

    pub fn with_import(mut self, import: AssetImport) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_child(mut self, child: PackageNode) -> Self {
        self.children.push(child);
        self
    }
}
