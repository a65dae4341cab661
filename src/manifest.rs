//! Asset manifest
//!
//! The runtime loader consumes a manifest mapping each lazily loaded
//! engine to the artifacts it must fetch. Route bundles are special: the
//! application's startup sequence blocks readiness until every route
//! bundle has loaded, so the manifest exposes them directly.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ComposeResult;
use crate::tree::AssetTree;

/// Kind of a bundled asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleAssetKind {
    Js,
    Css,
}

impl BundleAssetKind {
    fn from_uri(uri: &str) -> Self {
        if uri.ends_with(".css") {
            BundleAssetKind::Css
        } else {
            BundleAssetKind::Js
        }
    }
}

/// One artifact belonging to a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAsset {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: BundleAssetKind,
    /// SHA256 content digest, when the artifact was present at compose time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// A lazily loadable engine's artifact set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub assets: Vec<BundleAsset>,
}

/// Mapping from engine name to its bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub bundles: BTreeMap<String, Bundle>,
}

static ROUTES_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"routes(-[a-z0-9]+)?\.js$").expect("static regex"));

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle, stamping digests from the artifact tree
    pub fn add_bundle(&mut self, name: impl Into<String>, uris: &[String], artifacts: &AssetTree) {
        let assets = uris
            .iter()
            .map(|uri| BundleAsset {
                uri: uri.clone(),
                kind: BundleAssetKind::from_uri(uri),
                digest: artifacts.content_hash(uri),
            })
            .collect();
        self.bundles.insert(name.into(), Bundle { assets });
    }

    /// Fold another manifest's bundles into this one; later entries win
    pub fn merge(&mut self, other: AssetManifest) {
        self.bundles.extend(other.bundles);
    }

    /// URIs of every route bundle the loader must fetch before startup
    pub fn route_bundle_uris(&self) -> Vec<String> {
        self.bundles
            .values()
            .flat_map(|bundle| &bundle.assets)
            .filter(|asset| asset.kind == BundleAssetKind::Js && ROUTES_FILE.is_match(&asset.uri))
            .map(|asset| asset.uri.clone())
            .collect()
    }

    pub fn to_json(&self) -> ComposeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
