//! Named-output registry
//!
//! Maps logical output files ("the vendor script bundle") to the ordered
//! list of physical input files contributing to them. Ordering is the
//! concatenation order: imports are processed in declaration order, and a
//! prepended import is the only way to execute code before a vendor file.
//!
//! Import registration delegates along the package ancestry: each import
//! is recorded against the registry of the nearest lazy boundary (or the
//! root host), so a lazily loaded package's imports end up in its own
//! vendor bundle instead of leaking into the root's.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::package::PackageNode;
use crate::resolve;

/// Default vendor script output, relative to the engine's asset root
pub const DEFAULT_VENDOR_JS: &str = "/assets/engine-vendor.js";
/// Default vendor style output, relative to the engine's asset root
pub const DEFAULT_VENDOR_CSS: &str = "/assets/engine-vendor.css";

/// Which bundle family an import belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Script,
    Style,
}

impl ImportKind {
    /// Infer the kind from a file extension; everything non-CSS is script
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".css") {
            ImportKind::Style
        } else {
            ImportKind::Script
        }
    }
}

/// A vendor asset import declared in package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetImport {
    pub path: String,

    /// Insert at the front of the output's input list instead of appending
    #[serde(default)]
    pub prepend: bool,

    /// Target a non-default named output
    #[serde(default)]
    pub output_file: Option<String>,
}

impl AssetImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prepend: false,
            output_file: None,
        }
    }

    pub fn prepended(mut self) -> Self {
        self.prepend = true;
        self
    }
}

/// One named output and its ordered input files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOutput {
    pub output_file: String,
    pub input_files: Vec<String>,
}

/// Ordered mapping from output files to their input file lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRegistry {
    scripts: Vec<NamedOutput>,
    styles: Vec<NamedOutput>,
}

impl Default for OutputRegistry {
    fn default() -> Self {
        Self {
            scripts: vec![NamedOutput {
                output_file: DEFAULT_VENDOR_JS.to_string(),
                input_files: Vec::new(),
            }],
            styles: vec![NamedOutput {
                output_file: DEFAULT_VENDOR_CSS.to_string(),
                input_files: Vec::new(),
            }],
        }
    }
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for a lazy engine, with its own vendor artifacts already
    /// registered so user imports append after them
    pub fn for_engine(name: &str) -> Self {
        let mut registry = Self::new();
        for artifact in [
            format!("engines-dist/{name}/assets/engine-vendor.js"),
            format!("engines-dist/{name}/assets/engine-vendor.css"),
        ] {
            registry.register(&AssetImport::new(artifact));
        }
        registry
    }

    /// Record an import, preserving declaration order
    ///
    /// Repeated registrations of the same input are dropped. The target
    /// output is created on first use.
    pub fn register(&mut self, import: &AssetImport) {
        let kind = ImportKind::from_path(&import.path);
        let default = match kind {
            ImportKind::Script => DEFAULT_VENDOR_JS,
            ImportKind::Style => DEFAULT_VENDOR_CSS,
        };
        let output_file = import.output_file.as_deref().unwrap_or(default);

        let outputs = match kind {
            ImportKind::Script => &mut self.scripts,
            ImportKind::Style => &mut self.styles,
        };
        let named = match outputs.iter_mut().find(|o| o.output_file == output_file) {
            Some(existing) => existing,
            None => {
                outputs.push(NamedOutput {
                    output_file: output_file.to_string(),
                    input_files: Vec::new(),
                });
                outputs.last_mut().expect("just pushed")
            }
        };
        if named.input_files.iter().any(|known| *known == import.path) {
            return;
        }
        if import.prepend {
            named.input_files.insert(0, import.path.clone());
        } else {
            named.input_files.push(import.path.clone());
        }
    }

    pub fn script_outputs(&self) -> &[NamedOutput] {
        &self.scripts
    }

    pub fn style_outputs(&self) -> &[NamedOutput] {
        &self.styles
    }
}

/// Rewrite an import path according to where its resolution lands
///
/// Imports that resolve to the true root host are addressed by the host's
/// import machinery, which drops the `vendor/` prefix. Imports whose
/// resolution crossed a lazy boundary are concatenated against that
/// boundary's combined vendor tree, which keys vendor files under
/// `vendor/`, so the path stays untouched.
pub fn rewrite_import_path(path: &str, crossed_boundary: bool) -> String {
    if crossed_boundary {
        return path.to_string();
    }
    path.strip_prefix("vendor/").unwrap_or(path).to_string()
}

/// Build per-boundary registries for a whole package tree
///
/// Walks the package tree depth-first. Every lazy package first registers
/// its own vendor artifacts (so user imports append after them), then each
/// package's declared imports are recorded against the registry of its
/// nearest lazy boundary.
pub fn collect_import_registries(root: &PackageNode) -> BTreeMap<String, OutputRegistry> {
    let mut registries: BTreeMap<String, OutputRegistry> = BTreeMap::new();
    let mut ancestry: Vec<&PackageNode> = Vec::new();
    visit(root, &mut ancestry, &mut registries);
    registries
}

fn visit<'a>(
    node: &'a PackageNode,
    ancestry: &mut Vec<&'a PackageNode>,
    registries: &mut BTreeMap<String, OutputRegistry>,
) {
    ancestry.push(node);

    if node.is_lazy() {
        registries
            .entry(node.name().to_string())
            .or_insert_with(|| OutputRegistry::for_engine(node.name()));
    }

    let boundary = resolve::find_lazy_boundary(ancestry).name().to_string();
    let crossed = resolve::crosses_lazy_boundary(ancestry);
    for import in &node.imports {
        let path = rewrite_import_path(&import.path, crossed);
        debug!(package = node.name(), boundary = %boundary, path = %path, "registered import");
        registries.entry(boundary.clone()).or_default().register(&AssetImport {
            path,
            prepend: import.prepend,
            output_file: import.output_file.clone(),
        });
    }

    for child in &node.children {
        visit(child, ancestry, registries);
    }
    ancestry.pop();
}
