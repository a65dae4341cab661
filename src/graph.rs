//! Module dependency graph splitter
//!
//! Parses static import edges out of the script modules in an asset tree,
//! builds a directed graph over their fully-qualified module identifiers,
//! and partitions the tree into the transitive dependency closure of an
//! entry module and its complement. External identifiers are leaf
//! boundaries: their presence satisfies an edge but they are never
//! traversed into or past, even when the same identifier also exists in
//! the tree.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use regex::Regex;
use tracing::debug;

use crate::error::ComposeResult;
use crate::tree::AssetTree;

/// Fully-qualified module identifier: `<package-name>/<path-no-extension>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive an identifier from a tree path; `None` for non-script paths
    pub fn from_tree_path(path: &str) -> Option<Self> {
        path.strip_suffix(".js").map(|base| Self(base.to_string()))
    }

    /// The tree path this identifier addresses
    pub fn tree_path(&self) -> String {
        format!("{}.js", self.0)
    }

    /// Leading path segment, i.e. the owning package's name
    pub fn package_name(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments for a dependency split
///
/// The two split calls made for one engine must carry equal specs so that
/// the include and exclude results are exact complements over the same
/// input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    pub entry: ModuleId,
    pub external: BTreeSet<ModuleId>,
}

impl SplitSpec {
    pub fn new(entry: ModuleId, external: impl IntoIterator<Item = ModuleId>) -> Self {
        Self {
            entry,
            external: external.into_iter().collect(),
        }
    }
}

static ES_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[\w$*{},\s]+?\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("static regex")
});
static ES_EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*export\s+[\w$*{},\s]+?\s+from\s+['"]([^'"]+)['"]"#)
        .expect("static regex")
});
static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("static regex")
});
static AMD_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"define\s*\(\s*(?:['"][^'"]*['"]\s*,\s*)?\[([^\]]*)\]"#).expect("static regex")
});
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("static regex"));

/// Extract raw import specifiers from a module source
///
/// Covers ES imports/re-exports, CommonJS `require` calls, and AMD
/// dependency arrays; first occurrence order, duplicates dropped.
pub fn parse_imports(source: &str) -> Vec<String> {
    let mut specifiers: Vec<String> = Vec::new();
    let mut push = |spec: &str| {
        // AMD pseudo-dependencies carry no module.
        if matches!(spec, "require" | "exports" | "module") {
            return;
        }
        if !specifiers.iter().any(|known| known == spec) {
            specifiers.push(spec.to_string());
        }
    };

    for capture in ES_IMPORT.captures_iter(source) {
        push(&capture[1]);
    }
    for capture in ES_EXPORT_FROM.captures_iter(source) {
        push(&capture[1]);
    }
    for capture in REQUIRE_CALL.captures_iter(source) {
        push(&capture[1]);
    }
    for capture in AMD_DEFINE.captures_iter(source) {
        for dep in QUOTED.captures_iter(&capture[1]) {
            push(&dep[1]);
        }
    }
    specifiers
}

/// Resolve a specifier to a fully-qualified identifier
///
/// Bare specifiers are already fully qualified. Relative specifiers
/// resolve against the importer's directory; escaping above the root
/// yields `None`.
fn resolve_specifier(specifier: &str, importer: &ModuleId) -> Option<ModuleId> {
    if !specifier.starts_with('.') {
        return Some(ModuleId::new(specifier));
    }

    let mut segments: Vec<&str> = importer.as_str().split('/').collect();
    segments.pop();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(ModuleId::new(segments.join("/")))
}

/// Partition a tree by the dependency closure of `spec.entry`
///
/// `include: true` keeps the closure (entry included); `false` keeps the
/// complement. Non-script files always belong to the complement. A
/// missing entry yields an empty closure, not an error.
pub fn split(tree: &AssetTree, spec: &SplitSpec, include: bool) -> ComposeResult<AssetTree> {
    let closure = dependency_closure(tree, spec);
    debug!(
        entry = %spec.entry,
        closure = closure.len(),
        include,
        "partitioned module tree"
    );

    let mut result = AssetTree::new();
    for (path, content) in tree.entries() {
        let in_closure = ModuleId::from_tree_path(path)
            .map(|id| closure.contains(&id))
            .unwrap_or(false);
        if in_closure == include {
            result = result.insert(path, content);
        }
    }
    Ok(result)
}

/// Transitive import-reachable set from the entry, boundary-aware
fn dependency_closure(tree: &AssetTree, spec: &SplitSpec) -> BTreeSet<ModuleId> {
    let mut modules: BTreeMap<ModuleId, &str> = BTreeMap::new();
    for (path, content) in tree.entries() {
        if let Some(id) = ModuleId::from_tree_path(path) {
            modules.insert(id, content);
        }
    }

    // Boundary wins over tree membership, entry included.
    if !modules.contains_key(&spec.entry) || spec.external.contains(&spec.entry) {
        return BTreeSet::new();
    }

    let mut graph: StableDiGraph<ModuleId, ()> = StableDiGraph::new();
    let mut indices: BTreeMap<ModuleId, NodeIndex> = BTreeMap::new();
    for id in modules.keys() {
        indices.insert(id.clone(), graph.add_node(id.clone()));
    }
    for (id, source) in &modules {
        if spec.external.contains(id) {
            continue;
        }
        for specifier in parse_imports(source) {
            let Some(target) = resolve_specifier(&specifier, id) else {
                continue;
            };
            if spec.external.contains(&target) {
                continue;
            }
            if let Some(&target_index) = indices.get(&target) {
                graph.add_edge(indices[id], target_index, ());
            }
        }
    }

    let mut closure: BTreeSet<ModuleId> = BTreeSet::new();
    let mut pending = vec![spec.entry.clone()];
    while let Some(id) = pending.pop() {
        if !closure.insert(id.clone()) {
            continue;
        }
        for neighbor in graph.neighbors(indices[&id]) {
            pending.push(graph[neighbor].clone());
        }
    }
    closure
}
