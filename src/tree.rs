//! Asset tree primitive
//!
//! An immutable, path-addressed collection of in-memory files. Every
//! composition step produces a new tree owned by the step that created it;
//! trees are never mutated in place. Equality is by content and path, not
//! by reference.
//!
//! Paths are normalized, `/`-separated and relative (no leading slash).
//! Contents are text; binary files loaded from disk are converted lossily.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use sha2::{Digest, Sha256};

use crate::error::{ComposeError, ComposeResult};

/// A path-addressed collection of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTree {
    files: BTreeMap<String, String>,
}

/// Options for [`AssetTree::filter`]
///
/// `include`/`exclude` are glob patterns evaluated against paths relative to
/// `src_dir` (when set). Matched paths are re-rooted under `dest_dir` when
/// set. An empty `include` list includes everything.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub src_dir: Option<String>,
    pub dest_dir: Option<String>,
    pub allow_empty: bool,
}

/// Options for [`AssetTree::merge`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// When true, later trees win on path collision. When false, a
    /// collision is a hard error.
    pub overwrite: bool,
}

/// Options for [`AssetTree::concatenate`]
///
/// `header_files` are exact paths emitted first, in declaration order.
/// `input_files` are glob patterns; pattern order is significant, and files
/// within one pattern keep sorted path order. A file contributes once.
/// Header files absent from the tree are skipped.
#[derive(Debug, Clone, Default)]
pub struct ConcatOptions {
    pub header_files: Vec<String>,
    pub input_files: Vec<String>,
    pub output_file: String,
    pub separator: String,
    pub allow_none: bool,
}

impl AssetTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree holding a single file
    pub fn write_file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new().insert(path, content)
    }

    /// Builder-style insert; consumes and returns the tree
    pub fn insert(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(normalize(&path.into()), content.into());
        self
    }

    /// Load a tree from an on-disk directory, contents verbatim
    ///
    /// Walks every file under `root` (hidden files included, ignore files
    /// not honored) and stores it under its root-relative path.
    pub fn from_dir(root: &Path) -> ComposeResult<Self> {
        let mut files = BTreeMap::new();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .build();
        for entry in walker {
            let entry = entry.map_err(|err| ComposeError::TreeRead {
                root: root.to_path_buf(),
                message: err.to_string(),
            })?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|err| ComposeError::TreeRead {
                    root: root.to_path_buf(),
                    message: err.to_string(),
                })?;
            let path = relative.to_string_lossy().replace('\\', "/");
            let bytes = std::fs::read(entry.path())?;
            files.insert(normalize(&path), String::from_utf8_lossy(&bytes).into_owned());
        }
        Ok(Self { files })
    }

    /// Get a file's content
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(&normalize(path)).map(String::as_str)
    }

    /// Check whether a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&normalize(path))
    }

    /// Iterate paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Iterate (path, content) pairs in sorted path order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the tree holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// SHA256 hash of a file's content, if present
    pub fn content_hash(&self, path: &str) -> Option<String> {
        self.get(path).map(|content| {
            let mut hasher = Sha256::new();
            hasher.update(content.as_bytes());
            format!("sha256:{:x}", hasher.finalize())
        })
    }

    /// Return a new tree containing only matching paths, optionally rewritten
    ///
    /// With `allow_empty` unset, zero matches is an error: route splitting
    /// and child collection rely on the distinction between "nothing there,
    /// fine" and "the pipeline wired up the wrong tree".
    pub fn filter(&self, options: &FilterOptions) -> ComposeResult<AssetTree> {
        let include = build_glob_set(&options.include)?;
        let exclude = build_glob_set(&options.exclude)?;

        let mut files = BTreeMap::new();
        for (path, content) in &self.files {
            let relative = match &options.src_dir {
                Some(prefix) => match strip_dir_prefix(path, prefix) {
                    Some(rest) => rest.to_string(),
                    None => continue,
                },
                None => path.clone(),
            };
            if !options.include.is_empty() && !include.is_match(&relative) {
                continue;
            }
            if !options.exclude.is_empty() && exclude.is_match(&relative) {
                continue;
            }
            let target = match &options.dest_dir {
                Some(root) => join_under(root, &relative),
                None => relative,
            };
            files.insert(target, content.clone());
        }

        if files.is_empty() && !options.allow_empty {
            return Err(ComposeError::EmptyFilterResult {
                patterns: options.include.clone(),
            });
        }
        Ok(AssetTree { files })
    }

    /// Union-merge trees; absent entries are silently skipped
    ///
    /// With `overwrite` unset, two trees providing the same path is a hard
    /// [`ComposeError::OutputCollision`], even when the contents agree.
    pub fn merge<I>(trees: I, options: &MergeOptions) -> ComposeResult<AssetTree>
    where
        I: IntoIterator<Item = Option<AssetTree>>,
    {
        let mut files = BTreeMap::new();
        for tree in trees.into_iter().flatten() {
            for (path, content) in tree.files {
                if !options.overwrite && files.contains_key(&path) {
                    return Err(ComposeError::OutputCollision { path });
                }
                files.insert(path, content);
            }
        }
        Ok(AssetTree { files })
    }

    /// Concatenate a file set into a single-file tree
    pub fn concatenate(&self, options: &ConcatOptions) -> ComposeResult<AssetTree> {
        let mut ordered: Vec<&str> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for header in &options.header_files {
            let path = normalize(header);
            if let Some((key, _)) = self.files.get_key_value(&path) {
                if seen.insert(path.clone()) {
                    ordered.push(key.as_str());
                }
            }
        }
        for pattern in &options.input_files {
            let set = build_glob_set(std::slice::from_ref(pattern))?;
            for path in self.files.keys() {
                if set.is_match(path) && !seen.contains(path.as_str()) {
                    seen.insert(path.clone());
                    ordered.push(path.as_str());
                }
            }
        }

        if ordered.is_empty() && !options.allow_none {
            return Err(ComposeError::NothingToConcatenate {
                output_file: options.output_file.clone(),
            });
        }

        let content = ordered
            .iter()
            .map(|path| self.files[*path].as_str())
            .collect::<Vec<_>>()
            .join(&options.separator);
        Ok(AssetTree::write_file(options.output_file.clone(), content))
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

/// Strip `prefix` as a leading directory, returning the remainder
fn strip_dir_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn join_under(root: &str, relative: &str) -> String {
    let root = root.trim_matches('/');
    if root.is_empty() {
        relative.to_string()
    } else {
        format!("{root}/{relative}")
    }
}

fn build_glob_set(patterns: &[String]) -> ComposeResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|err| ComposeError::BadPattern {
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| ComposeError::BadPattern {
        pattern: patterns.join(", "),
        message: err.to_string(),
    })
}
