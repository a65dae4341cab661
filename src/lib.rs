//! Enginepack - build-time composition engine for engine packages
//!
//! An engine is an application fragment that can be bundled eagerly
//! (merged into the host application's output) or lazily (packaged as a
//! standalone, independently loadable artifact set fetched at runtime).
//! Given the filesystem-shaped asset trees of an engine and its nested
//! child packages, enginepack produces the correct output artifacts for
//! the engine's loading mode, relocating routing entry points and their
//! transitive dependency closure between the engine's own output and the
//! host's.

pub mod compose;
pub mod config;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod resolve;
pub mod transpile;
pub mod tree;

// Re-exports for convenience
pub use compose::{BuildOutput, Composer, ENGINES_DIST};
pub use config::{config_module_source, content_for_head, merged_settings, ConfigWarning};
pub use error::{ComposeError, ComposeResult};
pub use graph::{ModuleId, SplitSpec};
pub use manifest::{AssetManifest, Bundle, BundleAsset, BundleAssetKind};
pub use package::{PackageConfig, PackageNode};
pub use registry::{AssetImport, ImportKind, NamedOutput, OutputRegistry};
pub use transpile::{IdentityTranspiler, Transpiler};
pub use tree::{AssetTree, ConcatOptions, FilterOptions, MergeOptions};
