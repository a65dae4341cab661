//! Engine configuration
//!
//! Engines keep their own configuration settings, separate from the host
//! application's. Settings are delivered to the runtime through a meta tag
//! rendered into the host page head, and read back by a generated module
//! compiled into the engine's module space. Configuration merging always
//! resolves against the true root host, never a lazy boundary.

use serde_json::Value;

use crate::error::ComposeResult;
use crate::package::PackageNode;

/// Non-fatal configuration warning surfaced to the operator
///
/// The build proceeds with a default; the warning must still reach the
/// operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The package the warning concerns
    pub package: String,
    /// Human-readable description
    pub message: String,
    /// A suggested correction if available
    pub suggestion: Option<String>,
}

/// Merge a package's settings with its children's
///
/// Children are folded depth-first in declaration order; the package's own
/// settings are applied last and win on conflict.
pub fn merged_settings(node: &PackageNode) -> Value {
    let mut merged = Value::Object(serde_json::Map::new());
    for child in &node.children {
        deep_merge(&mut merged, &merged_settings(child));
    }
    deep_merge(&mut merged, &node.settings);
    merged
}

fn deep_merge(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                deep_merge(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
        (_, Value::Null) => {}
        (target_slot, other) => *target_slot = other.clone(),
    }
}

/// Source of the generated configuration module
///
/// The module is compiled into the engine's module space at
/// `config/environment.js` and reads the engine's settings back out of the
/// meta tag rendered by [`content_for_head`].
pub fn config_module_source(name: &str) -> String {
    format!(
        "var name = '{name}/config/environment';\n\
         var meta = document.querySelector('meta[name=\"' + name + '\"]');\n\
         var config = JSON.parse(decodeURIComponent(meta.getAttribute('content')));\n\
         export default config;\n"
    )
}

/// Render the head meta tag carrying an engine's merged settings
pub fn content_for_head(name: &str, settings: &Value) -> ComposeResult<String> {
    let json = serde_json::to_string(settings)?;
    Ok(format!(
        "<meta name=\"{name}/config/environment\" content=\"{}\" />",
        escape_attribute(&json)
    ))
}

/// Percent-encode the characters that would break out of the attribute
fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '"' => escaped.push_str("%22"),
            '\'' => escaped.push_str("%27"),
            '<' => escaped.push_str("%3C"),
            '>' => escaped.push_str("%3E"),
            '&' => escaped.push_str("%26"),
            other => escaped.push(other),
        }
    }
    escaped
}
