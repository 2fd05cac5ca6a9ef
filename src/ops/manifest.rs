//! Fixtures manifest loading.
//!
//! The manifest (`.fixtures.yml`) is loaded as a loosely typed YAML
//! document. This module only locates and parses it, checks the required
//! top-level `fixtures` key, and expands `${VAR}` environment references;
//! shaping it into fetch specs is the normalizer's job.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

use crate::core::FixtureError;
use crate::util::FixturesContext;

/// `${NAME}` environment references inside manifest strings.
static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// A manifest declaring no fixtures at all.
pub fn empty_manifest() -> Value {
    let mut root = Mapping::new();
    root.insert(Value::from("fixtures"), Value::Mapping(Mapping::new()));
    Value::Mapping(root)
}

/// Locate and load the manifest for `ctx`.
///
/// When no manifest exists the result is an empty manifest, not an error.
pub fn load_manifest(ctx: &FixturesContext) -> Result<Value, FixtureError> {
    match ctx.find_manifest() {
        Some(path) => {
            tracing::debug!("Loading fixtures from {}", path.display());
            load_manifest_file(&path)
        }
        None => {
            tracing::debug!("No fixtures file found");
            Ok(empty_manifest())
        }
    }
}

/// Load and validate a manifest file.
pub fn load_manifest_file(path: &Path) -> Result<Value, FixtureError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FixtureError::FixturesFileNotFound {
            path: path.to_path_buf(),
        },
        _ => FixtureError::ReadManifest {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_manifest(&contents, path)
}

/// Parse manifest text; `path` is only used in error messages.
pub fn parse_manifest(contents: &str, path: &Path) -> Result<Value, FixtureError> {
    let doc: Value = serde_yaml::from_str(contents).map_err(|e| {
        let (line, column) = e
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        FixtureError::MalformedManifest {
            path: path.to_path_buf(),
            line,
            column,
            problem: e.to_string(),
        }
    })?;

    // An empty file declares nothing
    if doc.is_null() {
        return Ok(empty_manifest());
    }

    let has_fixtures = doc
        .as_mapping()
        .is_some_and(|m| m.contains_key("fixtures"));
    if !has_fixtures {
        return Err(FixtureError::MissingFixtures {
            path: path.to_path_buf(),
        });
    }

    Ok(deep_expand_env(doc))
}

/// Expand `${NAME}` references in every string of `value` from the process
/// environment. Unset variables are left as written.
pub fn deep_expand_env(value: Value) -> Value {
    expand_with(value, &|name| std::env::var(name).ok())
}

/// Expand `${NAME}` references using an arbitrary lookup.
pub fn expand_with(value: Value, lookup: &dyn Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::String(s) => Value::String(expand_str(&s, lookup)),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| expand_with(item, lookup))
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, expand_with(v, lookup)))
                .collect(),
        ),
        Value::Tagged(mut tagged) => {
            tagged.value = expand_with(tagged.value, lookup);
            Value::Tagged(tagged)
        }
        other => other,
    }
}

fn expand_str(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    ENV_REF
        .replace_all(s, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
