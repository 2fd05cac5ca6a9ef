//! Puppet-style version ranges on top of `semver`.
//!
//! Fixture manifests use the SemanticPuppet range syntax: comparators are
//! separated by whitespace (`>= 5.0.0 < 7.0.0`), alternatives by `||`, and
//! `A - B` denotes an inclusive hyphen range. A bare version is an exact
//! match. These are rewritten into one [`VersionReq`] per alternative.

use semver::{Version, VersionReq};

/// A parsed version range: matches if any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse a SemanticPuppet-style range.
    pub fn parse(range: &str) -> Result<Self, String> {
        let alternatives = range
            .split("||")
            .map(|alt| {
                let req = translate_alternative(alt.trim())?;
                VersionReq::parse(&req).map_err(|e| e.to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionRange { alternatives })
    }

    /// Check whether `version` lies in the range.
    pub fn includes(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Rewrite one `||`-free alternative into semver's comma syntax.
fn translate_alternative(alt: &str) -> Result<String, String> {
    if alt.is_empty() || alt == "*" {
        return Ok("*".to_string());
    }

    if let Some((low, high)) = alt.split_once(" - ") {
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() || high.is_empty() {
            return Err(format!("incomplete hyphen range `{}`", alt));
        }
        return Ok(format!(">={}, <={}", low, high));
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in alt.split_whitespace() {
        if is_operator(token) {
            if pending_op.is_some() {
                return Err(format!("unexpected operator `{}` in `{}`", token, alt));
            }
            pending_op = Some(token);
            continue;
        }

        let comparator = match pending_op.take() {
            Some(op) => format!("{}{}", op, token),
            None if token.starts_with(is_operator_char) => token.to_string(),
            None if is_wildcard(token) => token.to_string(),
            None => format!("={}", token),
        };
        comparators.push(comparator);
    }

    if let Some(op) = pending_op {
        return Err(format!("operator `{}` without a version in `{}`", op, alt));
    }

    Ok(comparators.join(", "))
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

fn is_operator(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_operator_char)
}

fn is_wildcard(token: &str) -> bool {
    token
        .split('.')
        .any(|part| matches!(part, "x" | "X" | "*"))
}

/// Parse a version string, allowing for incomplete versions.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.trim();

    // Try exact parse first
    if let Ok(v) = s.parse() {
        return Some(v);
    }

    // Try adding missing components
    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}
