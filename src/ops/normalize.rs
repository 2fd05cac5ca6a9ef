//! Manifest normalization.
//!
//! Turns the loosely typed `fixtures` document into a validated [`Fixtures`]
//! set. Per category, fields are merged lowest to highest precedence:
//!
//! 1. built-in defaults (`target` = the fixtures module directory)
//! 2. the category block under `fixtures.defaults`
//! 3. the entry itself
//!
//! An entry may be a bare string, which is shorthand for `{ repo: <string> }`.
//! Entries of any other non-mapping shape are skipped with a warning.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Number, Value};

use crate::compat::{GemLookup, PuppetVersionFilter, VersionFilter};
use crate::core::fixture::validate_git_ref;
use crate::core::{Category, FetchSpec, FixtureError, Fixtures, ModuleIdentity, Scm, SymlinkEntry};
use crate::ops::manifest::load_manifest;
use crate::util::FixturesContext;

/// A YAML scalar accepted where a string is expected (`ref: 1.0`).
///
/// Numbers keep the spelling `serde_yaml::Number` prints, so `1.0` stays
/// `"1.0"`. Trailing zeros after the first (`2.10`) are already gone once
/// YAML has parsed the value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    /// Like `into_string`, warning when a revision was written as a number.
    fn into_revision(self, field: &str, fixture: &str) -> String {
        if let Scalar::Number(ref n) = self {
            tracing::warn!(
                "`{}` of fixture `{}` is the number {}; quote it to keep it exactly as written",
                field,
                fixture,
                n
            );
        }
        self.into_string()
    }
}

/// `flags` as either a shell-style command line or a list of arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawFlags {
    Line(String),
    List(Vec<Scalar>),
}

/// One manifest entry after defaults have been merged in.
#[derive(Debug, Default, Deserialize)]
struct RawFixture {
    repo: Option<Scalar>,
    target: Option<String>,
    #[serde(rename = "ref")]
    reference: Option<Scalar>,
    tag: Option<Scalar>,
    branch: Option<Scalar>,
    scm: Option<String>,
    flags: Option<RawFlags>,
    subdir: Option<String>,
    puppet_version: Option<Scalar>,
}

/// Normalizes manifests for one module.
pub struct Normalizer<'a> {
    module: &'a ModuleIdentity,
    default_target: PathBuf,
    filter: &'a dyn VersionFilter,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer.
    ///
    /// `default_target` is the built-in install directory; relative targets
    /// in the manifest are resolved against the module's source directory.
    pub fn new(
        module: &'a ModuleIdentity,
        default_target: impl Into<PathBuf>,
        filter: &'a dyn VersionFilter,
    ) -> Self {
        Normalizer {
            module,
            default_target: default_target.into(),
            filter,
        }
    }

    /// Normalize a full manifest document (with its top-level `fixtures` key).
    pub fn normalize(&self, doc: &Value) -> Result<Fixtures, FixtureError> {
        let categories = match doc.get("fixtures") {
            Some(Value::Mapping(m)) => m.clone(),
            Some(Value::Null) => Mapping::new(),
            Some(_) => {
                return Err(FixtureError::InvalidCategory {
                    category: "fixtures".to_string(),
                    message: "expected a mapping".to_string(),
                })
            }
            None => {
                return Err(FixtureError::MissingFixtures {
                    path: PathBuf::from("<manifest>"),
                })
            }
        };

        let mut fixtures = Fixtures::new();

        for category in Category::ALL {
            let defaults = self.category_defaults(&categories, category)?;
            let entries = self.category_entries(&categories, category)?;

            for (key, value) in entries {
                let Some(name) = scalar_key(&key) else {
                    tracing::warn!("Skipping {} fixture with a non-scalar name", category);
                    continue;
                };

                let entry = match value {
                    Value::String(repo) => {
                        let mut m = Mapping::new();
                        m.insert(Value::from("repo"), Value::String(repo));
                        m
                    }
                    Value::Mapping(m) => m,
                    _ => {
                        tracing::warn!(
                            "Skipping {} fixture `{}`: expected a string or a mapping",
                            category,
                            name
                        );
                        continue;
                    }
                };

                let mut merged = defaults.clone();
                for (k, v) in entry {
                    merged.insert(k, v);
                }

                let raw: RawFixture =
                    serde_yaml::from_value(Value::Mapping(merged)).map_err(|e| {
                        FixtureError::InvalidEntry {
                            category: category.to_string(),
                            fixture: name.clone(),
                            message: e.to_string(),
                        }
                    })?;

                self.add_entry(&mut fixtures, category, name, raw)?;
            }
        }

        Ok(fixtures)
    }

    fn category_defaults(
        &self,
        categories: &Mapping,
        category: Category,
    ) -> Result<Mapping, FixtureError> {
        let mut defaults = Mapping::new();
        defaults.insert(
            Value::from("target"),
            Value::from(self.default_target.to_string_lossy().into_owned()),
        );

        let overrides = categories
            .get("defaults")
            .and_then(|d| d.get(category.as_str()));
        match overrides {
            Some(Value::Mapping(m)) => {
                for (k, v) in m {
                    defaults.insert(k.clone(), v.clone());
                }
            }
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(FixtureError::InvalidCategory {
                    category: format!("defaults.{}", category),
                    message: "expected a mapping".to_string(),
                })
            }
        }

        Ok(defaults)
    }

    fn category_entries(
        &self,
        categories: &Mapping,
        category: Category,
    ) -> Result<Mapping, FixtureError> {
        match categories.get(category.as_str()) {
            Some(Value::Mapping(m)) => Ok(m.clone()),
            Some(Value::Null) => Ok(Mapping::new()),
            // Only an absent key gets the module's self-symlink
            None if category == Category::Symlinks => {
                let mut m = Mapping::new();
                m.insert(
                    Value::from(self.module.name.clone()),
                    Value::from(self.module.path.to_string_lossy().into_owned()),
                );
                Ok(m)
            }
            None => Ok(Mapping::new()),
            Some(_) => Err(FixtureError::InvalidCategory {
                category: category.to_string(),
                message: "expected a mapping".to_string(),
            }),
        }
    }

    fn add_entry(
        &self,
        fixtures: &mut Fixtures,
        category: Category,
        name: String,
        raw: RawFixture,
    ) -> Result<(), FixtureError> {
        if let Some(range) = raw.puppet_version.map(Scalar::into_string) {
            if !self.filter.includes(&range)? {
                tracing::debug!(
                    "Skipping {} fixture `{}`: puppet_version {} does not match",
                    category,
                    name,
                    range
                );
                return Ok(());
            }
        }

        let base = match raw.target {
            Some(ref t) => self.module.path.join(t),
            None => self.default_target.clone(),
        };
        let target = base.join(&name);

        let repo = raw
            .repo
            .map(Scalar::into_string)
            .ok_or_else(|| FixtureError::MissingRepo {
                category: category.to_string(),
                fixture: name.clone(),
            })?;

        if category == Category::Symlinks {
            let entry = SymlinkEntry::new(target, PathBuf::from(repo));
            if fixtures.symlinks.insert(name.clone(), entry).is_some() {
                tracing::warn!("Duplicate symlink fixture `{}`; the later one wins", name);
            }
            return Ok(());
        }

        let flags = parse_flags(raw.flags, &target)?;
        let reference = match (raw.reference, raw.tag) {
            (Some(r), _) => Some(r.into_revision("ref", &name)),
            (None, Some(t)) => Some(t.into_revision("tag", &name)),
            (None, None) => None,
        };

        let spec = match category {
            Category::Repositories => {
                let scm = match raw.scm.as_deref() {
                    Some(s) => s.parse::<Scm>().map_err(|scm| FixtureError::UnsupportedScm {
                        scm,
                        target: target.clone(),
                    })?,
                    None => Scm::default(),
                };

                if scm == Scm::Git {
                    if let Some(ref r) = reference {
                        validate_git_ref(r, &target)?;
                    }
                }

                let subdir = raw
                    .subdir
                    .map(|s| validate_subdir(&s, &target))
                    .transpose()?;
                let remote = resolve_local_remote(&repo, &self.module.path);

                let mut spec = FetchSpec::new(remote, target)
                    .with_scm(scm)
                    .with_flags(flags);
                if let Some(reference) = reference {
                    spec = spec.with_ref(reference);
                }
                if let Some(branch) = raw.branch {
                    spec = spec.with_branch(branch.into_revision("branch", &name));
                }
                if let Some(subdir) = subdir {
                    spec = spec.with_subdir(subdir);
                }
                spec
            }
            _ => {
                let mut spec = FetchSpec::new(repo.clone(), target).with_flags(flags);
                if let Some(reference) = reference {
                    spec = spec.with_ref(reference);
                }
                spec
            }
        };

        let map = match category {
            Category::Repositories => &mut fixtures.repositories,
            _ => &mut fixtures.forge_modules,
        };
        if let Some(previous) = map.insert(repo.clone(), spec) {
            tracing::warn!(
                "{} fixtures {} and `{}` both resolve to {}; the later one wins",
                category,
                previous.target.display(),
                name,
                repo
            );
        }

        Ok(())
    }
}

/// Normalize `doc` for `module`, installing into `default_target` unless
/// the manifest says otherwise.
pub fn normalize(
    doc: &Value,
    module: &ModuleIdentity,
    default_target: &Path,
    filter: &dyn VersionFilter,
) -> Result<Fixtures, FixtureError> {
    Normalizer::new(module, default_target, filter).normalize(doc)
}

/// Load, expand and normalize the manifest for the module rooted at
/// `ctx.source_dir()`.
///
/// The installed Puppet version is only looked up if some entry carries a
/// `puppet_version` range.
pub fn load_fixtures(ctx: &FixturesContext) -> Result<Fixtures, FixtureError> {
    let doc = load_manifest(ctx)?;
    let module = ModuleIdentity::detect(ctx.source_dir());
    let filter = PuppetVersionFilter::new(GemLookup);
    normalize(&doc, &module, &ctx.module_target_dir(), &filter)
}

/// Make `subdir` relative to the fetched tree: a leading `/` is dropped and
/// anything that could leave the tree is rejected.
fn validate_subdir(subdir: &str, target: &Path) -> Result<PathBuf, FixtureError> {
    let mut relative = PathBuf::new();
    for component in Path::new(subdir).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(part) => relative.push(part),
            Component::ParentDir | Component::Prefix(_) => {
                return Err(FixtureError::InvalidSubdir {
                    subdir: subdir.to_string(),
                    target: target.to_path_buf(),
                })
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(FixtureError::InvalidSubdir {
            subdir: subdir.to_string(),
            target: target.to_path_buf(),
        });
    }
    Ok(relative)
}

/// Resolve a relative local repository path against the module directory,
/// so the clone does not depend on the process working directory.
///
/// URLs, scp-style `host:path` remotes and paths that do not exist under
/// `base` are returned unchanged.
fn resolve_local_remote(repo: &str, base: &Path) -> String {
    if repo.contains("://") {
        return repo.to_string();
    }
    let scp_like = repo
        .split_once(':')
        .is_some_and(|(host, _)| !host.is_empty() && !host.contains('/'));
    if scp_like || Path::new(repo).is_absolute() {
        return repo.to_string();
    }

    let local = base.join(repo);
    if local.exists() {
        local.to_string_lossy().into_owned()
    } else {
        repo.to_string()
    }
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_flags(flags: Option<RawFlags>, target: &Path) -> Result<Vec<String>, FixtureError> {
    match flags {
        None => Ok(Vec::new()),
        Some(RawFlags::Line(line)) => {
            shell_words::split(&line).map_err(|e| FixtureError::InvalidFlags {
                target: target.to_path_buf(),
                message: e.to_string(),
            })
        }
        Some(RawFlags::List(items)) => Ok(items.into_iter().map(Scalar::into_string).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::{AnyVersion, VersionRange};
    use semver::Version;

    const TARGET: &str = "/src/mymod/spec/fixtures/modules";

    struct Installed(Version);

    impl VersionFilter for Installed {
        fn includes(&self, range: &str) -> Result<bool, FixtureError> {
            Ok(VersionRange::parse(range).unwrap().includes(&self.0))
        }
    }

    fn module() -> ModuleIdentity {
        ModuleIdentity {
            name: "mymod".to_string(),
            path: PathBuf::from("/src/mymod"),
        }
    }

    fn run(yaml: &str) -> Result<Fixtures, FixtureError> {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        normalize(&doc, &module(), Path::new(TARGET), &AnyVersion)
    }

    #[test]
    fn test_empty_fixtures_synthesizes_self_symlink() {
        let fixtures = run("fixtures: {}\n").unwrap();

        assert!(fixtures.repositories.is_empty());
        assert!(fixtures.forge_modules.is_empty());
        assert_eq!(fixtures.symlinks.len(), 1);
        assert_eq!(
            fixtures.symlinks["mymod"],
            SymlinkEntry::new(format!("{}/mymod", TARGET), "/src/mymod")
        );
    }

    #[test]
    fn test_present_but_empty_symlinks_suppresses_default() {
        let fixtures = run("fixtures:\n  symlinks: {}\n").unwrap();
        assert!(fixtures.symlinks.is_empty());

        let fixtures = run("fixtures:\n  symlinks:\n").unwrap();
        assert!(fixtures.symlinks.is_empty());
    }

    #[test]
    fn test_bare_string_entry() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    stdlib: "https://example.com/stdlib.git"
"#,
        )
        .unwrap();

        let spec = &fixtures.repositories["https://example.com/stdlib.git"];
        assert_eq!(
            spec,
            &FetchSpec::new("https://example.com/stdlib.git", format!("{}/stdlib", TARGET))
                .with_scm(Scm::Git)
        );
    }

    #[test]
    fn test_mapping_entry_fields() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    concat:
      repo: "https://example.com/concat.hg"
      scm: hg
      branch: stable
      ref: "1.2.3"
      flags: "--config 'ui.verbose=true'"
      subdir: modules/concat
"#,
        )
        .unwrap();

        let spec = &fixtures.repositories["https://example.com/concat.hg"];
        assert_eq!(spec.scm, Some(Scm::Mercurial));
        assert_eq!(spec.branch.as_deref(), Some("stable"));
        assert_eq!(spec.reference.as_deref(), Some("1.2.3"));
        assert_eq!(spec.flags, vec!["--config", "ui.verbose=true"]);
        assert_eq!(spec.subdir, Some(PathBuf::from("modules/concat")));
    }

    #[test]
    fn test_tag_is_ref_alias_and_numbers_coerced() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    a:
      repo: "https://example.com/a.git"
      tag: v2.0.0
    b:
      repo: "https://example.com/b.git"
      ref: 1.5
    c:
      repo: "https://example.com/c.git"
      ref: 1.0
    d:
      repo: "https://example.com/d.git"
      branch: 2
"#,
        )
        .unwrap();

        assert_eq!(
            fixtures.repositories["https://example.com/c.git"].reference.as_deref(),
            Some("1.0")
        );
        assert_eq!(
            fixtures.repositories["https://example.com/d.git"].branch.as_deref(),
            Some("2")
        );

        assert_eq!(
            fixtures.repositories["https://example.com/a.git"].reference.as_deref(),
            Some("v2.0.0")
        );
        assert_eq!(
            fixtures.repositories["https://example.com/b.git"].reference.as_deref(),
            Some("1.5")
        );
    }

    #[test]
    fn test_git_ref_with_slash_is_rejected() {
        let err = run(
            r#"
fixtures:
  repositories:
    stdlib:
      repo: "https://example.com/stdlib.git"
      ref: "feature/new"
"#,
        )
        .unwrap_err();

        match err {
            FixtureError::InvalidRef { reference, target } => {
                assert_eq!(reference, "feature/new");
                assert_eq!(target, PathBuf::from(format!("{}/stdlib", TARGET)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hg_ref_with_slash_is_allowed() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    stdlib:
      repo: "https://example.com/stdlib"
      scm: hg
      ref: "feature/new"
"#,
        )
        .unwrap();
        assert_eq!(fixtures.repositories.len(), 1);
    }

    #[test]
    fn test_unsupported_scm() {
        let err = run(
            r#"
fixtures:
  repositories:
    stdlib:
      repo: "https://example.com/stdlib"
      scm: svn
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FixtureError::UnsupportedScm { ref scm, .. } if scm == "svn"));
    }

    #[test]
    fn test_forge_modules_drop_repository_fields() {
        let fixtures = run(
            r#"
fixtures:
  forge_modules:
    stdlib:
      repo: "puppetlabs-stdlib"
      ref: "9.4.1"
      scm: hg
      branch: main
      subdir: lib
      flags:
        - "--module_repository=https://forge.example.com/"
"#,
        )
        .unwrap();

        let spec = &fixtures.forge_modules["puppetlabs-stdlib"];
        assert_eq!(
            spec,
            &FetchSpec::new("puppetlabs-stdlib", format!("{}/stdlib", TARGET))
                .with_ref("9.4.1")
                .with_flags(["--module_repository=https://forge.example.com/"])
        );
    }

    #[test]
    fn test_defaults_precedence() {
        let fixtures = run(
            r#"
fixtures:
  defaults:
    forge_modules:
      target: vendor/modules
      flags: "--module_repository=https://forge.example.com/"
  forge_modules:
    stdlib: "puppetlabs-stdlib"
    concat:
      repo: "puppetlabs-concat"
      target: /opt/modules
      flags: []
"#,
        )
        .unwrap();

        let stdlib = &fixtures.forge_modules["puppetlabs-stdlib"];
        assert_eq!(stdlib.target, PathBuf::from("/src/mymod/vendor/modules/stdlib"));
        assert_eq!(stdlib.flags, vec!["--module_repository=https://forge.example.com/"]);

        let concat = &fixtures.forge_modules["puppetlabs-concat"];
        assert_eq!(concat.target, PathBuf::from("/opt/modules/concat"));
        assert!(concat.flags.is_empty());
    }

    #[test]
    fn test_explicit_symlinks() {
        let fixtures = run(
            r#"
fixtures:
  symlinks:
    other: "/src/other"
"#,
        )
        .unwrap();

        assert_eq!(fixtures.symlinks.len(), 1);
        assert_eq!(
            fixtures.symlinks["other"],
            SymlinkEntry::new(format!("{}/other", TARGET), "/src/other")
        );
    }

    #[test]
    fn test_unrecognized_entry_shapes_are_skipped() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    listy: [1, 2]
    numeric: 42
    good: "https://example.com/good.git"
"#,
        )
        .unwrap();

        assert_eq!(fixtures.repositories.len(), 1);
        assert!(fixtures.repositories.contains_key("https://example.com/good.git"));
    }

    #[test]
    fn test_same_remote_collides_later_wins() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    first: "https://example.com/shared.git"
    second: "https://example.com/shared.git"
"#,
        )
        .unwrap();

        assert_eq!(fixtures.repositories.len(), 1);
        assert_eq!(
            fixtures.repositories["https://example.com/shared.git"].target,
            PathBuf::from(format!("{}/second", TARGET))
        );
    }

    #[test]
    fn test_missing_repo() {
        let err = run(
            r#"
fixtures:
  repositories:
    stdlib:
      ref: "1.0.0"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FixtureError::MissingRepo { ref fixture, .. } if fixture == "stdlib"));
    }

    #[test]
    fn test_bad_flags_quoting() {
        let err = run(
            r#"
fixtures:
  repositories:
    stdlib:
      repo: "https://example.com/stdlib.git"
      flags: "--config 'unterminated"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, FixtureError::InvalidFlags { .. }));
    }

    #[test]
    fn test_puppet_version_filter() {
        let doc: Value = serde_yaml::from_str(
            r#"
fixtures:
  repositories:
    old:
      repo: "https://example.com/old.git"
      puppet_version: "< 6.0.0"
    current:
      repo: "https://example.com/current.git"
      puppet_version: ">= 7.0.0"
"#,
        )
        .unwrap();

        let filter = Installed(Version::new(7, 0, 0));
        let fixtures = normalize(&doc, &module(), Path::new(TARGET), &filter).unwrap();

        assert_eq!(fixtures.repositories.len(), 1);
        assert!(fixtures.repositories.contains_key("https://example.com/current.git"));
        assert_eq!(fixtures.job_count(), 1);
    }

    #[test]
    fn test_invalid_sections() {
        assert!(matches!(
            run("fixtures: [a, b]\n").unwrap_err(),
            FixtureError::InvalidCategory { .. }
        ));
        assert!(matches!(
            run("fixtures:\n  repositories: [a, b]\n").unwrap_err(),
            FixtureError::InvalidCategory { .. }
        ));
    }

    #[test]
    fn test_null_fixtures_is_empty() {
        let fixtures = run("fixtures:\n").unwrap();
        assert_eq!(fixtures.symlinks.len(), 1);
        assert_eq!(fixtures.job_count(), 0);
    }

    #[test]
    fn test_load_fixtures_from_module_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("metadata.json"),
            r#"{"name": "acme-widget", "version": "1.0.0"}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join(".fixtures.yml"),
            "fixtures:\n  repositories:\n    stdlib: https://example.com/stdlib.git\n",
        )
        .unwrap();

        let ctx = FixturesContext::with_source_dir(tmp.path().to_path_buf());
        let fixtures = load_fixtures(&ctx).unwrap();

        assert_eq!(
            fixtures.symlinks["widget"],
            SymlinkEntry::new(ctx.module_target_dir().join("widget"), tmp.path())
        );
        assert_eq!(
            fixtures.repositories["https://example.com/stdlib.git"].target,
            ctx.module_target_dir().join("stdlib")
        );
    }

    #[test]
    fn test_forge_version_keeps_decimal_zero() {
        let fixtures = run(
            r#"
fixtures:
  forge_modules:
    a:
      repo: acme-a
      ref: 1.0
"#,
        )
        .unwrap();

        assert_eq!(fixtures.forge_modules["acme-a"].reference.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_absolute_subdir_is_made_relative() {
        let fixtures = run(
            r#"
fixtures:
  repositories:
    inner:
      repo: "https://example.com/mono.git"
      subdir: /modules/inner
"#,
        )
        .unwrap();

        assert_eq!(
            fixtures.repositories["https://example.com/mono.git"].subdir,
            Some(PathBuf::from("modules/inner"))
        );
    }

    #[test]
    fn test_subdir_outside_checkout_is_rejected() {
        for subdir in ["../../outside", "modules/../../x", "/"] {
            let yaml = format!(
                "fixtures:\n  repositories:\n    inner:\n      repo: https://example.com/mono.git\n      subdir: \"{}\"\n",
                subdir
            );
            match run(&yaml).unwrap_err() {
                FixtureError::InvalidSubdir { subdir: bad, target } => {
                    assert_eq!(bad, subdir);
                    assert_eq!(target, PathBuf::from(format!("{}/inner", TARGET)));
                }
                other => panic!("unexpected error for {}: {other}", subdir),
            }
        }
    }

    #[test]
    fn test_relative_local_remote_resolves_against_module() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("vendor/shared")).unwrap();

        assert_eq!(
            resolve_local_remote("vendor/shared", tmp.path()),
            tmp.path().join("vendor/shared").to_string_lossy()
        );
        assert_eq!(resolve_local_remote("missing/repo", tmp.path()), "missing/repo");
        assert_eq!(
            resolve_local_remote("https://example.com/a.git", tmp.path()),
            "https://example.com/a.git"
        );
        assert_eq!(
            resolve_local_remote("git@example.com:acme/a.git", tmp.path()),
            "git@example.com:acme/a.git"
        );
    }
}
