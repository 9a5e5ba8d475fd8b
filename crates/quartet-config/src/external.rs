//! External dependency classification.
//!
//! Decides which import specifiers the bundle leaves unresolved. A specifier
//! is external when it names a Node built-in from a fixed allowlist or a
//! declared runtime/peer dependency, either exactly or through a subpath
//! (`"<name>/..."`).

use crate::manifest::PackageManifest;

/// Node built-ins that are never inlined.
pub const BUILTIN_EXTERNALS: &[&str] = &["dns", "fs", "path", "url"];

/// Helper package that is always inlined, even when declared as a dependency.
pub const INLINED_PACKAGE: &str = "tiny-invariant";

/// Helper module emitted by the async-to-promises transform. It belongs to a
/// library that is intentionally inlined, so it is bundled even if the
/// library name is in the external set.
pub const INLINED_HELPERS: &str = "babel-plugin-transform-async-to-promises/helpers";

/// Exact-or-prefix matcher over the external specifier set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalClassifier {
    names: Vec<String>,
}

impl ExternalClassifier {
    /// Build the classifier from the manifest's declared dependencies.
    ///
    /// Order of the set is built-ins, then peer dependencies, then
    /// dependencies; duplicates are kept once.
    pub fn from_manifest(manifest: &PackageManifest) -> Self {
        Self::from_names(manifest.declared_names())
    }

    /// Build the classifier from an explicit list of declared names.
    pub fn from_names<'a>(declared: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if name.is_empty() || name == INLINED_PACKAGE {
                return;
            }
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        };

        BUILTIN_EXTERNALS.iter().for_each(|name| push(*name));
        declared.into_iter().for_each(|name| push(name));

        tracing::debug!(externals = ?names, "built external classifier");
        Self { names }
    }

    /// Returns `true` if `id` must be left out of the bundle.
    pub fn is_external(&self, id: &str) -> bool {
        if id == INLINED_HELPERS {
            return false;
        }

        self.names.iter().any(|name| matches_name(id, name))
    }

    /// Whether `name` itself is in the external set.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The external names, in construction order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

fn matches_name(id: &str, name: &str) -> bool {
    match id.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(declared: &[&str]) -> ExternalClassifier {
        ExternalClassifier::from_names(declared.iter().copied())
    }

    #[test]
    fn test_builtins_are_always_external() {
        let c = classifier(&[]);
        for builtin in BUILTIN_EXTERNALS {
            assert!(c.is_external(builtin));
        }
        assert!(c.is_external("fs/promises"));
        assert!(!c.is_external("os"));
    }

    #[test]
    fn test_exact_and_subpath_matches() {
        let c = classifier(&["wonka", "react"]);
        assert!(c.is_external("wonka"));
        assert!(c.is_external("wonka/src/index"));
        assert!(c.is_external("react"));
        assert!(c.is_external("react/jsx-runtime"));
    }

    #[test]
    fn test_name_prefix_without_slash_is_bundled() {
        let c = classifier(&["react"]);
        assert!(!c.is_external("react-dom"));
        assert!(!c.is_external("reactive"));
        assert!(!c.is_external("urls"));
    }

    #[test]
    fn test_relative_and_absolute_specifiers_are_bundled() {
        let c = classifier(&["wonka"]);
        assert!(!c.is_external("./wonka"));
        assert!(!c.is_external("../fs"));
        assert!(!c.is_external("/abs/path"));
    }

    #[test]
    fn test_inlined_package_is_removed_even_when_declared() {
        let c = classifier(&["tiny-invariant", "wonka"]);
        assert!(!c.is_external("tiny-invariant"));
        assert!(!c.is_external("tiny-invariant/dist/tiny-invariant.esm.js"));
        assert!(!c.contains("tiny-invariant"));
        assert!(c.is_external("wonka"));
    }

    #[test]
    fn test_async_helpers_are_always_bundled() {
        let c = classifier(&["babel-plugin-transform-async-to-promises"]);
        assert!(c.is_external("babel-plugin-transform-async-to-promises"));
        assert!(!c.is_external(INLINED_HELPERS));
    }

    #[test]
    fn test_scoped_packages() {
        let c = classifier(&["@urql/core"]);
        assert!(c.is_external("@urql/core"));
        assert!(c.is_external("@urql/core/internal"));
        assert!(!c.is_external("@urql/core-extra"));
        assert!(!c.is_external("@urql/preact"));
    }

    #[test]
    fn test_names_keep_construction_order_without_duplicates() {
        let c = classifier(&["react", "wonka", "fs", "react"]);
        assert_eq!(c.names(), ["dns", "fs", "path", "url", "react", "wonka"]);
    }

    #[test]
    fn test_from_manifest_uses_peer_and_runtime_dependencies() {
        let manifest = PackageManifest::from_json(
            r#"{
                "dependencies": { "wonka": "^3", "tiny-invariant": "^1" },
                "peerDependencies": { "react": "*" }
            }"#,
        )
        .unwrap();

        let c = ExternalClassifier::from_manifest(&manifest);
        assert!(c.contains("react"));
        assert!(c.contains("wonka"));
        assert!(!c.contains("tiny-invariant"));
    }

    #[test]
    fn test_classification_matches_definition_for_many_specifiers() {
        let declared = ["wonka", "react", "@scope/pkg"];
        let c = classifier(&declared);
        let all: Vec<&str> = BUILTIN_EXTERNALS.iter().copied().chain(declared).collect();

        let specifiers = [
            "wonka", "wonka/", "wonka/x/y", "wonkax", "react", "react-dom", "@scope/pkg",
            "@scope/pkg/a", "@scope/pkgs", "dns", "dnsx", "path/posix", "url", "", "/",
        ];

        for s in specifiers {
            let expected = all
                .iter()
                .any(|d| s == *d || s.starts_with(&format!("{}/", d)));
            assert_eq!(c.is_external(s), expected, "specifier {:?}", s);
        }
    }
}
