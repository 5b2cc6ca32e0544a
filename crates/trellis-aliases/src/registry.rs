//! The alias registry.
//!
//! Storage model: each root token (`@foo` for `@foo/bar/baz`) maps to
//! either a single path, or — once several aliases share the root — a
//! collection of `(full alias, path)` pairs kept sorted in descending
//! order by alias so that the most specific candidate is tested first
//! during resolution.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;
use trellis_core::{Error, Result};

use crate::ALIAS_MARKER;

/// Value stored for one alias root.
#[derive(Debug, Clone)]
enum AliasTarget {
	/// The root itself is the only alias registered under it.
	Path(String),
	/// Several aliases share this root; sorted descending by alias so
	/// the longest boundary-prefix of a candidate is matched first.
	Group(Vec<(String, String)>),
}

/// Registry mapping symbolic path aliases to concrete locations.
///
/// The registry is process-wide shared state; interior locking makes
/// it safe to consult from multiple threads. Resolution is purely
/// syntactic — no existence check is performed on returned paths.
///
/// A freshly created registry contains one bootstrap entry,
/// `@trellis`, pointing at the framework's own directory.
#[derive(Debug)]
pub struct AliasRegistry {
	roots: RwLock<HashMap<String, AliasTarget>>,
}

impl AliasRegistry {
	/// Creates a registry seeded with the `@trellis` framework root.
	pub fn new() -> Self {
		let mut roots = HashMap::new();
		roots.insert(
			"@trellis".to_string(),
			AliasTarget::Path(env!("CARGO_MANIFEST_DIR").to_string()),
		);
		Self {
			roots: RwLock::new(roots),
		}
	}

	/// Creates a registry with no entries at all, not even the
	/// framework root. Mainly useful in tests.
	pub fn empty() -> Self {
		Self {
			roots: RwLock::new(HashMap::new()),
		}
	}

	/// Translates a path alias into an actual path, failing hard.
	///
	/// If `alias` does not begin with `@` it is returned unchanged, so
	/// call sites may accept either raw paths or aliases transparently.
	/// Otherwise the longest registered alias matching the beginning
	/// of `alias` (on a `/` boundary) is replaced with its registered
	/// path.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidAlias`] when the root is not registered.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_aliases::AliasRegistry;
	///
	/// let registry = AliasRegistry::new();
	/// registry.register("@web", Some("/srv/www")).unwrap();
	///
	/// assert_eq!(registry.resolve("@web/assets/app.css").unwrap(), "/srv/www/assets/app.css");
	/// assert!(registry.resolve("@unknown/x").is_err());
	/// ```
	pub fn resolve(&self, alias: &str) -> Result<String> {
		self.try_resolve(alias)
			.ok_or_else(|| Error::InvalidAlias(alias.to_string()))
	}

	/// Lenient variant of [`resolve`](Self::resolve): returns `None`
	/// instead of an error when no registered alias matches.
	pub fn try_resolve(&self, alias: &str) -> Option<String> {
		if !alias.starts_with(ALIAS_MARKER) {
			// not an alias
			return Some(alias.to_string());
		}

		let (root, has_tail) = split_root(alias);
		let roots = self.roots.read();
		match roots.get(root) {
			Some(AliasTarget::Path(path)) => {
				if has_tail {
					Some(format!("{}{}", path, &alias[root.len()..]))
				} else {
					Some(path.clone())
				}
			}
			Some(AliasTarget::Group(entries)) => {
				let padded = format!("{}/", alias);
				for (name, path) in entries {
					if padded.starts_with(&format!("{}/", name)) {
						return Some(format!("{}{}", path, &alias[name.len()..]));
					}
				}
				None
			}
			None => None,
		}
	}

	/// Returns the registered alias that `alias` resolves through,
	/// rather than the resolved path.
	///
	/// If several registered aliases match, the longest one is
	/// returned. Returns `None` when nothing matches.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_aliases::AliasRegistry;
	///
	/// let registry = AliasRegistry::new();
	/// registry.register("@a", Some("/p1")).unwrap();
	/// registry.register("@a/b", Some("/p2")).unwrap();
	///
	/// assert_eq!(registry.root_of("@a/b/z").as_deref(), Some("@a/b"));
	/// assert_eq!(registry.root_of("@a/bc").as_deref(), Some("@a"));
	/// ```
	pub fn root_of(&self, alias: &str) -> Option<String> {
		let (root, _) = split_root(alias);
		let roots = self.roots.read();
		match roots.get(root) {
			Some(AliasTarget::Path(_)) => Some(root.to_string()),
			Some(AliasTarget::Group(entries)) => {
				let padded = format!("{}/", alias);
				entries
					.iter()
					.find(|(name, _)| padded.starts_with(&format!("{}/", name)))
					.map(|(name, _)| name.clone())
			}
			None => None,
		}
	}

	/// Registers or removes a path alias.
	///
	/// `alias` is normalized to start with `@`. A `Some` target
	/// registers (overwriting any previous registration of the exact
	/// same alias); `None` removes the exact alias. Trailing `/` and
	/// `\` characters of a literal target are trimmed; a target that
	/// is itself an alias is resolved through this registry first, so
	/// aliases may target other aliases.
	///
	/// No existence check is performed on the target path.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidAlias`] when the target is an alias
	/// string that cannot itself be resolved.
	pub fn register(&self, alias: &str, target: Option<&str>) -> Result<()> {
		let alias = if alias.starts_with(ALIAS_MARKER) {
			alias.to_string()
		} else {
			format!("{}{}", ALIAS_MARKER, alias)
		};
		let (root, has_tail) = split_root(&alias);
		let root = root.to_string();

		match target {
			Some(target) => {
				let path = if target.starts_with(ALIAS_MARKER) {
					self.resolve(target)?
				} else {
					target.trim_end_matches(['/', '\\']).to_string()
				};
				debug!(alias = %alias, path = %path, "registering path alias");

				let mut roots = self.roots.write();
				match roots.remove(&root) {
					None => {
						if has_tail {
							roots.insert(root, AliasTarget::Group(vec![(alias, path)]));
						} else {
							roots.insert(root, AliasTarget::Path(path));
						}
					}
					Some(AliasTarget::Path(existing)) => {
						if has_tail {
							let mut group = vec![(alias, path), (root.clone(), existing)];
							sort_descending(&mut group);
							roots.insert(root, AliasTarget::Group(group));
						} else {
							roots.insert(root, AliasTarget::Path(path));
						}
					}
					Some(AliasTarget::Group(mut entries)) => {
						match entries.iter().position(|(name, _)| *name == alias) {
							Some(pos) => entries[pos].1 = path,
							None => entries.push((alias, path)),
						}
						sort_descending(&mut entries);
						roots.insert(root, AliasTarget::Group(entries));
					}
				}
			}
			None => {
				debug!(alias = %alias, "removing path alias");
				let mut roots = self.roots.write();
				match roots.get_mut(&root) {
					Some(AliasTarget::Group(entries)) => {
						entries.retain(|(name, _)| *name != alias);
					}
					Some(AliasTarget::Path(_)) if !has_tail => {
						roots.remove(&root);
					}
					// Removing a sub-alias of a single-path root is a
					// no-op: no such entry ever existed.
					_ => {}
				}
			}
		}

		Ok(())
	}
}

impl Default for AliasRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Splits an alias into its root token (up to the first `/`) and a
/// flag telling whether anything followed it.
fn split_root(alias: &str) -> (&str, bool) {
	match alias.find('/') {
		Some(pos) => (&alias[..pos], true),
		None => (alias, false),
	}
}

/// Descending order by alias name, so that among boundary-prefixes of
/// a candidate the longest one is encountered first.
fn sort_descending(entries: &mut [(String, String)]) {
	entries.sort_by(|a, b| b.0.cmp(&a.0));
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_non_alias_is_identity() {
		let registry = AliasRegistry::empty();
		assert_eq!(registry.resolve("/tmp/file").unwrap(), "/tmp/file");
		assert_eq!(registry.resolve("relative/path").unwrap(), "relative/path");
		assert_eq!(registry.try_resolve("").as_deref(), Some(""));
	}

	#[test]
	fn test_single_path_root_resolution() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/base")).unwrap();

		assert_eq!(registry.resolve("@a").unwrap(), "/base");
		assert_eq!(registry.resolve("@a/x/y").unwrap(), "/base/x/y");
	}

	#[test]
	fn test_longest_alias_wins_with_boundary() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/p1")).unwrap();
		registry.register("@a/b", Some("/p2")).unwrap();

		// The more specific alias shadows the root…
		assert_eq!(registry.resolve("@a/b/z").unwrap(), "/p2/z");
		assert_eq!(registry.resolve("@a/b").unwrap(), "/p2");
		// …but only on a `/` boundary: `@a/b` must not match `@a/bc`.
		assert_eq!(registry.resolve("@a/bc").unwrap(), "/p1/bc");
	}

	#[test]
	fn test_root_of_returns_longest_match() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/p1")).unwrap();
		registry.register("@a/b", Some("/p2")).unwrap();

		assert_eq!(registry.root_of("@a/b/z").as_deref(), Some("@a/b"));
		assert_eq!(registry.root_of("@a/c").as_deref(), Some("@a"));
		assert_eq!(registry.root_of("@missing/x"), None);
	}

	#[test]
	fn test_removal_restores_less_specific_entry() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/p1")).unwrap();
		registry.register("@a/b", Some("/p2")).unwrap();

		registry.register("@a/b", None).unwrap();

		assert_eq!(registry.resolve("@a/b/z").unwrap(), "/p1/b/z");
	}

	#[test]
	fn test_removal_of_only_entry_unregisters_root() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/p1")).unwrap();
		registry.register("@a", None).unwrap();

		assert!(registry.resolve("@a/z").is_err());
		assert_eq!(registry.try_resolve("@a"), None);
	}

	#[test]
	fn test_removing_sub_alias_of_single_path_root_is_noop() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/p1")).unwrap();

		registry.register("@a/b", None).unwrap();

		assert_eq!(registry.resolve("@a/b").unwrap(), "/p1/b");
	}

	#[test]
	fn test_unstrict_resolution_returns_none() {
		let registry = AliasRegistry::empty();
		assert_eq!(registry.try_resolve("@nope"), None);
		assert!(matches!(
			registry.resolve("@nope"),
			Err(Error::InvalidAlias(_))
		));
	}

	#[test]
	fn test_alias_may_target_another_alias() {
		let registry = AliasRegistry::empty();
		registry.register("@base", Some("/srv")).unwrap();
		registry.register("@logs", Some("@base/logs")).unwrap();

		assert_eq!(registry.resolve("@logs/app.log").unwrap(), "/srv/logs/app.log");
	}

	#[test]
	fn test_registering_unresolvable_alias_target_fails() {
		let registry = AliasRegistry::empty();
		let result = registry.register("@logs", Some("@missing/logs"));
		assert!(matches!(result, Err(Error::InvalidAlias(_))));
	}

	#[rstest]
	#[case("dir/", "dir")]
	#[case("dir\\", "dir")]
	#[case("dir//", "dir")]
	#[case("dir", "dir")]
	fn test_trailing_separators_trimmed(#[case] target: &str, #[case] expected_base: &str) {
		let registry = AliasRegistry::empty();
		registry.register("@d", Some(target)).unwrap();
		assert_eq!(registry.resolve("@d").unwrap(), expected_base);
	}

	#[test]
	fn test_marker_is_prepended_when_missing() {
		let registry = AliasRegistry::empty();
		registry.register("plain", Some("/p")).unwrap();
		assert_eq!(registry.resolve("@plain/x").unwrap(), "/p/x");
	}

	#[test]
	fn test_overwrite_existing_registration() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/old")).unwrap();
		registry.register("@a", Some("/new")).unwrap();
		assert_eq!(registry.resolve("@a/f").unwrap(), "/new/f");

		registry.register("@a/b", Some("/sub")).unwrap();
		registry.register("@a/b", Some("/sub2")).unwrap();
		assert_eq!(registry.resolve("@a/b/f").unwrap(), "/sub2/f");
	}

	#[test]
	fn test_bootstrap_entry_present() {
		let registry = AliasRegistry::new();
		assert!(registry.try_resolve("@trellis").is_some());
		assert_eq!(registry.root_of("@trellis/src").as_deref(), Some("@trellis"));
	}

	#[test]
	fn test_three_way_specificity() {
		let registry = AliasRegistry::empty();
		registry.register("@a", Some("/1")).unwrap();
		registry.register("@a/b", Some("/2")).unwrap();
		registry.register("@a/b/c", Some("/3")).unwrap();

		assert_eq!(registry.resolve("@a/b/c/d").unwrap(), "/3/d");
		assert_eq!(registry.resolve("@a/b/d").unwrap(), "/2/d");
		assert_eq!(registry.resolve("@a/d").unwrap(), "/1/d");
	}
}
