//! # Trellis Aliases
//!
//! Path-alias resolution for the Trellis framework.
//!
//! An alias is a short symbolic name beginning with `@` that stands
//! for a concrete resource location (a directory, a file path, a URL).
//! The registry translates aliases to paths with longest-registered-
//! alias-wins semantics: registering both `@foo` and `@foo/bar` makes
//! `@foo/bar/config` resolve through `@foo/bar`, while `@foo/barbar`
//! still resolves through `@foo` because `/` serves as the boundary
//! character.
//!
//! ## Examples
//!
//! ```
//! use trellis_aliases::AliasRegistry;
//!
//! let registry = AliasRegistry::new();
//! registry.register("@app", Some("/srv/app")).unwrap();
//! registry.register("@app/runtime", Some("/var/tmp/app")).unwrap();
//!
//! assert_eq!(registry.resolve("@app/views").unwrap(), "/srv/app/views");
//! assert_eq!(registry.resolve("@app/runtime/cache").unwrap(), "/var/tmp/app/cache");
//!
//! // Non-alias inputs pass through unchanged.
//! assert_eq!(registry.resolve("/etc/hosts").unwrap(), "/etc/hosts");
//! ```

pub mod registry;

pub use registry::AliasRegistry;

/// The reserved marker character that introduces an alias.
pub const ALIAS_MARKER: char = '@';
