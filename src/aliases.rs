//! Path alias registry.
//!
//! # Examples
//!
//! ```rust
//! use trellis::aliases::AliasRegistry;
//!
//! let aliases = AliasRegistry::empty();
//! aliases.register("@app", Some("/srv/app")).unwrap();
//! assert_eq!(aliases.resolve("@app/runtime").unwrap(), "/srv/app/runtime");
//! ```

pub use trellis_aliases::*;
