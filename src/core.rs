//! Core error and message-formatting types.
//!
//! # Examples
//!
//! ```rust
//! use trellis::core::format_message;
//! use std::collections::HashMap;
//!
//! let mut params = HashMap::new();
//! params.insert("alias".to_string(), "@missing".to_string());
//! assert_eq!(
//!     format_message("Unknown alias {alias}", &params),
//!     "Unknown alias @missing",
//! );
//! ```

pub use trellis_core::*;
