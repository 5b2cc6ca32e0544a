//! # Trellis Core
//!
//! Shared foundation for the Trellis framework crates: the error
//! taxonomy used across alias resolution and action dispatch, and the
//! message-formatting fallback used when no translation backend is
//! installed.

pub mod exception;
pub mod messages;

pub use exception::{Error, Result};
pub use messages::{NullTranslator, Translator, format_message};
