//! Message translation seam.
//!
//! Translation itself is an external concern; this module only defines
//! the collaborator trait and the placeholder-substitution fallback
//! applied when no backend is installed.

use std::collections::HashMap;

/// Substitutes `{name}` placeholders in `message` with the matching
/// values from `params`.
///
/// This is the behavior callers get when no [`Translator`] backend is
/// configured: no language lookup, just parameter interpolation.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use trellis_core::messages::format_message;
///
/// let mut params = HashMap::new();
/// params.insert("username".to_string(), "Alexander".to_string());
/// assert_eq!(
///     format_message("Hello, {username}!", &params),
///     "Hello, Alexander!"
/// );
/// ```
pub fn format_message(message: &str, params: &HashMap<String, String>) -> String {
	if params.is_empty() {
		return message.to_string();
	}

	let mut out = message.to_string();
	for (name, value) in params {
		out = out.replace(&format!("{{{}}}", name), value);
	}
	out
}

/// A translation backend.
///
/// Implementations translate `message` within `category` into the
/// given locale, then interpolate `params`. The default implementation
/// skips translation and only interpolates.
pub trait Translator: Send + Sync {
	/// Translates a message to the specified locale.
	fn translate(
		&self,
		_category: &str,
		message: &str,
		params: &HashMap<String, String>,
		_locale: &str,
	) -> String {
		format_message(message, params)
	}
}

/// Backend that performs no translation, only interpolation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTranslator;

impl Translator for NullTranslator {}
