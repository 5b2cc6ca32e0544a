//! Framework-wide error taxonomy.
//!
//! Every fallible operation in the Trellis crates returns [`Result`].
//! "Not found" outcomes that are expected control flow (an unmatched
//! alias queried leniently, an action id that resolves to nothing) are
//! represented with `Option`/sentinels at the call site, not with
//! these variants; the variants below are reserved for failures the
//! caller must handle.

use thiserror::Error;

/// Errors produced by alias resolution and action dispatch.
#[derive(Debug, Error)]
pub enum Error {
	/// Malformed alias syntax, or an unregistered root queried in
	/// fail-hard mode.
	#[error("Invalid path alias: {0}")]
	InvalidAlias(String),

	/// No executable unit could be resolved for a route or action id.
	/// Fatal to the current dispatch call.
	#[error("Unable to resolve the request: {0}")]
	RouteNotFound(String),

	/// A declaratively configured action/object descriptor is
	/// structurally invalid.
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// Parameter binding or validation failed while executing an
	/// action.
	#[error("Invalid action parameters: {0}")]
	InvalidParams(String),

	/// A view or layout could not be rendered.
	#[error("Rendering error: {0}")]
	Render(String),

	/// Internal error
	#[error("Internal error: {0}")]
	Internal(String),
}

/// Convenience alias used throughout the Trellis crates.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display_includes_detail() {
		let err = Error::RouteNotFound("site/missing".to_string());
		assert_eq!(err.to_string(), "Unable to resolve the request: site/missing");

		let err = Error::InvalidAlias("@nope/path".to_string());
		assert_eq!(err.to_string(), "Invalid path alias: @nope/path");
	}
}
