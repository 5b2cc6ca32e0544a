//! View rendering seam.
//!
//! Rendering is an external concern; the dispatch crate only needs a
//! way to turn a view reference or a concrete file path into text.

use crate::action::Params;
use trellis_core::Result;

/// External template-rendering capability consumed by
/// [`Controller::render`](crate::Controller::render) and friends.
pub trait ViewRenderer: Send + Sync {
	/// Renders a view by reference (name, alias, or path — the
	/// renderer decides how to interpret it).
	fn render(&self, view: &str, params: &Params) -> Result<String>;

	/// Renders a concrete view file.
	fn render_file(&self, path: &str, params: &Params) -> Result<String>;

	/// File extension appended to layout designators that carry none.
	fn default_extension(&self) -> &str {
		"html"
	}
}
