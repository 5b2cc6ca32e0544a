//! Action-identifier resolution.
//!
//! Turns an action id into a runnable [`Action`] against a controller:
//! the declared-action map is consulted first, then the handler table
//! under the derived method name. Ids are validated against a strict
//! grammar before any derivation happens.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::action::{Action, ActionFactory, InlineAction};
use crate::controller::Controller;
use trellis_core::Result;

/// Grammar of a well-formed action id: one or more non-empty segments
/// of lowercase letters, digits, and underscores, joined by single
/// hyphens.
static ACTION_ID_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^(?:[a-z0-9_]+-)*[a-z0-9_]+$").expect("valid action id pattern"));

/// Derives the handler-table method name for an action id: each
/// hyphen-separated segment has its first character uppercased, the
/// segments are concatenated, and the result is prefixed with
/// `action`. Underscores within a segment are kept as-is.
///
/// # Examples
///
/// ```
/// use trellis_dispatch::action_method_name;
///
/// assert_eq!(action_method_name("index"), "actionIndex");
/// assert_eq!(action_method_name("foo-bar"), "actionFooBar");
/// assert_eq!(action_method_name("foo_bar"), "actionFoo_bar");
/// ```
pub fn action_method_name(id: &str) -> String {
	let mut method = String::with_capacity(id.len() + "action".len());
	method.push_str("action");
	for segment in id.split('-') {
		let mut chars = segment.chars();
		if let Some(first) = chars.next() {
			method.push(first.to_ascii_uppercase());
			method.push_str(chars.as_str());
		}
	}
	method
}

/// Resolves action ids to runnable actions.
pub struct ActionResolver {
	factory: Arc<dyn ActionFactory>,
}

impl ActionResolver {
	pub fn new(factory: Arc<dyn ActionFactory>) -> Self {
		Self { factory }
	}

	/// Resolves `id` against `controller`. An empty id stands for the
	/// controller's default action.
	///
	/// `Ok(None)` means the id names nothing on this controller; a
	/// declared action whose construction fails is an error, not a
	/// fallthrough to the handler table.
	pub fn resolve(
		&self,
		controller: &Arc<Controller>,
		id: &str,
	) -> Result<Option<Arc<dyn Action>>> {
		let id = if id.is_empty() {
			controller.default_action()
		} else {
			id
		};

		if let Some(config) = controller.declared_action(id) {
			return self.factory.create(config, id, controller).map(Some);
		}

		if ACTION_ID_PATTERN.is_match(id) {
			let method = action_method_name(id);
			if let Some(handler) = controller.handler(&method) {
				return Ok(Some(Arc::new(InlineAction::new(
					id,
					controller.clone(),
					method,
					handler,
				))));
			}
		}

		Ok(None)
	}
}
