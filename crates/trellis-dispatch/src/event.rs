//! Action lifecycle events.

use std::sync::Arc;

use serde_json::Value;

use crate::action::Action;

/// Short-lived value passed to before/after observers around one
/// action execution.
///
/// Before execution, observers may clear [`is_valid`](Self::is_valid)
/// to cancel the action. After execution, observers may inspect and
/// rewrite the [`result`](Self::result) slot.
pub struct ActionEvent {
	/// The action this event is about.
	pub action: Arc<dyn Action>,
	/// Whether execution should proceed. Defaults to `true`.
	pub is_valid: bool,
	/// The in-flight action result (post-filter phase only).
	pub result: Option<Value>,
}

impl ActionEvent {
	/// Creates a pre-execution event.
	pub fn new(action: Arc<dyn Action>) -> Self {
		Self {
			action,
			is_valid: true,
			result: None,
		}
	}

	/// Creates a post-execution event carrying the raw result.
	pub fn with_result(action: Arc<dyn Action>, result: Value) -> Self {
		Self {
			action,
			is_valid: true,
			result: Some(result),
		}
	}
}

/// Observer callback invoked with a mutable event.
pub type ActionObserver = Arc<dyn Fn(&mut ActionEvent) + Send + Sync>;
