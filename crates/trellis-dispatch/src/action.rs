//! Executable units and the object-construction seam.
//!
//! An [`Action`] is the resolved, runnable piece of logic bound to an
//! identifier within a controller. Actions are created fresh for every
//! dispatch and never cached across requests. They come in two
//! flavors: [`InlineAction`], binding an entry of the controller's
//! handler table, and externally constructed actions produced by an
//! [`ActionFactory`] from a declarative [`ActionConfig`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use trellis_core::{Error, Result};

use crate::controller::Controller;
use crate::dispatcher::Dispatcher;

/// Name-value parameters passed to an action.
pub type Params = HashMap<String, Value>;

/// Boxed handler stored in a controller's handler table.
pub type ActionFn = Arc<dyn Fn(ActionContext) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Everything an action body needs while running: the dispatcher (for
/// nested dispatch), the owning controller, and the request
/// parameters.
pub struct ActionContext {
	pub dispatcher: Arc<Dispatcher>,
	pub controller: Arc<Controller>,
	pub params: Params,
}

impl ActionContext {
	/// Returns the named parameter, if present.
	pub fn param(&self, name: &str) -> Option<&Value> {
		self.params.get(name)
	}

	/// Returns the named parameter or fails with
	/// [`Error::InvalidParams`].
	pub fn require(&self, name: &str) -> Result<&Value> {
		self.params
			.get(name)
			.ok_or_else(|| Error::InvalidParams(format!("missing required parameter \"{}\"", name)))
	}
}

/// The resolved, runnable piece of logic bound to an identifier
/// within a controller.
#[async_trait]
pub trait Action: Send + Sync {
	/// The action id, e.g. `"index"` or `"foo-bar"`.
	fn id(&self) -> &str;

	/// The controller that owns this action.
	fn controller(&self) -> &Arc<Controller>;

	/// The action id prefixed with the controller's unique id.
	fn unique_id(&self) -> String {
		format!("{}/{}", self.controller().unique_id(), self.id())
	}

	/// Runs the action. Parameter binding and validation failures are
	/// reported through the returned `Result`.
	async fn run(&self, ctx: ActionContext) -> Result<Value>;
}

/// An action backed by an entry of the controller's handler table.
pub struct InlineAction {
	id: String,
	controller: Arc<Controller>,
	method: String,
	handler: ActionFn,
}

impl InlineAction {
	pub fn new(id: &str, controller: Arc<Controller>, method: String, handler: ActionFn) -> Self {
		Self {
			id: id.to_string(),
			controller,
			method,
			handler,
		}
	}

	/// The handler-table name this action is bound to, e.g.
	/// `"actionFooBar"`.
	pub fn method(&self) -> &str {
		&self.method
	}
}

#[async_trait]
impl Action for InlineAction {
	fn id(&self) -> &str {
		&self.id
	}

	fn controller(&self) -> &Arc<Controller> {
		&self.controller
	}

	async fn run(&self, ctx: ActionContext) -> Result<Value> {
		(self.handler)(ctx).await
	}
}

/// Declarative descriptor for an externally constructed action:
/// either a bare type name, or a configuration map whose `type` entry
/// names the type and whose remaining entries are initial property
/// values.
#[derive(Debug, Clone)]
pub enum ActionConfig {
	Type(String),
	Config(Map<String, Value>),
}

impl ActionConfig {
	/// The type name this descriptor asks for.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidConfiguration`] for a configuration map
	/// without a string `type` entry.
	pub fn type_name(&self) -> Result<&str> {
		match self {
			Self::Type(name) => Ok(name),
			Self::Config(map) => map.get("type").and_then(Value::as_str).ok_or_else(|| {
				Error::InvalidConfiguration(
					"object configuration must contain a \"type\" entry".to_string(),
				)
			}),
		}
	}

	/// Returns an initial property value from a configuration map.
	pub fn property(&self, name: &str) -> Option<&Value> {
		match self {
			Self::Type(_) => None,
			Self::Config(map) => {
				if name == "type" {
					None
				} else {
					map.get(name)
				}
			}
		}
	}
}

impl From<&str> for ActionConfig {
	fn from(type_name: &str) -> Self {
		Self::Type(type_name.to_string())
	}
}

/// External object-construction capability.
///
/// Construction itself (dependency injection, type registries) lives
/// outside this crate; the dispatcher only hands the factory the
/// descriptor plus the positional arguments `(id, controller)` and
/// expects a ready action back.
pub trait ActionFactory: Send + Sync {
	/// Creates an action from a declarative descriptor.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidConfiguration`] when the descriptor is
	/// structurally invalid or names an unknown type.
	fn create(
		&self,
		config: &ActionConfig,
		id: &str,
		controller: &Arc<Controller>,
	) -> Result<Arc<dyn Action>>;
}

/// Factory for applications that only use handler-table actions; any
/// declarative descriptor is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActionFactory;

impl ActionFactory for NullActionFactory {
	fn create(
		&self,
		config: &ActionConfig,
		id: &str,
		_controller: &Arc<Controller>,
	) -> Result<Arc<dyn Action>> {
		let type_name = config.type_name()?;
		Err(Error::InvalidConfiguration(format!(
			"no action factory is installed to construct \"{}\" for action \"{}\"",
			type_name, id
		)))
	}
}
