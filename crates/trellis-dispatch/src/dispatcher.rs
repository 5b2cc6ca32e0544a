//! The dispatch pipeline.
//!
//! [`Dispatcher::run_action`] is the heart of the crate: it resolves an
//! action id, runs the nested pre-filter chain (ancestor modules
//! outermost first, then the controller's own observers), executes the
//! action, and unwinds the post-filter chain in exact reverse order.
//! Route strings are dispatched through [`Dispatcher::run`], which
//! applies the slash conventions for local, parent-relative, and
//! absolute routes.

use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use trellis_core::{Error, Result};

use crate::action::{Action, ActionContext, ActionFactory, Params};
use crate::controller::Controller;
use crate::module::Module;
use crate::resolver::ActionResolver;

/// Drives action resolution and the filtered execution pipeline.
///
/// One dispatcher serves the whole module tree; it is shared (`Arc`)
/// so running actions can issue nested dispatches through their
/// [`ActionContext`].
pub struct Dispatcher {
	resolver: ActionResolver,
	requested_action: RwLock<Option<Arc<dyn Action>>>,
	this: Weak<Self>,
}

impl Dispatcher {
	pub fn new(factory: Arc<dyn ActionFactory>) -> Arc<Self> {
		Arc::new_cyclic(|this| Self {
			resolver: ActionResolver::new(factory),
			requested_action: RwLock::new(None),
			this: this.clone(),
		})
	}

	/// A shared handle to this dispatcher. Dispatchers are only ever
	/// constructed behind an `Arc`, so the upgrade cannot fail while
	/// `self` is borrowed.
	fn handle(&self) -> Arc<Self> {
		self.this.upgrade().expect("dispatcher is behind an Arc")
	}

	/// The first action dispatched through this dispatcher, if any.
	/// Nested dispatches never overwrite it.
	pub fn requested_action(&self) -> Option<Arc<dyn Action>> {
		self.requested_action.read().clone()
	}

	/// Resolves `id` against `controller` and runs it through the full
	/// filter pipeline.
	///
	/// The pre-filter phase asks each ancestor module, outermost
	/// first, then the controller itself; the first refusal
	/// short-circuits the dispatch with a `Null` result and no action
	/// execution. The post-filter phase runs only for scopes whose
	/// pre-filter ran and approved, in exact reverse order, each
	/// seeing the result as rewritten by the scopes inside it.
	///
	/// The controller's current-action slot is saved on entry and
	/// restored on every exit path, so nested dispatch on the same
	/// controller leaves the outer state intact.
	///
	/// # Errors
	///
	/// Returns [`Error::RouteNotFound`] when the id resolves to
	/// nothing, and propagates action and factory failures.
	pub async fn run_action(
		&self,
		controller: &Arc<Controller>,
		id: &str,
		params: Params,
	) -> Result<Value> {
		let action = self
			.resolver
			.resolve(controller, id)?
			.ok_or_else(|| {
				Error::RouteNotFound(format!("{}/{}", controller.unique_id(), id))
			})?;
		tracing::debug!(route = %action.unique_id(), "running action");

		{
			let mut requested = self.requested_action.write();
			if requested.is_none() {
				*requested = Some(action.clone());
			}
		}

		let previous = controller.swap_action(Some(action.clone()));

		// Ancestor pre-filters, outermost first. Only scopes that ran
		// and approved take part in the post-filter unwind.
		let mut ran: Vec<Arc<Module>> = Vec::new();
		let mut approved = true;
		for module in controller.modules() {
			if module.before_action(action.as_ref()) {
				ran.push(module);
			} else {
				approved = false;
				break;
			}
		}

		let mut outcome = Ok(Value::Null);
		if approved && controller.before_action(&action) {
			let ctx = ActionContext {
				dispatcher: self.handle(),
				controller: controller.clone(),
				params,
			};
			outcome = match action.run(ctx).await {
				Ok(value) => {
					let mut result = controller.after_action(&action, value);
					for module in ran.iter().rev() {
						result = module.after_action(action.as_ref(), result);
					}
					Ok(result)
				}
				Err(err) => Err(err),
			};
		}

		controller.swap_action(previous);
		outcome
	}

	/// Dispatches a route string relative to `controller`.
	///
	/// A route without a slash is an action id on `controller` itself.
	/// A route with an interior slash is handed to the controller's
	/// own module for a tree walk. A leading slash anchors the walk at
	/// the root module.
	pub fn run<'a>(
		&'a self,
		controller: &'a Arc<Controller>,
		route: &'a str,
		params: Params,
	) -> BoxFuture<'a, Result<Value>> {
		match route.find('/') {
			None => Box::pin(self.run_action(controller, route, params)),
			Some(0) => {
				let root = controller.module().root();
				Box::pin(async move {
					self.run_route(&root, route.trim_start_matches('/'), params)
						.await
				})
			}
			Some(_) => self.run_route(controller.module(), route, params),
		}
	}

	/// Walks the module tree for `route`: the leading segment selects
	/// a child module (recursing into it) or a controller (whose
	/// remainder is the action id, empty meaning the default action).
	pub fn run_route<'a>(
		&'a self,
		module: &'a Arc<Module>,
		route: &'a str,
		params: Params,
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			let (head, rest) = match route.find('/') {
				Some(pos) => (&route[..pos], &route[pos + 1..]),
				None => (route, ""),
			};

			if let Some(child) = module.submodule(head) {
				if route.contains('/') {
					return self.run_route(&child, rest, params).await;
				}
				return Err(not_found(module, route));
			}
			if let Some(controller) = module.controller(head) {
				if rest.contains('/') {
					return Err(not_found(module, route));
				}
				return self.run_action(&controller, rest, params).await;
			}
			Err(not_found(module, route))
		})
	}
}

fn not_found(module: &Arc<Module>, route: &str) -> Error {
	let prefix = module.unique_id();
	if prefix.is_empty() {
		Error::RouteNotFound(route.to_string())
	} else {
		Error::RouteNotFound(format!("{}/{}", prefix, route))
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field(
				"requested_action",
				&self.requested_action().map(|a| a.unique_id()),
			)
			.finish_non_exhaustive()
	}
}
