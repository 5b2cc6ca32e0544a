//! Controllers: the dispatch scopes actions resolve against.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use trellis_aliases::{ALIAS_MARKER, AliasRegistry};
use trellis_core::Result;

use crate::action::{Action, ActionConfig, ActionContext, ActionFn, Params};
use crate::event::{ActionEvent, ActionObserver};
use crate::module::{Layout, Module};
use crate::view::ViewRenderer;

/// A dispatch scope: owns the handler table and declarative action
/// map that identifiers resolve against, fires before/after
/// notifications around execution, and tracks the action currently
/// executing (save/restored around nested dispatch).
///
/// Controllers are built once at configuration time via
/// [`Controller::builder`] and registered on their module.
pub struct Controller {
	id: String,
	module: Arc<Module>,
	default_action: String,
	layout: RwLock<Layout>,
	view_path: RwLock<Option<String>>,
	declared: HashMap<String, ActionConfig>,
	handlers: HashMap<String, ActionFn>,
	before_observers: RwLock<Vec<ActionObserver>>,
	after_observers: RwLock<Vec<ActionObserver>>,
	action: RwLock<Option<Arc<dyn Action>>>,
}

impl Controller {
	/// Starts building a controller owned by `module`.
	pub fn builder(id: &str, module: &Arc<Module>) -> ControllerBuilder {
		ControllerBuilder {
			id: id.to_string(),
			module: module.clone(),
			default_action: "index".to_string(),
			layout: Layout::Inherit,
			declared: HashMap::new(),
			handlers: HashMap::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn module(&self) -> &Arc<Module> {
		&self.module
	}

	/// The action id used when a dispatch names none.
	pub fn default_action(&self) -> &str {
		&self.default_action
	}

	/// The controller id prefixed with its module's unique id.
	pub fn unique_id(&self) -> String {
		let prefix = self.module.unique_id();
		if prefix.is_empty() {
			self.id.clone()
		} else {
			format!("{}/{}", prefix, self.id)
		}
	}

	/// The route of the current request: the running action's unique
	/// id, or this controller's unique id when nothing is executing.
	pub fn route(&self) -> String {
		match self.action.read().as_ref() {
			Some(action) => action.unique_id(),
			None => self.unique_id(),
		}
	}

	/// The action currently executing on this controller, if any.
	pub fn action(&self) -> Option<Arc<dyn Action>> {
		self.action.read().clone()
	}

	/// Swaps the current-action slot, returning the previous value so
	/// the caller can restore it after a nested dispatch.
	pub(crate) fn swap_action(&self, action: Option<Arc<dyn Action>>) -> Option<Arc<dyn Action>> {
		std::mem::replace(&mut *self.action.write(), action)
	}

	/// All ancestor modules of this controller, outermost (the
	/// application scope) first.
	pub fn modules(&self) -> Vec<Arc<Module>> {
		self.module.ancestry()
	}

	pub(crate) fn declared_action(&self, id: &str) -> Option<&ActionConfig> {
		self.declared.get(id)
	}

	/// Exact-case handler-table lookup.
	pub(crate) fn handler(&self, method: &str) -> Option<ActionFn> {
		self.handlers.get(method).cloned()
	}

	/// Registers an observer fired right before any action on this
	/// controller executes. Observers may clear
	/// [`ActionEvent::is_valid`] to cancel the execution.
	pub fn on_before_action(&self, observer: impl Fn(&mut ActionEvent) + Send + Sync + 'static) {
		self.before_observers.write().push(Arc::new(observer));
	}

	/// Registers an observer fired right after any action on this
	/// controller executes. Observers may rewrite
	/// [`ActionEvent::result`].
	pub fn on_after_action(&self, observer: impl Fn(&mut ActionEvent) + Send + Sync + 'static) {
		self.after_observers.write().push(Arc::new(observer));
	}

	/// Fires the before-action notification and reports whether the
	/// action should run.
	pub fn before_action(&self, action: &Arc<dyn Action>) -> bool {
		let observers = self.before_observers.read().clone();
		let mut event = ActionEvent::new(action.clone());
		for observer in &observers {
			observer(&mut event);
		}
		event.is_valid
	}

	/// Fires the after-action notification and returns the (possibly
	/// rewritten) result.
	pub fn after_action(&self, action: &Arc<dyn Action>, result: Value) -> Value {
		let observers = self.after_observers.read().clone();
		let mut event = ActionEvent::with_result(action.clone(), result);
		for observer in &observers {
			observer(&mut event);
		}
		event.result.take().unwrap_or(Value::Null)
	}

	pub fn layout(&self) -> Layout {
		self.layout.read().clone()
	}

	pub fn set_layout(&self, layout: Layout) {
		*self.layout.write() = layout;
	}

	/// Directory containing this controller's view files; defaults to
	/// the controller id under the module's view path.
	pub fn view_path(&self) -> String {
		self.view_path
			.read()
			.clone()
			.unwrap_or_else(|| format!("{}/{}", self.module.view_path(), self.id))
	}

	pub fn set_view_path(&self, path: &str) {
		*self.view_path.write() = Some(path.to_string());
	}

	/// Renders a view and applies the applicable layout, if any.
	pub fn render(
		&self,
		renderer: &dyn ViewRenderer,
		aliases: &AliasRegistry,
		view: &str,
		params: &Params,
	) -> Result<String> {
		let content = renderer.render(view, params)?;
		self.render_content(renderer, aliases, content)
	}

	/// Renders a view without applying any layout.
	pub fn render_partial(
		&self,
		renderer: &dyn ViewRenderer,
		view: &str,
		params: &Params,
	) -> Result<String> {
		renderer.render(view, params)
	}

	/// Wraps already-rendered content in the applicable layout; the
	/// content is handed to the layout as the `content` parameter. If
	/// layouts are disabled for this scope the content is returned
	/// unchanged.
	pub fn render_content(
		&self,
		renderer: &dyn ViewRenderer,
		aliases: &AliasRegistry,
		content: String,
	) -> Result<String> {
		match self.find_layout_file(aliases, renderer)? {
			Some(layout_file) => {
				let mut params = Params::new();
				params.insert("content".to_string(), Value::String(content));
				renderer.render_file(&layout_file, &params)
			}
			None => Ok(content),
		}
	}

	/// Finds the applicable layout file for this controller.
	///
	/// The layout designator comes from this controller if set,
	/// otherwise from the nearest ancestor module with a non-inherit
	/// designator. A designator starting with `@` is resolved through
	/// the alias registry; one starting with `/` is relative to the
	/// application's layout path; anything else is relative to the
	/// context module's layout path. The renderer's default extension
	/// is appended when the designator carries none.
	pub fn find_layout_file(
		&self,
		aliases: &AliasRegistry,
		renderer: &dyn ViewRenderer,
	) -> Result<Option<String>> {
		let resolved = match self.layout() {
			Layout::Named(name) => Some((name, self.module.clone())),
			Layout::Disabled => None,
			Layout::Inherit => inherited_layout(&self.module),
		};
		let Some((layout, context)) = resolved else {
			return Ok(None);
		};

		let file = if layout.starts_with(ALIAS_MARKER) {
			aliases.resolve(&layout)?
		} else if let Some(rest) = layout.strip_prefix('/') {
			format!("{}/{}", self.module.root().layout_path(), rest)
		} else {
			format!("{}/{}", context.layout_path(), layout)
		};

		let file = if Path::new(&file).extension().is_some() {
			file
		} else {
			format!("{}.{}", file, renderer.default_extension())
		};
		Ok(Some(file))
	}
}

/// Walks the module chain upwards for the first non-inherit layout
/// designator.
fn inherited_layout(module: &Arc<Module>) -> Option<(String, Arc<Module>)> {
	let mut current = Some(module.clone());
	while let Some(module) = current {
		match module.layout() {
			Layout::Named(name) => return Some((name, module)),
			Layout::Disabled => return None,
			Layout::Inherit => current = module.parent(),
		}
	}
	None
}

impl std::fmt::Debug for Controller {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Controller")
			.field("id", &self.id)
			.field("unique_id", &self.unique_id())
			.field("default_action", &self.default_action)
			.finish_non_exhaustive()
	}
}

/// Builder collecting a controller's configuration-time state: the
/// handler table, declarative actions, default action, and layout.
pub struct ControllerBuilder {
	id: String,
	module: Arc<Module>,
	default_action: String,
	layout: Layout,
	declared: HashMap<String, ActionConfig>,
	handlers: HashMap<String, ActionFn>,
}

impl ControllerBuilder {
	/// Overrides the default action id (initially `"index"`).
	pub fn default_action(mut self, id: &str) -> Self {
		self.default_action = id.to_string();
		self
	}

	pub fn layout(mut self, layout: Layout) -> Self {
		self.layout = layout;
		self
	}

	/// Registers a handler-table entry. The name must be the full
	/// method name the resolver derives from an action id, e.g.
	/// `"actionFooBar"` for the id `foo-bar`; lookup is exact-case.
	pub fn handler<F, Fut>(mut self, name: &str, handler: F) -> Self
	where
		F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Value>> + Send + 'static,
	{
		let handler: ActionFn = Arc::new(move |ctx| -> BoxFuture<'static, Result<Value>> {
			Box::pin(handler(ctx))
		});
		self.handlers.insert(name.to_string(), handler);
		self
	}

	/// Declares an externally constructed action for `id`.
	pub fn declare(mut self, id: &str, config: ActionConfig) -> Self {
		self.declared.insert(id.to_string(), config);
		self
	}

	pub fn build(self) -> Arc<Controller> {
		Arc::new(Controller {
			id: self.id,
			module: self.module,
			default_action: self.default_action,
			layout: RwLock::new(self.layout),
			view_path: RwLock::new(None),
			declared: self.declared,
			handlers: self.handlers,
			before_observers: RwLock::new(Vec::new()),
			after_observers: RwLock::new(Vec::new()),
			action: RwLock::new(None),
		})
	}
}
