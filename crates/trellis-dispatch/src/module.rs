//! Hierarchical scope nodes.
//!
//! A [`Module`] is a namespace node in the ancestor chain used for
//! nested filtering and inherited configuration. Modules form an
//! acyclic parent chain terminating at a root module (the
//! application scope); the chain is fixed at configuration time and
//! only the layout designator and filter hook are mutable afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::action::Action;
use crate::controller::Controller;

/// Layout designator of a module or controller.
///
/// `Inherit` defers to the parent scope, `Disabled` switches layouts
/// off for the subtree, `Named` selects a layout view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
	#[default]
	Inherit,
	Disabled,
	Named(String),
}

/// Pre/post filter hook attached to a module.
///
/// `before_action` returning `false` short-circuits the dispatch
/// pipeline for every scope nested below this one; `after_action` may
/// rewrite the in-flight result. Both default to pass-through.
pub trait ModuleFilter: Send + Sync {
	fn before_action(&self, _action: &dyn Action) -> bool {
		true
	}

	fn after_action(&self, _action: &dyn Action, result: Value) -> Value {
		result
	}
}

/// A hierarchical namespace node.
///
/// Modules are shared (`Arc`) and looked up by identifier; children
/// do not own their parent. Created at configuration time, they live
/// for the process lifetime.
pub struct Module {
	id: String,
	parent: Option<Arc<Module>>,
	base_path: RwLock<Option<String>>,
	view_path: RwLock<Option<String>>,
	layout_path: RwLock<Option<String>>,
	layout: RwLock<Layout>,
	filter: RwLock<Option<Arc<dyn ModuleFilter>>>,
	modules: RwLock<HashMap<String, Arc<Module>>>,
	controllers: RwLock<HashMap<String, Arc<Controller>>>,
}

impl Module {
	/// Creates a root module (the application scope).
	pub fn new(id: &str) -> Arc<Self> {
		Arc::new(Self {
			id: id.to_string(),
			parent: None,
			base_path: RwLock::new(None),
			view_path: RwLock::new(None),
			layout_path: RwLock::new(None),
			layout: RwLock::new(Layout::Inherit),
			filter: RwLock::new(None),
			modules: RwLock::new(HashMap::new()),
			controllers: RwLock::new(HashMap::new()),
		})
	}

	/// Creates a child module and registers it under `parent`.
	pub fn with_parent(id: &str, parent: &Arc<Module>) -> Arc<Self> {
		let module = Arc::new(Self {
			id: id.to_string(),
			parent: Some(parent.clone()),
			base_path: RwLock::new(None),
			view_path: RwLock::new(None),
			layout_path: RwLock::new(None),
			layout: RwLock::new(Layout::Inherit),
			filter: RwLock::new(None),
			modules: RwLock::new(HashMap::new()),
			controllers: RwLock::new(HashMap::new()),
		});
		parent
			.modules
			.write()
			.insert(id.to_string(), module.clone());
		module
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn parent(&self) -> Option<Arc<Module>> {
		self.parent.clone()
	}

	/// The module id prefixed with the ids of all ancestor modules.
	/// Empty for the root module.
	pub fn unique_id(&self) -> String {
		match &self.parent {
			None => String::new(),
			Some(parent) => {
				let prefix = parent.unique_id();
				if prefix.is_empty() {
					self.id.clone()
				} else {
					format!("{}/{}", prefix, self.id)
				}
			}
		}
	}

	/// The ancestor chain from the root module down to (and
	/// including) this one.
	pub fn ancestry(self: &Arc<Self>) -> Vec<Arc<Module>> {
		let mut chain = Vec::new();
		let mut current = Some(self.clone());
		while let Some(module) = current {
			current = module.parent();
			chain.push(module);
		}
		chain.reverse();
		chain
	}

	/// The root module of this module's chain.
	pub fn root(self: &Arc<Self>) -> Arc<Module> {
		let mut current = self.clone();
		while let Some(parent) = current.parent() {
			current = parent;
		}
		current
	}

	/// Base path all other paths of this module derive from. Defaults
	/// to `@app` for a root module and `<parent>/modules/<id>`
	/// otherwise.
	pub fn base_path(&self) -> String {
		if let Some(path) = self.base_path.read().clone() {
			return path;
		}
		match &self.parent {
			None => "@app".to_string(),
			Some(parent) => format!("{}/modules/{}", parent.base_path(), self.id),
		}
	}

	pub fn set_base_path(&self, path: &str) {
		*self.base_path.write() = Some(path.to_string());
	}

	/// Directory containing this module's view files.
	pub fn view_path(&self) -> String {
		self.view_path
			.read()
			.clone()
			.unwrap_or_else(|| format!("{}/views", self.base_path()))
	}

	pub fn set_view_path(&self, path: &str) {
		*self.view_path.write() = Some(path.to_string());
	}

	/// Directory containing this module's layout files.
	pub fn layout_path(&self) -> String {
		self.layout_path
			.read()
			.clone()
			.unwrap_or_else(|| format!("{}/layouts", self.view_path()))
	}

	pub fn set_layout_path(&self, path: &str) {
		*self.layout_path.write() = Some(path.to_string());
	}

	pub fn layout(&self) -> Layout {
		self.layout.read().clone()
	}

	pub fn set_layout(&self, layout: Layout) {
		*self.layout.write() = layout;
	}

	/// Installs the pre/post filter hook for this module.
	pub fn set_filter(&self, filter: Arc<dyn ModuleFilter>) {
		*self.filter.write() = Some(filter);
	}

	/// Invokes this module's pre-filter. `true` without a filter.
	pub fn before_action(&self, action: &dyn Action) -> bool {
		let filter = self.filter.read().clone();
		match filter {
			Some(filter) => filter.before_action(action),
			None => true,
		}
	}

	/// Invokes this module's post-filter; the result is passed
	/// through unchanged without a filter.
	pub fn after_action(&self, action: &dyn Action, result: Value) -> Value {
		let filter = self.filter.read().clone();
		match filter {
			Some(filter) => filter.after_action(action, result),
			None => result,
		}
	}

	/// Looks up a direct child module by id.
	pub fn submodule(&self, id: &str) -> Option<Arc<Module>> {
		self.modules.read().get(id).cloned()
	}

	/// Looks up a controller registered under this module.
	pub fn controller(&self, id: &str) -> Option<Arc<Controller>> {
		self.controllers.read().get(id).cloned()
	}

	/// Registers a controller under this module, keyed by its id.
	pub fn add_controller(&self, controller: Arc<Controller>) {
		self.controllers
			.write()
			.insert(controller.id().to_string(), controller);
	}
}

impl std::fmt::Debug for Module {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Module")
			.field("id", &self.id)
			.field("unique_id", &self.unique_id())
			.finish_non_exhaustive()
	}
}
