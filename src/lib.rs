//! # Trellis
//!
//! A hierarchical controller framework for Rust: path aliases,
//! module trees, and a filtered action-dispatch pipeline.
//!
//! Trellis organizes an application as a tree of modules, each a
//! namespace for controllers and nested modules. A route string walks
//! that tree to a controller, the trailing segment resolves to an
//! action, and ancestor-scope filters wrap the execution symmetrically:
//! pre-filters outermost first, post-filters in exact reverse order.
//! Path aliases (`@app`, `@runtime`, ...) give configuration a
//! portable way to name filesystem locations.
//!
//! ## Core Principles
//!
//! - **Explicit scope chains**: filtering and configuration inheritance
//!   follow the module tree, never hidden globals
//! - **Construction at the seams**: actions declared by configuration
//!   are built by a pluggable factory, not by the dispatcher
//! - **Async-first**: action bodies are futures from the ground up
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use trellis::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let app = Module::new("app");
//! let site = Controller::builder("site", &app)
//!     .handler("actionIndex", |_ctx| async { Ok(json!("home")) })
//!     .build();
//! app.add_controller(site.clone());
//!
//! let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));
//! let result = dispatcher.run(&site, "", Default::default()).await.unwrap();
//! assert_eq!(result, json!("home"));
//! # });
//! ```

pub mod aliases;
pub mod core;
pub mod dispatch;

// Re-export core types
pub use trellis_core::{Error, NullTranslator, Result, Translator, format_message};

// Re-export the alias registry
pub use trellis_aliases::{ALIAS_MARKER, AliasRegistry};

// Re-export the dispatch pipeline
pub use trellis_dispatch::{
	Action, ActionConfig, ActionContext, ActionEvent, ActionFactory, ActionFn, ActionObserver,
	ActionResolver, Controller, ControllerBuilder, Dispatcher, InlineAction, Layout, Module,
	ModuleFilter, NullActionFactory, Params, ViewRenderer, action_method_name,
};

// Re-export common external dependencies
pub use async_trait::async_trait;
pub use serde_json::{Value, json};

pub mod prelude {
	pub use crate::{
		Action, ActionConfig, ActionContext, ActionFactory, AliasRegistry, Controller, Dispatcher,
		Error, Layout, Module, ModuleFilter, NullActionFactory, Params, Result, ViewRenderer,
	};

	// External
	pub use async_trait::async_trait;
	pub use serde_json::{Value, json};
}
