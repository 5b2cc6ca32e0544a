//! # Trellis Dispatch
//!
//! Controller action resolution and the dispatch pipeline for the
//! Trellis framework.
//!
//! ## Overview
//!
//! A request route enters the [`Dispatcher`], which resolves the
//! trailing segment into an executable [`Action`] on a [`Controller`]
//! and runs the filter chain around its execution:
//!
//! ```text
//! route → resolve → module pre-filters (outermost → innermost)
//!       → controller pre-filter → action body
//!       → controller post-filter → module post-filters (reverse)
//!       → result
//! ```
//!
//! Any module pre-filter may short-circuit the pipeline by returning
//! `false`; post-filters then run for no ancestor at all, and the
//! dispatch completes with a null result rather than an error.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use trellis_dispatch::{Controller, Dispatcher, Module, NullActionFactory};
//!
//! # tokio_test::block_on(async {
//! let app = Module::new("app");
//! let site = Controller::builder("site", &app)
//!     .handler("actionIndex", |_ctx| async { Ok(json!("home")) })
//!     .build();
//! app.add_controller(site.clone());
//!
//! let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));
//! let result = dispatcher.run_action(&site, "index", Default::default()).await.unwrap();
//! assert_eq!(result, json!("home"));
//! # });
//! ```

pub mod action;
pub mod controller;
pub mod dispatcher;
pub mod event;
pub mod module;
pub mod resolver;
pub mod view;

// Re-exports
pub use action::{
	Action, ActionConfig, ActionContext, ActionFactory, ActionFn, InlineAction, NullActionFactory,
	Params,
};
pub use controller::{Controller, ControllerBuilder};
pub use dispatcher::Dispatcher;
pub use event::{ActionEvent, ActionObserver};
pub use module::{Layout, Module, ModuleFilter};
pub use resolver::{ActionResolver, action_method_name};
pub use view::ViewRenderer;

pub use trellis_core::{Error, Result};
