//! Integration tests for the filtered dispatch pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::{Value, json};
use trellis_dispatch::{
	Controller, Dispatcher, Error, Module, ModuleFilter, NullActionFactory, Params,
};

/// Filter that records its invocations in a shared journal and
/// answers `before_action` with a configured verdict.
struct JournalFilter {
	name: &'static str,
	allow: bool,
	journal: Arc<Mutex<Vec<String>>>,
}

impl JournalFilter {
	fn install(
		module: &Arc<Module>,
		name: &'static str,
		allow: bool,
		journal: &Arc<Mutex<Vec<String>>>,
	) {
		module.set_filter(Arc::new(Self {
			name,
			allow,
			journal: journal.clone(),
		}));
	}
}

impl ModuleFilter for JournalFilter {
	fn before_action(&self, _action: &dyn trellis_dispatch::Action) -> bool {
		self.journal.lock().push(format!("before:{}", self.name));
		self.allow
	}

	fn after_action(&self, _action: &dyn trellis_dispatch::Action, result: Value) -> Value {
		self.journal.lock().push(format!("after:{}", self.name));
		json!({ "wrapped_by": self.name, "inner": result })
	}
}

fn nested_tree() -> (Arc<Module>, Arc<Module>, Arc<Module>) {
	let app = Module::new("app");
	let admin = Module::with_parent("admin", &app);
	let reports = Module::with_parent("reports", &admin);
	(app, admin, reports)
}

#[tokio::test]
async fn test_filters_wrap_in_reverse_order() {
	let (app, admin, reports) = nested_tree();
	let journal = Arc::new(Mutex::new(Vec::new()));
	JournalFilter::install(&app, "app", true, &journal);
	JournalFilter::install(&admin, "admin", true, &journal);
	JournalFilter::install(&reports, "reports", true, &journal);

	let journal_for_action = journal.clone();
	let summary = Controller::builder("summary", &reports)
		.handler("actionIndex", move |_ctx| {
			let journal = journal_for_action.clone();
			async move {
				journal.lock().push("action".to_string());
				Ok(json!("report"))
			}
		})
		.build();
	reports.add_controller(summary.clone());

	let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));
	let result = dispatcher
		.run_action(&summary, "index", Params::new())
		.await
		.unwrap();

	// Pre-filters outermost first, post-filters innermost first.
	assert_eq!(
		*journal.lock(),
		vec![
			"before:app",
			"before:admin",
			"before:reports",
			"action",
			"after:reports",
			"after:admin",
			"after:app",
		]
	);
	// Each post-filter saw the result as rewritten by the scopes
	// inside it.
	assert_eq!(
		result,
		json!({
			"wrapped_by": "app",
			"inner": {
				"wrapped_by": "admin",
				"inner": { "wrapped_by": "reports", "inner": "report" }
			}
		})
	);
}

#[tokio::test]
async fn test_middle_refusal_short_circuits() {
	let (app, admin, reports) = nested_tree();
	let journal = Arc::new(Mutex::new(Vec::new()));
	JournalFilter::install(&app, "app", true, &journal);
	JournalFilter::install(&admin, "admin", false, &journal);
	JournalFilter::install(&reports, "reports", true, &journal);

	let ran = Arc::new(AtomicUsize::new(0));
	let ran_in_action = ran.clone();
	let summary = Controller::builder("summary", &reports)
		.handler("actionIndex", move |_ctx| {
			let ran = ran_in_action.clone();
			async move {
				ran.fetch_add(1, Ordering::SeqCst);
				Ok(json!("report"))
			}
		})
		.build();
	reports.add_controller(summary.clone());

	let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));
	let result = dispatcher
		.run_action(&summary, "index", Params::new())
		.await
		.unwrap();

	// The refusing scope's pre-filter ran; nothing inside it did, and
	// no post-filter ran anywhere.
	assert_eq!(*journal.lock(), vec!["before:app", "before:admin"]);
	assert_eq!(ran.load(Ordering::SeqCst), 0);
	assert_eq!(result, Value::Null);
	assert!(summary.action().is_none());
}

#[tokio::test]
async fn test_controller_observers_cancel_and_rewrite() {
	let app = Module::new("app");
	let ran = Arc::new(AtomicUsize::new(0));
	let ran_in_action = ran.clone();
	let site = Controller::builder("site", &app)
		.handler("actionIndex", move |_ctx| {
			let ran = ran_in_action.clone();
			async move {
				ran.fetch_add(1, Ordering::SeqCst);
				Ok(json!("home"))
			}
		})
		.build();
	app.add_controller(site.clone());

	let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));

	site.on_after_action(|event| {
		let inner = event.result.take().unwrap_or(Value::Null);
		event.result = Some(json!({ "decorated": inner }));
	});
	let result = dispatcher
		.run_action(&site, "index", Params::new())
		.await
		.unwrap();
	assert_eq!(result, json!({ "decorated": "home" }));
	assert_eq!(ran.load(Ordering::SeqCst), 1);

	site.on_before_action(|event| {
		event.is_valid = false;
	});
	let result = dispatcher
		.run_action(&site, "index", Params::new())
		.await
		.unwrap();
	assert_eq!(result, Value::Null);
	// The action body did not run a second time.
	assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_nested_dispatch_restores_current_action() {
	let app = Module::new("app");
	let observed = Arc::new(Mutex::new(Vec::new()));

	let observed_outer = observed.clone();
	let site = Controller::builder("site", &app)
		.handler("actionOuter", move |ctx| {
			let observed = observed_outer.clone();
			async move {
				observed
					.lock()
					.push(ctx.controller.action().unwrap().id().to_string());
				let inner = ctx
					.dispatcher
					.run_action(&ctx.controller, "inner", Params::new())
					.await?;
				// After the nested dispatch the outer action is
				// current again.
				observed
					.lock()
					.push(ctx.controller.action().unwrap().id().to_string());
				Ok(json!({ "outer": true, "inner": inner }))
			}
		})
		.handler("actionInner", {
			let observed = observed.clone();
			move |ctx| {
				let observed = observed.clone();
				async move {
					observed
						.lock()
						.push(ctx.controller.action().unwrap().id().to_string());
					Ok(json!("inner"))
				}
			}
		})
		.build();
	app.add_controller(site.clone());

	let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));
	let result = dispatcher
		.run_action(&site, "outer", Params::new())
		.await
		.unwrap();

	assert_eq!(result, json!({ "outer": true, "inner": "inner" }));
	assert_eq!(*observed.lock(), vec!["outer", "inner", "outer"]);
	assert!(site.action().is_none());
	// The requested action is the first dispatch, not the nested one.
	assert_eq!(dispatcher.requested_action().unwrap().id(), "outer");
}

#[tokio::test]
async fn test_params_reach_the_action() {
	let app = Module::new("app");
	let site = Controller::builder("site", &app)
		.handler("actionGreet", |ctx| async move {
			let name = ctx.require("name")?.clone();
			Ok(json!({ "greeting": name }))
		})
		.build();
	app.add_controller(site.clone());

	let dispatcher = Dispatcher::new(Arc::new(NullActionFactory));

	let mut params = Params::new();
	params.insert("name".to_string(), json!("ada"));
	let result = dispatcher
		.run_action(&site, "greet", params)
		.await
		.unwrap();
	assert_eq!(result, json!({ "greeting": "ada" }));

	let err = dispatcher
		.run_action(&site, "greet", Params::new())
		.await
		.unwrap_err();
	assert!(matches!(err, Error::InvalidParams(_)));
	// Errors unwind past the save/restore too.
	assert!(site.action().is_none());
}
