//! Module trees, controllers, and the action-dispatch pipeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use trellis::dispatch::{Controller, Dispatcher, Module};
//! ```

pub use trellis_dispatch::*;
