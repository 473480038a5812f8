//! View rendering.
//!
//! # Data Flow
//! ```text
//! App::new(settings)
//!     → engine.rs Views::new (path loader over settings.view_dir, app globals)
//!     → App::add_view / set_view_data at startup
//! Handler
//!     → Context::render(view, data)
//!     → shared view data merged with per-call data (per-call wins)
//!     → minijinja template, HTML auto-escaped by file extension
//! ```
//!
//! # Design Decisions
//! - Templates registered at startup take precedence over files in `view_dir`
//! - Shared view data is set before serving and read-only afterwards;
//!   per-request data never leaks into the next request
//! - `app_url` and `app_view_url` come from trusted config and are not escaped

pub mod engine;

pub use engine::{ViewError, Views};
