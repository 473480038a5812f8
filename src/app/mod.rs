//! Application front controller.
//!
//! # Data Flow
//! ```text
//! RequestFacts
//!     → application.rs respond()
//!     → routing::Dispatcher (first matching pattern)
//!     → matched handler(&Context)
//!       or fallback handler(&Context)
//!       or 404 "404 Error"
//!     → handler may call Context::render (view::Views) or Context::cached (cache)
//! ```
//!
//! # Design Decisions
//! - The App is built explicitly and passed around; there is no global instance
//! - Handlers are typed closures registered as values, not looked up by name
//! - Not-found policy lives here, not in the dispatcher
//! - Handlers are synchronous; the server decides which thread runs them

pub mod application;
pub mod context;

pub use application::{App, Resolution, NOT_FOUND_BODY};
pub use context::{BoxedHandler, Context, Handler};
