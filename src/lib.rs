//! Pathwise: a small front-controller web framework built around an
//! ordered, regex-based route dispatcher.
//!
//! ```no_run
//! use pathwise::{App, AppConfig, Context};
//!
//! let mut app = App::new(AppConfig::default());
//! app.map("/", |_ctx: &Context<'_>| "home")
//!     .map("/user/([a-zA-Z0-9_-]+)/", |ctx: &Context<'_>| {
//!         format!("hello {}", ctx.param(0).unwrap_or_default())
//!     });
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;
pub mod view;

pub use app::{App, Context};
pub use config::AppConfig;
pub use http::{HttpServer, RequestFacts};
pub use lifecycle::Shutdown;
pub use routing::{Dispatcher, RouteTable};
