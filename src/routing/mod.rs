//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     map(pattern, handler)
//!     → router.rs (append to insertion-ordered table)
//!     → matcher.rs (compile `(?i)^(?:pattern)$`)
//!     → Freeze as read-only RouteTable, shared via Arc
//!
//! Incoming request (path, method, variables):
//!     → dispatcher.rs (scan table in insertion order)
//!     → matcher.rs (anchored whole-path evaluation)
//!     → params.rs (capture groups of the winning route)
//!     → Return: matched handler or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at registration, immutable at runtime
//! - First match wins (ordered by registration)
//! - Matching is whole-path and case-insensitive
//! - No match is a value (`None`), never an error

pub mod dispatcher;
pub mod matcher;
pub mod params;
pub mod router;

pub use dispatcher::Dispatcher;
pub use matcher::{PatternMatcher, RouteError};
pub use params::Params;
pub use router::{Route, RouteTable};
