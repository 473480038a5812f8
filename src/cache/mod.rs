//! Page cache subsystem.
//!
//! # Data Flow
//! ```text
//! Handler renders a page
//!     → page.rs fetch_or_store(key, ttl, render)
//!     → <dir>/<key>.cache younger than ttl? return it
//!     → otherwise render, write temp file, rename into place
//! ```
//!
//! # Design Decisions
//! - File mtime is the only freshness signal; no eviction beyond TTL
//! - Writes go through a temp file + rename so readers never see partial pages
//! - Keys are restricted to `[A-Za-z0-9_-]` to keep them inside the cache dir

pub mod page;

pub use page::{CacheError, PageCache};
