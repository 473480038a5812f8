//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → request.rs (snapshot path, method, variables)
//!     → app::App::respond (dispatch, handler or fallback)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::RequestFacts;
pub use server::{HttpServer, X_REQUEST_ID};
