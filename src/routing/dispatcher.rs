//! Route dispatch.
//!
//! # Responsibilities
//! - Match the request path against the route table
//! - Record the winning route and its capture groups
//! - Return the matched handler or an explicit no-match
//!
//! # Design Decisions
//! - One dispatcher per request; it owns the request facts and parameters
//! - Borrows the route table read-only, so the table can be shared
//! - First match wins; later routes are never evaluated
//! - A failed dispatch leaves the parameters empty

use crate::http::request::RequestFacts;
use crate::routing::params::Params;
use crate::routing::router::{Route, RouteTable};

/// Matches one request against a route table.
#[derive(Debug)]
pub struct Dispatcher<'t, H> {
    table: &'t RouteTable<H>,
    request: RequestFacts,
    params: Params,
    matched: Option<&'t Route<H>>,
}

impl<'t, H> Dispatcher<'t, H> {
    pub fn new(table: &'t RouteTable<H>, request: RequestFacts) -> Self {
        Self {
            table,
            request,
            params: Params::default(),
            matched: None,
        }
    }

    /// Find the first route whose pattern matches the whole request path.
    pub fn dispatch(&mut self) -> Option<&'t H> {
        let path = self.request.path();

        for route in self.table.routes() {
            if let Some(captures) = route.captures(path) {
                tracing::debug!(
                    path = %path,
                    pattern = %route.pattern(),
                    params = ?captures,
                    "Route matched"
                );
                self.params = Params::new(captures);
                self.matched = Some(route);
                return Some(route.handler());
            }
        }

        tracing::debug!(path = %path, routes = self.table.len(), "No route matched");
        self.params.clear();
        self.matched = None;
        None
    }

    /// The route selected by the last successful dispatch.
    pub fn matched_route(&self) -> Option<&'t Route<H>> {
        self.matched
    }

    pub fn request(&self) -> &RequestFacts {
        &self.request
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Capture group `index` of the winning route.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index)
    }

    pub fn all_params(&self) -> &[String] {
        self.params.all()
    }

    /// Path segment at zero-based `level`.
    pub fn path(&self, level: usize) -> Option<&str> {
        self.request.segment(level)
    }

    pub fn path_count(&self) -> usize {
        self.request.segment_count()
    }

    pub fn request_method(&self) -> &str {
        self.request.method()
    }

    pub fn request_var(&self, key: &str) -> Option<&str> {
        self.request.variable(key)
    }
}
