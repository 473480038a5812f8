//! Route table.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Expose routes for dispatch and introspection
//!
//! # Design Decisions
//! - Registration order is match priority (first registered, first tried)
//! - Duplicate patterns are legal; the later one is unreachable and logged
//! - `register` never fails: an invalid pattern is kept but never matches
//! - Read-only after startup; shared across requests via Arc

use crate::routing::matcher::{PatternMatcher, RouteError};

/// A registered (pattern, handler) pair.
#[derive(Debug)]
pub struct Route<H> {
    pattern: String,
    matcher: Option<PatternMatcher>,
    handler: H,
}

impl<H> Route<H> {
    /// The pattern text as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The handler bound to this route.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns false if the pattern failed to compile.
    pub fn is_valid(&self) -> bool {
        self.matcher.is_some()
    }

    /// Capture groups of `path` if this route matches it.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        self.matcher.as_ref()?.captures(path)
    }
}

/// Insertion-ordered table of routes.
#[derive(Debug)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> RouteTable<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route.
    ///
    /// An invalid pattern is stored anyway and logged; it will never match.
    pub fn register(&mut self, pattern: impl Into<String>, handler: H) {
        let pattern = pattern.into();
        let matcher = match PatternMatcher::new(&pattern) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(
                    pattern = %pattern,
                    error = %e,
                    "Route pattern does not compile and will never match"
                );
                None
            }
        };
        self.push(pattern, matcher, handler);
    }

    /// Append a route, rejecting patterns that do not compile.
    pub fn try_register(
        &mut self,
        pattern: impl Into<String>,
        handler: H,
    ) -> Result<(), RouteError> {
        let pattern = pattern.into();
        let matcher = PatternMatcher::new(&pattern)?;
        self.push(pattern, Some(matcher), handler);
        Ok(())
    }

    fn push(&mut self, pattern: String, matcher: Option<PatternMatcher>, handler: H) {
        if self.routes.iter().any(|r| r.pattern == pattern) {
            tracing::warn!(
                pattern = %pattern,
                "Duplicate route pattern; the later registration is unreachable"
            );
        }
        tracing::debug!(pattern = %pattern, position = self.routes.len(), "Route registered");
        self.routes.push(Route { pattern, matcher, handler });
    }

    /// All routes in match-priority order.
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    /// All pattern strings in match-priority order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
