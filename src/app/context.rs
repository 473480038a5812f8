//! Handler context and handler type.

use std::sync::Arc;
use std::time::Duration;

use axum::response::{Html, IntoResponse, Response};
use minijinja::Value;

use crate::cache::{CacheError, PageCache};
use crate::config::AppSettings;
use crate::http::request::RequestFacts;
use crate::routing::Dispatcher;
use crate::view::{ViewError, Views};

/// Something that can answer a dispatched request.
///
/// Implemented for every `Fn(&Context<'_>) -> impl IntoResponse` closure or function.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &Context<'_>) -> Response;
}

impl<F, R> Handler for F
where
    F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn call(&self, ctx: &Context<'_>) -> Response {
        (self)(ctx).into_response()
    }
}

/// A route or fallback handler as stored in the route table.
pub type BoxedHandler = Arc<dyn Handler>;

/// What a handler can see about the request it is serving.
pub struct Context<'a> {
    dispatcher: &'a Dispatcher<'a, BoxedHandler>,
    settings: &'a AppSettings,
    cache: &'a PageCache,
    views: &'a Views,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        dispatcher: &'a Dispatcher<'a, BoxedHandler>,
        settings: &'a AppSettings,
        cache: &'a PageCache,
        views: &'a Views,
    ) -> Self {
        Self {
            dispatcher,
            settings,
            cache,
            views,
        }
    }

    /// Capture group `index` of the matched route pattern.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.dispatcher.param(index)
    }

    pub fn all_params(&self) -> &[String] {
        self.dispatcher.all_params()
    }

    /// The pattern that selected this handler; `None` inside the fallback.
    pub fn matched_pattern(&self) -> Option<&str> {
        self.dispatcher.matched_route().map(|r| r.pattern())
    }

    /// Path segment at zero-based `level`.
    pub fn path(&self, level: usize) -> Option<&str> {
        self.dispatcher.path(level)
    }

    pub fn path_count(&self) -> usize {
        self.dispatcher.path_count()
    }

    pub fn paths(&self) -> &[String] {
        self.request().segments()
    }

    pub fn request(&self) -> &RequestFacts {
        self.dispatcher.request()
    }

    pub fn request_uri(&self) -> &str {
        self.request().uri()
    }

    /// Lower-cased request method.
    pub fn request_method(&self) -> &str {
        self.dispatcher.request_method()
    }

    pub fn request_var(&self, key: &str) -> Option<&str> {
        self.dispatcher.request_var(key)
    }

    pub fn is_get(&self) -> bool {
        self.request().is_get()
    }

    pub fn is_post(&self) -> bool {
        self.request().is_post()
    }

    pub fn settings(&self) -> &AppSettings {
        self.settings
    }

    pub fn cache(&self) -> &PageCache {
        self.cache
    }

    /// Serve `key` from the page cache using the default TTL, rendering on a miss.
    pub fn cached<F>(&self, key: &str, render: F) -> Result<String, CacheError>
    where
        F: FnOnce() -> String,
    {
        self.cached_for(key, self.cache.default_ttl(), render)
    }

    pub fn cached_for<F>(&self, key: &str, ttl: Duration, render: F) -> Result<String, CacheError>
    where
        F: FnOnce() -> String,
    {
        self.cache.fetch_or_store(key, ttl, render)
    }

    /// Render `view` as an HTML response.
    ///
    /// `data` is layered over the app's shared view data for this call only.
    pub fn render(&self, view: &str, data: Value) -> Result<Html<String>, ViewError> {
        self.render_to_string(view, data).map(Html)
    }

    pub fn render_to_string(&self, view: &str, data: Value) -> Result<String, ViewError> {
        self.views.render(view, data)
    }

    pub fn view_data(&self, key: &str) -> Option<&Value> {
        self.views.data(key)
    }
}
