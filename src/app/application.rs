//! The front controller.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use minijinja::Value;
use serde::Serialize;

use crate::app::context::{BoxedHandler, Context, Handler};
use crate::cache::PageCache;
use crate::config::{AppConfig, AppSettings};
use crate::http::request::RequestFacts;
use crate::observability::metrics::{self, DispatchOutcome};
use crate::routing::{Dispatcher, RouteError, RouteTable};
use crate::view::{ViewError, Views};

/// Body of the built-in not-found response.
pub const NOT_FOUND_BODY: &str = "404 Error";

/// Routing outcome for one path, without running any handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub method: String,
    pub path: String,
    pub pattern: Option<String>,
    pub params: Vec<String>,
    pub segments: Vec<String>,
    pub variables: BTreeMap<String, String>,
}

/// An application: settings, ordered routes, views, and a not-found policy.
///
/// Build it once at startup, then share it read-only (e.g. behind `Arc`).
/// Handlers run on the blocking thread pool when served over HTTP, so they
/// may touch the filesystem directly.
pub struct App {
    config: AppConfig,
    routes: RouteTable<BoxedHandler>,
    fallback: Option<BoxedHandler>,
    cache: PageCache,
    views: Views,
}

impl App {
    pub fn new(mut config: AppConfig) -> Self {
        config.app = config.app.normalized();
        let cache = PageCache::new(
            &config.cache.dir,
            Duration::from_secs(config.cache.default_ttl_secs),
        );
        let views = Views::new(&config.app);
        Self {
            config,
            routes: RouteTable::new(),
            fallback: None,
            cache,
            views,
        }
    }

    /// Map a URL pattern to a handler.
    ///
    /// The pattern is a regular expression matched against the whole path,
    /// case-insensitively. Each capture group becomes a positional param.
    pub fn map<F, R>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.routes.register(pattern, boxed(handler));
        self
    }

    /// Like [`App::map`], but rejects patterns that do not compile.
    pub fn try_map<F, R>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.routes.try_register(pattern, boxed(handler))?;
        Ok(self)
    }

    /// Handler for requests that match no route.
    pub fn fallback<F, R>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.fallback = Some(boxed(handler));
        self
    }

    /// Register a view template, shadowing any file of that name in `view_dir`.
    pub fn add_view(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<&mut Self, ViewError> {
        self.views.add_template(name, source)?;
        Ok(self)
    }

    /// Set a value visible to every rendered view.
    pub fn set_view_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.views.set_data(key, value);
        self
    }

    pub fn view_data(&self, key: &str) -> Option<&Value> {
        self.views.data(key)
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn settings(&self) -> &AppSettings {
        &self.config.app
    }

    pub fn routes(&self) -> &RouteTable<BoxedHandler> {
        &self.routes
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Dispatch `facts` and run the matched handler, the fallback, or a plain 404.
    pub fn respond(&self, facts: RequestFacts) -> Response {
        let mut dispatcher = Dispatcher::new(&self.routes, facts);
        let handler = dispatcher.dispatch();
        let ctx = Context::new(&dispatcher, &self.config.app, &self.cache, &self.views);

        match (handler, &self.fallback) {
            (Some(handler), _) => {
                metrics::record_dispatch(DispatchOutcome::Matched);
                handler.call(&ctx)
            }
            (None, Some(fallback)) => {
                tracing::debug!(path = %ctx.request().path(), "Running fallback handler");
                metrics::record_dispatch(DispatchOutcome::Fallback);
                fallback.call(&ctx)
            }
            (None, None) => {
                metrics::record_dispatch(DispatchOutcome::NotFound);
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
        }
    }

    /// Dispatch `facts` and report what matched.
    pub fn resolve(&self, facts: RequestFacts) -> Resolution {
        let mut dispatcher = Dispatcher::new(&self.routes, facts);
        dispatcher.dispatch();

        let request = dispatcher.request();
        Resolution {
            method: request.method().to_string(),
            path: request.path().to_string(),
            pattern: dispatcher.matched_route().map(|r| r.pattern().to_string()),
            params: dispatcher.all_params().to_vec(),
            segments: request.segments().to_vec(),
            variables: request
                .variables()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

fn boxed<F, R>(handler: F) -> BoxedHandler
where
    F: Fn(&Context<'_>) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    Arc::new(handler)
}
