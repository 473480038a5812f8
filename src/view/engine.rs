//! Template environment and view data store.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use minijinja::value::ValueKind;
use minijinja::{path_loader, Environment, Value};
use thiserror::Error;

use crate::config::AppSettings;

/// Errors raised while registering or rendering a view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid view template `{name}`: {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to render view `{name}`: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "View rendering failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "500 Error").into_response()
    }
}

/// Templates loaded from the view directory plus the shared view data.
pub struct Views {
    env: Environment<'static>,
    data: BTreeMap<String, Value>,
}

impl Views {
    /// Build an environment over `settings.view_dir` (expected to be normalized).
    pub fn new(settings: &AppSettings) -> Self {
        let root = if settings.view_dir.is_empty() {
            "."
        } else {
            settings.view_dir.as_str()
        };

        let mut env = Environment::new();
        env.set_loader(path_loader(root));
        env.add_global("app_name", settings.name.clone());
        env.add_global("app_url", Value::from_safe_string(settings.url.clone()));
        env.add_global("app_view_url", Value::from_safe_string(settings.view_url()));

        Self {
            env,
            data: BTreeMap::new(),
        }
    }

    /// Register a template under `name`, shadowing any file of that name.
    pub fn add_template(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<(), ViewError> {
        self.env
            .add_template(name, source)
            .map_err(|source| ViewError::InvalidTemplate {
                name: name.to_string(),
                source,
            })
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn all_data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Render `name` with the shared view data overlaid by `data`.
    ///
    /// `data` is expected to be a map (e.g. built with `minijinja::context!`);
    /// anything else contributes nothing.
    pub fn render(&self, name: &str, data: Value) -> Result<String, ViewError> {
        let render_error = |source| ViewError::Render {
            name: name.to_string(),
            source,
        };

        let template = self.env.get_template(name).map_err(render_error)?;
        let page = template.render(self.merged(data)).map_err(render_error)?;

        tracing::trace!(view = %name, bytes = page.len(), "View rendered");
        Ok(page)
    }

    fn merged(&self, data: Value) -> Value {
        let mut merged = self.data.clone();
        if data.kind() == ValueKind::Map {
            if let Ok(keys) = data.try_iter() {
                for key in keys {
                    if let (Some(name), Ok(value)) = (key.as_str(), data.get_item(&key)) {
                        merged.insert(name.to_string(), value);
                    }
                }
            }
        }
        Value::from_serialize(&merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn settings(view_dir: &str) -> AppSettings {
        AppSettings {
            name: "Blog".into(),
            url: "http://example.com".into(),
            view_dir: view_dir.into(),
        }
    }

    #[test]
    fn test_call_data_overrides_shared_data() {
        let mut views = Views::new(&settings("view"));
        views
            .add_template("greet.html", "{{ greeting }}, {{ name }}")
            .unwrap();
        views.set_data("greeting", "Hello");
        views.set_data("name", "world");

        let page = views.render("greet.html", context! { name => "alice" }).unwrap();
        assert_eq!(page, "Hello, alice");

        // Per-call data is not written back to the shared store.
        assert_eq!(views.data("name").and_then(|v| v.as_str()), Some("world"));
        assert_eq!(views.all_data().len(), 2);
    }

    #[test]
    fn test_html_views_are_escaped() {
        let mut views = Views::new(&settings("view"));
        views.add_template("page.html", "<p>{{ text }}</p>").unwrap();
        views.add_template("page.txt", "{{ text }}").unwrap();

        let html = views.render("page.html", context! { text => "<b>&</b>" }).unwrap();
        assert_eq!(html, "<p>&lt;b&gt;&amp;&lt;&#x2f;b&gt;</p>");

        let text = views.render("page.txt", context! { text => "<b>" }).unwrap();
        assert_eq!(text, "<b>");
    }

    #[test]
    fn test_app_globals() {
        let mut views = Views::new(&settings("themes/plain"));
        views
            .add_template("links.html", "{{ app_name }} {{ app_url }} {{ app_view_url }}")
            .unwrap();

        let page = views.render("links.html", context! {}).unwrap();
        assert_eq!(page, "Blog http://example.com http://example.com/themes/plain");
    }

    #[test]
    fn test_loads_from_view_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.html"), "Hi {{ who }}").unwrap();

        let views = Views::new(&settings(&dir.path().display().to_string()));
        let page = views.render("hello.html", context! { who => "bob" }).unwrap();
        assert_eq!(page, "Hi bob");
    }

    #[test]
    fn test_missing_view() {
        let dir = tempfile::tempdir().unwrap();
        let views = Views::new(&settings(&dir.path().display().to_string()));

        let err = views.render("absent.html", context! {}).unwrap_err();
        assert!(matches!(err, ViewError::Render { ref name, .. } if name == "absent.html"));
    }

    #[test]
    fn test_invalid_template() {
        let mut views = Views::new(&settings("view"));
        let err = views.add_template("broken.html", "{% if %}").unwrap_err();
        assert!(matches!(err, ViewError::InvalidTemplate { .. }));
    }
}
