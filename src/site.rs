//! The bundled reference site served by the `pathwise` binary.
//!
//! Three pages and a fallback, enough to exercise routing, captures,
//! request variables, views and the page cache end to end. Templates are
//! compiled into the binary; files of the same name in `view_dir` are ignored.

use axum::http::StatusCode;
use axum::response::Html;
use minijinja::context;

use crate::app::{App, Context};
use crate::config::AppConfig;
use crate::view::ViewError;

pub const HOME_PATTERN: &str = "/";
pub const USER_PATTERN: &str = "/user/([a-zA-Z0-9_-]+)/";
pub const ABOUT_PATTERN: &str = "/about/?";

const HOME_CACHE_KEY: &str = "home";

const VIEWS: [(&str, &str); 5] = [
    ("layout.html", include_str!("../view/layout.html")),
    ("home.html", include_str!("../view/home.html")),
    ("user.html", include_str!("../view/user.html")),
    ("about.html", include_str!("../view/about.html")),
    ("not_found.html", include_str!("../view/not_found.html")),
];

/// Build the reference site on top of `config`.
pub fn build(config: AppConfig) -> Result<App, ViewError> {
    let mut app = App::new(config);
    for (name, source) in VIEWS {
        app.add_view(name, source)?;
    }

    app.map(HOME_PATTERN, home)
        .map(USER_PATTERN, user_page)
        .map(ABOUT_PATTERN, about)
        .fallback(not_found);

    let route_count = app.routes().len();
    app.set_view_data("tagline", "Regex routes, first match wins.")
        .set_view_data("route_count", route_count);
    Ok(app)
}

fn home(ctx: &Context<'_>) -> Result<Html<String>, ViewError> {
    let cache = ctx.cache();
    match cache.get(HOME_CACHE_KEY, cache.default_ttl()) {
        Ok(Some(page)) => return Ok(Html(page)),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Page cache unavailable, rendering uncached"),
    }

    let page = ctx.render_to_string("home.html", context! {})?;
    if let Err(e) = cache.store(HOME_CACHE_KEY, &page) {
        tracing::warn!(error = %e, "Failed to cache home page");
    }
    Ok(Html(page))
}

fn user_page(ctx: &Context<'_>) -> Result<Html<String>, ViewError> {
    ctx.render(
        "user.html",
        context! {
            username => ctx.param(0).unwrap_or_default(),
            tab => ctx.request_var("tab").unwrap_or("profile"),
        },
    )
}

fn about(ctx: &Context<'_>) -> Result<Html<String>, ViewError> {
    ctx.render("about.html", context! {})
}

fn not_found(ctx: &Context<'_>) -> Result<(StatusCode, Html<String>), ViewError> {
    let page = ctx.render("not_found.html", context! { path => ctx.request().path() })?;
    Ok((StatusCode::NOT_FOUND, page))
}
