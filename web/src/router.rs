//! Catalog HTTP router.
//!
//! The route table is data: [`ROUTES`] lists every exposed operation and
//! [`router`] builds the Axum router from it, wrapped in the gateway.

use crate::handlers;
use crate::middleware::{authorize_request, correlation_id_layer};
use crate::state::AppState;
use axum::{
    Router,
    http::Method,
    middleware,
    routing::{MethodRouter, get},
};
use tower_http::trace::TraceLayer;

/// Operation a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `GET /movies`
    List,
    /// `GET /movies/:id`
    ById,
    /// `GET /movies/:id/events`
    Events,
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// HTTP method.
    pub method: Method,
    /// Path pattern, Axum syntax (`:name` captures one segment).
    pub pattern: &'static str,
    /// Operation.
    pub kind: RouteKind,
}

/// Every route the catalog exposes.
pub const ROUTES: [RouteEntry; 3] = [
    RouteEntry {
        method: Method::GET,
        pattern: "/movies",
        kind: RouteKind::List,
    },
    RouteEntry {
        method: Method::GET,
        pattern: "/movies/:id",
        kind: RouteKind::ById,
    },
    RouteEntry {
        method: Method::GET,
        pattern: "/movies/:id/events",
        kind: RouteKind::Events,
    },
];

impl RouteKind {
    /// Find the operation for `method` and `path`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use axum::http::Method;
    /// use fluxflix_web::router::RouteKind;
    ///
    /// assert_eq!(RouteKind::resolve(&Method::GET, "/movies/m1"), Some(RouteKind::ById));
    /// assert_eq!(RouteKind::resolve(&Method::POST, "/movies"), None);
    /// ```
    #[must_use]
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        ROUTES
            .iter()
            .find(|entry| entry.method == *method && pattern_matches(entry.pattern, path))
            .map(|entry| entry.kind)
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::ById => "by_id",
            Self::Events => "events",
        }
    }

    /// Label of the route `method` and `path` target, `"unmatched"` when
    /// none does. The gateway runs before Axum's matcher, so this is how it
    /// attributes an outcome to an operation.
    #[must_use]
    pub fn label_for(method: &Method, path: &str) -> &'static str {
        Self::resolve(method, path).map_or("unmatched", Self::as_str)
    }

    fn handler(self) -> MethodRouter<AppState> {
        match self {
            Self::List => get(handlers::movies::list_movies),
            Self::ById => get(handlers::movies::get_movie),
            Self::Events => get(handlers::movies::stream_movie_events),
        }
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(want), Some(got)) if want.starts_with(':') && !got.is_empty() => {}
            (Some(want), Some(got)) if want == got => {}
            _ => return false,
        }
    }
}

/// Build the catalog router.
///
/// Layers, outermost first: request tracing, correlation ID, gateway.
///
/// # Routes
///
/// - `GET /movies` - list every movie
/// - `GET /movies/:id` - one movie, or 404
/// - `GET /movies/:id/events` - server-sent events for one movie
pub fn router(state: AppState) -> Router {
    ROUTES
        .iter()
        .fold(Router::new(), |routes, entry| {
            routes.route(entry.pattern, entry.kind.handler())
        })
        .layer(middleware::from_fn_with_state(state.clone(), authorize_request))
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolves_each_route() {
        assert_eq!(RouteKind::resolve(&Method::GET, "/movies"), Some(RouteKind::List));
        assert_eq!(RouteKind::resolve(&Method::GET, "/movies/m1"), Some(RouteKind::ById));
        assert_eq!(
            RouteKind::resolve(&Method::GET, "/movies/m1/events"),
            Some(RouteKind::Events)
        );
    }

    #[test]
    fn rejects_near_misses() {
        assert_eq!(RouteKind::resolve(&Method::GET, "/movies/"), None);
        assert_eq!(RouteKind::resolve(&Method::GET, "/movies/m1/extra"), None);
        assert_eq!(RouteKind::resolve(&Method::GET, "/moviesx"), None);
        assert_eq!(RouteKind::resolve(&Method::DELETE, "/movies/m1"), None);
    }

    #[test]
    fn labels_name_the_targeted_operation() {
        assert_eq!(RouteKind::label_for(&Method::GET, "/movies"), "list");
        assert_eq!(RouteKind::label_for(&Method::GET, "/movies/m1"), "by_id");
        assert_eq!(RouteKind::label_for(&Method::GET, "/movies/m1/events"), "events");
        assert_eq!(RouteKind::label_for(&Method::GET, "/nope"), "unmatched");
        assert_eq!(RouteKind::label_for(&Method::POST, "/movies"), "unmatched");
    }

    #[test]
    fn every_route_is_read_only() {
        assert!(ROUTES.iter().all(|entry| entry.method == Method::GET));
    }

    proptest! {
        #[test]
        fn any_single_segment_id_is_by_id(id in "[A-Za-z0-9-]{1,36}") {
            let path = format!("/movies/{id}");
            prop_assert_eq!(RouteKind::resolve(&Method::GET, &path), Some(RouteKind::ById));
        }
    }
}
