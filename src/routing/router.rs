//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (the table holds a handful of entries)
//! - Longest prefix first, declaration order breaks ties
//! - Explicit RouteNotFound rather than silent default

use axum::http::Uri;

use crate::config::validation::ValidationError;
use crate::config::RouteConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::routing::matcher::PathPrefixMatcher;

/// A compiled route entry.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub matcher: PathPrefixMatcher,
    pub backend: Uri,
    pub protected: bool,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Inbound path with the prefix removed; `/` when nothing remains.
    pub forwarded_path: &'a str,
}

/// Static prefix → backend table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile the route table.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, ValidationError> {
        let mut routes = configs
            .iter()
            .map(|config| {
                let backend = config.backend.parse::<Uri>().map_err(|e| {
                    ValidationError::InvalidBackend {
                        route: config.name.clone(),
                        backend: config.backend.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Route {
                    name: config.name.clone(),
                    matcher: PathPrefixMatcher::new(config.path_prefix.clone()),
                    backend,
                    protected: config.protected,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        // Stable sort keeps declaration order among equal lengths.
        routes.sort_by(|a, b| b.matcher.prefix().len().cmp(&a.matcher.prefix().len()));

        for route in &routes {
            tracing::debug!(
                route = %route.name,
                prefix = route.matcher.prefix(),
                backend = %route.backend,
                protected = route.protected,
                "Route registered"
            );
        }

        Ok(Self { routes })
    }

    /// Find the route for `path`.
    pub fn resolve<'a>(&'a self, path: &'a str) -> GatewayResult<RouteMatch<'a>> {
        self.routes
            .iter()
            .find_map(|route| {
                route.matcher.strip(path).map(|rest| RouteMatch {
                    route,
                    forwarded_path: if rest.is_empty() { "/" } else { rest },
                })
            })
            .ok_or_else(|| GatewayError::RouteNotFound(path.to_string()))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
