//! Method + path route matching
//!
//! Routes come in two kinds: exact patterns, stored under their full
//! `(pattern, method)` key, and dynamic patterns ending in one `:param`
//! segment, stored under the prefix preceding the parameter. Dynamic
//! matching does not tokenize the request path against patterns; it relies
//! on the known-segment set — every literal segment ever registered — to
//! recognize which request segment is the parameter value.
//!
//! Registration is a one-time setup phase. After setup, `find` and
//! `routes` are pure reads and can be shared freely across callers.

use std::collections::{HashMap, HashSet};

use super::errors::RouterError;

/// Marker introducing a parameter segment in a pattern
const PARAMETER_MARKER: char = ':';

/// Lookup key: full pattern (or dynamic prefix) plus method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    path: String,
    method: String,
}

impl RouteKey {
    fn new(path: &str, method: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
        }
    }
}

/// A dynamic route: handler plus its `:param` segment
#[derive(Debug)]
struct DynamicRoute<H> {
    handler: H,
    /// Parameter segment as written in the pattern, marker included
    parameter: String,
}

/// Parameter bound during a dynamic match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Parameter name without the marker (`id` for `:id`)
    pub name: String,
    /// The path segment bound to the parameter
    pub value: String,
}

/// Outcome of a route lookup
///
/// "No route" is a representable outcome, never a panic or a dangling
/// lookup; callers branch on it.
#[derive(Debug)]
pub enum RouteMatch<'a, H> {
    Found {
        handler: &'a H,
        /// Present for dynamic matches only
        binding: Option<Binding>,
    },
    NotFound,
}

impl<'a, H> RouteMatch<'a, H> {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteMatch::Found { .. })
    }
}

/// Route table generic over an opaque handler type
#[derive(Debug, Default)]
pub struct Router<H> {
    /// Every literal segment seen across all registrations; grows
    /// monotonically for the lifetime of the router
    known_segments: HashSet<String>,
    static_routes: HashMap<RouteKey, H>,
    dynamic_routes: HashMap<RouteKey, DynamicRoute<H>>,
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            known_segments: HashSet::new(),
            static_routes: HashMap::new(),
            dynamic_routes: HashMap::new(),
        }
    }

    /// Registers a route.
    ///
    /// Patterns may carry at most one parameter segment and it must be the
    /// trailing segment; anything else is rejected here rather than
    /// silently mismatched at request time. Registering the same
    /// `(pattern, method)` twice silently overwrites the earlier handler.
    pub fn register(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouterError> {
        let segments: Vec<&str> = pattern.split('/').collect();

        let parameters: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(PARAMETER_MARKER))
            .map(|(i, _)| i)
            .collect();
        if parameters.len() > 1 {
            return Err(RouterError::MultipleParameters(pattern.to_string()));
        }
        if let Some(&index) = parameters.first() {
            if index != segments.len() - 1 {
                return Err(RouterError::ParameterNotTrailing(pattern.to_string()));
            }
        }

        for segment in &segments {
            if segment.is_empty() || segment.contains(PARAMETER_MARKER) {
                continue;
            }
            self.known_segments.insert(segment.to_string());
        }

        match parameters.first() {
            Some(&index) => {
                let prefix = join_prefix(&segments[..index]);
                self.dynamic_routes.insert(
                    RouteKey::new(&prefix, method),
                    DynamicRoute {
                        handler,
                        parameter: segments[index].to_string(),
                    },
                );
            }
            None => {
                self.static_routes
                    .insert(RouteKey::new(pattern, method), handler);
            }
        }

        Ok(())
    }

    /// Looks up a route for an inbound method + path.
    ///
    /// An exact entry always wins over a dynamic one resolving to the same
    /// path. Dynamic matching scans segments from the end: the first
    /// segment absent from the known-segment set is the parameter value,
    /// and the segments before it form the prefix key. A path where every
    /// segment is known yields `NotFound` even when dynamic routes exist.
    pub fn find(&self, method: &str, path: &str) -> RouteMatch<'_, H> {
        if let Some(handler) = self.static_routes.get(&RouteKey::new(path, method)) {
            return RouteMatch::Found {
                handler,
                binding: None,
            };
        }

        let segments: Vec<&str> = path.split('/').collect();
        let parameter_index = segments
            .iter()
            .rposition(|segment| !self.known_segments.contains(*segment));
        let index = match parameter_index {
            Some(index) => index,
            None => return RouteMatch::NotFound,
        };

        let prefix = join_prefix(&segments[..index]);
        match self.dynamic_routes.get(&RouteKey::new(&prefix, method)) {
            Some(route) => RouteMatch::Found {
                handler: &route.handler,
                binding: Some(Binding {
                    name: route
                        .parameter
                        .trim_start_matches(PARAMETER_MARKER)
                        .to_string(),
                    value: segments[index].to_string(),
                }),
            },
            None => RouteMatch::NotFound,
        }
    }

    /// Diagnostic listing: `"{pattern} ({method})"`, static and dynamic
    /// merged, sorted lexicographically. Restartable; not used by matching.
    pub fn routes(&self) -> impl Iterator<Item = String> + '_ {
        let mut listing: Vec<String> = self
            .static_routes
            .keys()
            .map(|key| format!("{} ({})", key.path, key.method))
            .chain(self.dynamic_routes.iter().map(|(key, route)| {
                format!("{}{} ({})", key.path, route.parameter, key.method)
            }))
            .collect();
        listing.sort();
        listing.into_iter()
    }
}

/// Joins the segments preceding a parameter, trailing separator included
fn join_prefix(segments: &[&str]) -> String {
    let mut prefix = segments.join("/");
    prefix.push('/');
    prefix
}
