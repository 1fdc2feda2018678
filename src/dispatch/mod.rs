//! Route matching and the rendering boundary
//!
//! The matcher answers one question per declared route: is it the route the
//! last match resolved to. How an active route renders is the view layer's
//! business; the outlet only hands it the router handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::message::MessageService;
use crate::route::ActionPath;
use crate::router::{ActionRouter, RouterState};
use crate::schema::SchemaError;

/// Whether a route path is the active one under the given state.
pub fn is_active(path: &str, state: &RouterState) -> bool {
    state.action_result.as_ref().map(|r| r.path == path).unwrap_or(false)
}

/// Per-route active flags. With unique paths at most one entry is true.
pub fn active_flags(routes: &[ActionRoute], state: &RouterState) -> BTreeMap<String, bool> {
    routes
        .iter()
        .map(|route| {
            let path = &route.declaration.path;
            (path.clone(), is_active(path, state))
        })
        .collect()
}

/// A view component instantiated with the router handle when its route
/// becomes active.
pub trait RouteView: Send + Sync {
    fn mount(&self, router: &ActionRouter);
}

pub type RenderFn = Box<dyn Fn(&ActionRouter) + Send + Sync>;

/// How a route binds to the view layer: a direct render callback or a
/// component reference. Exactly one of the two, chosen at declaration.
pub enum ViewBinding {
    Render(RenderFn),
    Component(Box<dyn RouteView>),
}

/// One declared route plus its view binding.
pub struct ActionRoute {
    pub declaration: ActionPath,
    pub binding: ViewBinding,
}

impl ActionRoute {
    pub fn render<F>(declaration: ActionPath, f: F) -> Self
    where
        F: Fn(&ActionRouter) + Send + Sync + 'static,
    {
        Self { declaration, binding: ViewBinding::Render(Box::new(f)) }
    }

    pub fn component(declaration: ActionPath, view: impl RouteView + 'static) -> Self {
        Self { declaration, binding: ViewBinding::Component(Box::new(view)) }
    }
}

/// The rendering-boundary contract: current state plus per-route flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletSnapshot {
    pub state: RouterState,
    pub active: BTreeMap<String, bool>,
}

/// Owns the route table and the router it was built around. The router
/// handle is passed to view bindings explicitly; nothing is ambient.
pub struct RouterOutlet {
    router: ActionRouter,
    routes: Vec<ActionRoute>,
}

impl RouterOutlet {
    /// Build the outlet and its router from a route table and a transport.
    /// Schema derivation happens here; a misdeclared route fails the build.
    pub fn new(
        routes: Vec<ActionRoute>,
        service: Arc<dyn MessageService>,
    ) -> Result<Self, SchemaError> {
        let declarations: Vec<ActionPath> =
            routes.iter().map(|r| r.declaration.clone()).collect();
        let router = ActionRouter::new(&declarations, service)?;
        Ok(Self { router, routes })
    }

    pub fn router(&self) -> &ActionRouter {
        &self.router
    }

    pub fn routes(&self) -> &[ActionRoute] {
        &self.routes
    }

    /// Current per-route flags.
    pub fn active(&self) -> BTreeMap<String, bool> {
        active_flags(&self.routes, &self.router.state())
    }

    /// State snapshot plus per-route flags, for the view layer to read.
    pub fn snapshot(&self) -> OutletSnapshot {
        let state = self.router.state();
        let active = active_flags(&self.routes, &state);
        OutletSnapshot { state, active }
    }

    /// Invoke the binding of the route matching the current result, if any.
    /// Returns whether a route mounted.
    pub fn mount_active(&self) -> bool {
        let state = self.router.state();
        for route in &self.routes {
            if is_active(&route.declaration.path, &state) {
                match &route.binding {
                    ViewBinding::Render(f) => f(&self.router),
                    ViewBinding::Component(view) => view.mount(&self.router),
                }
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ActionResult;

    fn matched(path: &str) -> RouterState {
        RouterState {
            action_result: Some(ActionResult {
                path: path.into(),
                params: None,
                original_message: "msg".into(),
            }),
            ..RouterState::initial()
        }
    }

    fn noop_routes(paths: &[&str]) -> Vec<ActionRoute> {
        paths.iter().map(|p| ActionRoute::render(ActionPath::new(*p), |_| {})).collect()
    }

    #[test]
    fn no_result_means_no_active_route() {
        let routes = noop_routes(&["search", "help"]);
        let flags = active_flags(&routes, &RouterState::initial());
        assert!(flags.values().all(|active| !active));
    }

    #[test]
    fn at_most_one_route_active() {
        let routes = noop_routes(&["search", "help", "notFound"]);
        let flags = active_flags(&routes, &matched("search"));
        assert_eq!(flags.values().filter(|a| **a).count(), 1);
        assert!(flags["search"]);
        assert!(!flags["help"]);
    }

    #[test]
    fn unmatched_result_activates_nothing() {
        let routes = noop_routes(&["search", "help"]);
        let flags = active_flags(&routes, &matched("somethingElse"));
        assert!(flags.values().all(|active| !active));
    }

    #[test]
    fn not_found_is_a_legal_match_target() {
        let routes = noop_routes(&["search", "notFound"]);
        let flags = active_flags(&routes, &matched("notFound"));
        assert!(flags["notFound"]);
        assert!(!flags["search"]);
    }
}
