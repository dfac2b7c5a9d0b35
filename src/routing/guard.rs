use tracing::{debug, warn};

use super::route::{Route, RouteTable};
use crate::identity::{Role, Session};

/// Outcome of a navigation request. A denial always names where to go instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow(Route),
    Redirect(Route),
}

impl NavigationDecision {
    pub fn is_allowed(&self) -> bool { matches!(self, NavigationDecision::Allow(_)) }

    /// Where the UI should end up either way.
    pub fn target(&self) -> &Route {
        match self {
            NavigationDecision::Allow(r) | NavigationDecision::Redirect(r) => r,
        }
    }
}

/// Stateless role guard. Holds only the route table, so it is re-evaluated
/// against whatever session it is handed and never caches a decision.
#[derive(Debug, Clone, Default)]
pub struct RoleRouter {
    table: RouteTable,
}

impl RoleRouter {
    pub fn new(table: RouteTable) -> Self { Self { table } }

    pub fn table(&self) -> &RouteTable { &self.table }

    fn surface_for(&self, role: Role) -> Option<&Route> {
        let r = self.table.get(role);
        if r.is_none() {
            warn!(target: "gateguard::router", "no surface mapped for role={}; falling back to login", role);
        }
        r
    }

    /// The single route a session lands on by default.
    pub fn resolve_landing_route(&self, session: &Session) -> Route {
        match session {
            Session::Authenticated(profile) => self.surface_for(profile.role).cloned().unwrap_or_else(Route::login),
            Session::Unknown | Session::Unauthenticated | Session::Error(_) => Route::login(),
        }
    }

    pub fn guard_navigation(&self, requested: &Route, session: &Session) -> bool {
        if requested.is_login() {
            return true;
        }
        let Session::Authenticated(profile) = session else { return false; };
        let Some(own) = self.surface_for(profile.role) else { return false; };
        if requested.is_within(own) {
            return true;
        }
        profile.role == Role::Admin && self.table.department_routes().any(|d| requested.is_within(d))
    }

    /// Guard plus the redirect rule: a denied request goes to the landing route.
    pub fn navigate(&self, requested: &Route, session: &Session) -> NavigationDecision {
        if self.guard_navigation(requested, session) {
            return NavigationDecision::Allow(requested.clone());
        }
        let landing = self.resolve_landing_route(session);
        debug!(target: "gateguard::router", "denied {} for {} session; redirect {}", requested, session.kind(), landing);
        NavigationDecision::Redirect(landing)
    }

    /// `navigate` for raw paths; an unparsable path is treated as denied.
    pub fn navigate_path(&self, raw: &str, session: &Session) -> NavigationDecision {
        match Route::parse(raw) {
            Ok(route) => self.navigate(&route, session),
            Err(e) => {
                debug!(target: "gateguard::router", "rejecting path {:?}: {}", raw, e);
                NavigationDecision::Redirect(self.resolve_landing_route(session))
            }
        }
    }
}
