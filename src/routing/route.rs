use std::collections::HashMap;
use std::fmt;

use crate::error::{AppError, AppResult};
use crate::identity::Role;

/// A normalised navigation path: leading `/`, no empty segments, no trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(String);

impl Route {
    pub const LOGIN: &'static str = "/login";

    pub fn login() -> Self { Route(Self::LOGIN.to_string()) }

    /// Normalise `raw`. Relative paths and `.`/`..` segments are rejected so a
    /// request cannot climb out of a role's sub-tree.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if !raw.starts_with('/') {
            return Err(AppError::invalid_input("bad_route", "route must start with '/'"));
        }
        let mut segs: Vec<&str> = Vec::new();
        for seg in raw.split('/').filter(|s| !s.is_empty()) {
            if seg == "." || seg == ".." {
                return Err(AppError::invalid_input("bad_route", "relative segments are not allowed"));
            }
            if seg.chars().any(char::is_whitespace) {
                return Err(AppError::invalid_input("bad_route", "whitespace in route"));
            }
            segs.push(seg);
        }
        Ok(Route(format!("/{}", segs.join("/"))))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_login(&self) -> bool { self.0 == Self::LOGIN }

    /// Segment-aware nesting: `/supply/stock` is within `/supply`, `/supplyx` is not.
    pub fn is_within(&self, base: &Route) -> bool {
        match self.0.strip_prefix(base.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/') && base.0 != "/",
            None => false,
        }
    }

    /// `base` extended by one or more relative segments.
    pub fn join(&self, child: &str) -> AppResult<Self> {
        Route::parse(&format!("{}/{}", self.0, child))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Role -> landing surface. A role without an entry is an inconsistency the
/// router degrades to the login surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<Role, Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let routes = Role::ALL
            .into_iter()
            .map(|r| (r, Route(format!("/{}", default_segment(r)))))
            .collect();
        Self { routes }
    }
}

fn default_segment(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Armament => "armament",
        Role::Supply => "supply",
        Role::Technical => "technical",
        Role::HumanResources => "human-resources",
    }
}

impl RouteTable {
    pub fn empty() -> Self { Self { routes: HashMap::new() } }

    pub fn get(&self, role: Role) -> Option<&Route> { self.routes.get(&role) }

    pub fn with(mut self, role: Role, route: Route) -> Self {
        self.routes.insert(role, route);
        self
    }

    pub fn without(mut self, role: Role) -> Self {
        self.routes.remove(&role);
        self
    }

    /// Surfaces of every department role present in the table.
    pub fn department_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|(r, _)| r.is_department()).map(|(_, route)| route)
    }
}
