//! Role router and navigation guard: maps a session to the one surface it may
//! land on and turns every disallowed navigation into a redirect.

mod route;
mod guard;

pub use route::{Route, RouteTable};
pub use guard::{NavigationDecision, RoleRouter};

#[cfg(test)]
#[path = "routing_tests.rs"]
mod routing_tests;
