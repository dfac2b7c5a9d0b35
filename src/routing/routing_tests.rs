use super::*;
use crate::identity::{Role, Session, UserProfile};

fn authed(role: Role) -> Session {
    Session::Authenticated(UserProfile::new("1", role.as_str(), "U", "u@gate.local", role))
}

fn r(p: &str) -> Route { Route::parse(p).unwrap() }

#[test]
fn parse_normalises_paths() {
    assert_eq!(r("/supply/").as_str(), "/supply");
    assert_eq!(r("//supply//stock").as_str(), "/supply/stock");
    assert_eq!(r("  /login ").as_str(), "/login");
    assert_eq!(r("/").as_str(), "/");
    assert!(Route::parse("supply").is_err());
    assert!(Route::parse("/supply/../admin").is_err());
    assert!(Route::parse("/supply/./x").is_err());
    assert!(Route::parse("/sup ply").is_err());
}

#[test]
fn nesting_is_segment_aware() {
    assert!(r("/supply/stock/42").is_within(&r("/supply")));
    assert!(r("/supply").is_within(&r("/supply")));
    assert!(!r("/supplyx").is_within(&r("/supply")));
    assert!(!r("/admin").is_within(&r("/")));
    assert_eq!(r("/admin").join("users/7").unwrap(), r("/admin/users/7"));
}

#[test]
fn non_authenticated_states_land_on_login() {
    let router = RoleRouter::default();
    let login = Route::login();
    assert_eq!(router.resolve_landing_route(&Session::Unknown), login);
    assert_eq!(router.resolve_landing_route(&Session::Unauthenticated), login);
    assert_eq!(router.resolve_landing_route(&Session::Error("x".into())), login);
}

#[test]
fn each_role_lands_on_its_table_entry() {
    let router = RoleRouter::default();
    let table = RouteTable::default();
    for role in Role::ALL {
        assert_eq!(&router.resolve_landing_route(&authed(role)), table.get(role).unwrap());
    }
    assert_eq!(router.resolve_landing_route(&authed(Role::HumanResources)), r("/human-resources"));
}

#[test]
fn unmapped_role_falls_back_to_login_and_is_denied() {
    let router = RoleRouter::new(RouteTable::default().without(Role::Technical));
    let s = authed(Role::Technical);
    assert_eq!(router.resolve_landing_route(&s), Route::login());
    assert!(!router.guard_navigation(&r("/technical"), &s));
    assert!(router.guard_navigation(&Route::login(), &s));
}

#[test]
fn departments_are_isolated() {
    let router = RoleRouter::default();
    let armament = authed(Role::Armament);
    assert!(!router.guard_navigation(&r("/supply"), &armament));
    assert!(!router.guard_navigation(&r("/admin"), &armament));
    assert!(router.guard_navigation(&r("/armament"), &armament));
    assert!(router.guard_navigation(&r("/armament/inventory/12"), &armament));
    assert!(router.guard_navigation(&Route::login(), &armament));
}

#[test]
fn admin_reaches_every_department() {
    let router = RoleRouter::default();
    let admin = authed(Role::Admin);
    for role in Role::departments() {
        let surface = router.table().get(role).unwrap().clone();
        assert!(router.guard_navigation(&surface, &admin), "admin -> {}", surface);
        assert!(router.guard_navigation(&surface.join("reports").unwrap(), &admin));
    }
    assert!(router.guard_navigation(&r("/admin/users"), &admin));
    assert!(!router.guard_navigation(&r("/settings"), &admin));
}

#[test]
fn unauthenticated_only_reaches_login() {
    let router = RoleRouter::default();
    for s in [Session::Unknown, Session::Unauthenticated, Session::Error("bad".into())] {
        assert!(router.guard_navigation(&Route::login(), &s));
        assert!(!router.guard_navigation(&r("/admin"), &s));
        assert!(!router.guard_navigation(&r("/supply"), &s));
    }
}

#[test]
fn denial_redirects_to_landing() {
    let router = RoleRouter::default();
    let supply = authed(Role::Supply);
    let d = router.navigate(&r("/armament"), &supply);
    assert_eq!(d, NavigationDecision::Redirect(r("/supply")));
    assert!(!d.is_allowed());

    let ok = router.navigate(&r("/supply/orders"), &supply);
    assert_eq!(ok, NavigationDecision::Allow(r("/supply/orders")));
    assert_eq!(ok.target(), &r("/supply/orders"));

    let anon = router.navigate(&r("/supply"), &Session::Unauthenticated);
    assert_eq!(anon, NavigationDecision::Redirect(Route::login()));
}

#[test]
fn bad_paths_redirect_rather_than_error() {
    let router = RoleRouter::default();
    let supply = authed(Role::Supply);
    assert_eq!(router.navigate_path("/supply/../admin", &supply), NavigationDecision::Redirect(r("/supply")));
    assert_eq!(router.navigate_path("admin", &Session::Unauthenticated), NavigationDecision::Redirect(Route::login()));
    assert!(router.navigate_path("/supply/", &supply).is_allowed());
}

#[test]
fn decisions_follow_session_changes() {
    let router = RoleRouter::default();
    let target = r("/admin");
    assert!(!router.guard_navigation(&target, &Session::Unauthenticated));
    assert!(router.guard_navigation(&target, &authed(Role::Admin)));
    assert!(!router.guard_navigation(&target, &Session::Unauthenticated));
}
