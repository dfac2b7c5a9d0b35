//!
//! gateguard CLI
//! -------------
//! Drives the session core from a terminal: log in against the built-in
//! account table, inspect the persisted session, resolve the landing route and
//! check whether a navigation would be allowed.

use std::env;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gateguard::{AppContext, Config, NavigationDecision, Session};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} login <username> <password>\n  {program} status\n  {program} logout\n  {program} route\n  {program} guard <path>\n  {program} help\n\nEnvironment:\n  GATEGUARD_STORAGE_PATH        key-value file (default: storage/prefs.json)\n  GATEGUARD_MAX_LOGIN_ATTEMPTS  failures before lockout (default: 5)\n  GATEGUARD_LOCKOUT_SECS        lockout duration (default: 900)\n  GATEGUARD_SESSION_TTL_SECS    max session age; unset = no expiry\n  RUST_LOG                      log filter (default: info)"
    );
}

fn describe(session: &Session) -> String {
    match session {
        Session::Unknown => "unknown".to_string(),
        Session::Unauthenticated => "unauthenticated".to_string(),
        Session::Authenticated(p) => format!("authenticated user={} role={} name='{}'", p.username, p.role, p.display_name),
        Session::Error(m) => format!("error: {}", m),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("gateguard");
    let Some(cmd) = args.get(1).map(|s| s.as_str()) else {
        print_usage(program);
        return Ok(ExitCode::from(2));
    };

    let config = Config::from_env();
    info!(target: "gateguard", "starting: cmd={} storage='{}'", cmd, config.storage_path.display());
    let app = AppContext::from_config(config)?;

    match (cmd, &args[2..]) {
        ("login", [user, pass]) => {
            let session = app.resolver.login(user, pass).await;
            println!("{}", describe(&session));
            if !session.is_authenticated() {
                return Ok(ExitCode::FAILURE);
            }
            println!("landing {}", app.landing_route());
        }
        ("status", []) => {
            let session = app.resolver.check_auth_status().await;
            println!("{}", describe(&session));
        }
        ("logout", []) => {
            app.resolver.logout().await;
            println!("{}", describe(&app.session()));
        }
        ("route", []) => {
            app.resolver.check_auth_status().await;
            println!("{}", app.landing_route());
        }
        ("guard", [path]) => {
            app.resolver.check_auth_status().await;
            match app.navigate(path) {
                NavigationDecision::Allow(r) => println!("allow {}", r),
                NavigationDecision::Redirect(r) => {
                    println!("redirect {}", r);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        ("help", _) | ("-h", _) | ("--help", _) => print_usage(program),
        _ => {
            print_usage(program);
            return Ok(ExitCode::from(2));
        }
    }
    Ok(ExitCode::SUCCESS)
}
