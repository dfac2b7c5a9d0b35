//! Identity and session management: who the user is, how a login is verified,
//! and the resolver that owns the current `Session`.
//! Keep the public surface thin and split implementation across sub-modules.

mod profile;
mod session;
mod verifier;
mod throttle;
mod resolver;

pub use profile::{Role, UnknownRole, UserProfile};
pub use session::{generate_token, Session, SessionToken};
pub use verifier::{default_accounts, CredentialVerifier, StaticCredentialTable};
pub use throttle::LoginThrottle;
pub use resolver::SessionResolver;
