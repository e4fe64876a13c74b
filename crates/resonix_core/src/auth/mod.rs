//! Admin authentication.
//!
//! # Responsibility
//! - Check credentials against the configured table.
//! - Issue, validate, and revoke opaque session and remember tokens.
//! - Lock a username out after repeated failed logins.
//!
//! # Invariants
//! - Tokens are random UUIDs; a token never encodes the username.
//! - A session older than the configured timeout is never accepted.
//! - A locked username is refused even with the right password.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod credentials;
pub mod session;

pub use credentials::CredentialTable;
pub use session::{AdminUser, AuthCheck, LoginOutcome, SessionManager, SessionPolicy, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    LockedOut { retry_after_secs: u64 },
    Unauthenticated,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::LockedOut { retry_after_secs } => write!(
                f,
                "Too many failed login attempts; try again in {retry_after_secs} seconds"
            ),
            Self::Unauthenticated => write!(f, "Authentication required"),
        }
    }
}

impl Error for AuthError {}
