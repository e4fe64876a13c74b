//! In-process session table, remember tokens, and login lockout.

use super::{AuthError, CredentialTable};
use crate::config::SiteConfig;
use crate::input::capitalize;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Opaque session or remember token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(Uuid);

impl Token {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a cookie value. Anything that is not a UUID is no token at all.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timeouts and lockout thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub session_timeout: Duration,
    pub remember_ttl: Duration,
    pub max_login_attempts: u32,
    pub lockout: Duration,
}

impl SessionPolicy {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            session_timeout: secs(config.session_timeout_secs),
            remember_ttl: secs(config.remember_token_ttl_secs),
            max_login_attempts: config.max_login_attempts.max(1),
            lockout: secs(config.login_lockout_secs),
        }
    }
}

fn secs(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX / 1000))
}

/// The signed-in admin as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub username: String,
    pub name: String,
    /// Unix seconds.
    pub login_time: i64,
}

impl AdminUser {
    fn new(username: &str, login_time: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            name: capitalize(username),
            login_time: login_time.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: AdminUser,
    pub session: Token,
    /// Present when the caller asked to be remembered.
    pub remember: Option<Token>,
}

/// Result of resolving request tokens to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCheck {
    pub user: AdminUser,
    /// Live session token; differs from the request's when re-minted from a remember token.
    pub session: Token,
    pub reissued: bool,
}

#[derive(Debug)]
struct SessionEntry {
    username: String,
    login_time: DateTime<Utc>,
}

#[derive(Debug)]
struct RememberEntry {
    username: String,
    expires_at: DateTime<Utc>,
}

/// Failure tally for one known username.
#[derive(Debug)]
struct FailedLogins {
    count: u32,
    last_failure: DateTime<Utc>,
    locked_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct AuthTables {
    sessions: HashMap<Token, SessionEntry>,
    remembered: HashMap<Token, RememberEntry>,
    failures: HashMap<String, FailedLogins>,
}

/// Owns every issued token. Share behind `Arc`.
#[derive(Debug)]
pub struct SessionManager {
    credentials: CredentialTable,
    policy: SessionPolicy,
    tables: Mutex<AuthTables>,
}

impl SessionManager {
    pub fn new(credentials: CredentialTable, policy: SessionPolicy) -> Self {
        Self {
            credentials,
            policy,
            tables: Mutex::new(AuthTables::default()),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            CredentialTable::new(config.admin_users.clone()),
            SessionPolicy::from_config(config),
        )
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    /// - `LockedOut` while the username is inside its lockout window.
    /// - `InvalidCredentials` on mismatch; the failure counts toward lockout.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AuthError> {
        let mut tables = self.tables();
        self.prune(&mut tables, now);

        if let Some(until) = tables
            .failures
            .get(username)
            .and_then(|failures| failures.locked_until)
        {
            let retry_after_secs = u64::try_from((until - now).num_seconds()).unwrap_or(0);
            warn!(
                "event=admin_login module=auth status=error error_code=locked_out retry_after_secs={}",
                retry_after_secs
            );
            return Err(AuthError::LockedOut { retry_after_secs });
        }

        if !self.credentials.verify(username, password) {
            // Unknown usernames can never log in, so they are not tallied.
            if !self.credentials.contains(username) {
                warn!("event=admin_login module=auth status=error error_code=invalid_credentials");
                return Err(AuthError::InvalidCredentials);
            }
            let failures = tables
                .failures
                .entry(username.to_string())
                .or_insert(FailedLogins {
                    count: 0,
                    last_failure: now,
                    locked_until: None,
                });
            failures.count += 1;
            failures.last_failure = now;
            if failures.count >= self.policy.max_login_attempts {
                failures.count = 0;
                failures.locked_until = Some(now + self.policy.lockout);
                warn!("event=admin_login module=auth status=error error_code=lockout_engaged");
            } else {
                warn!(
                    "event=admin_login module=auth status=error error_code=invalid_credentials attempts={}",
                    failures.count
                );
            }
            return Err(AuthError::InvalidCredentials);
        }

        tables.failures.remove(username);
        let session = Token::generate();
        tables.sessions.insert(
            session,
            SessionEntry {
                username: username.to_string(),
                login_time: now,
            },
        );
        let remember = remember.then(|| {
            let token = Token::generate();
            tables.remembered.insert(
                token,
                RememberEntry {
                    username: username.to_string(),
                    expires_at: now + self.policy.remember_ttl,
                },
            );
            token
        });

        info!(
            "event=admin_login module=auth status=ok remember={}",
            remember.is_some()
        );
        Ok(LoginOutcome {
            user: AdminUser::new(username, now),
            session,
            remember,
        })
    }

    /// Resolves request tokens to a user, if any is still valid.
    ///
    /// Expired entries are dropped. A valid remember token without a live
    /// session mints a fresh session (`reissued = true`).
    pub fn check(
        &self,
        session: Option<Token>,
        remember: Option<Token>,
        now: DateTime<Utc>,
    ) -> Option<AuthCheck> {
        let mut tables = self.tables();
        self.prune(&mut tables, now);

        if let Some(token) = session {
            if let Some(entry) = tables.sessions.get(&token) {
                return Some(AuthCheck {
                    user: AdminUser::new(&entry.username, entry.login_time),
                    session: token,
                    reissued: false,
                });
            }
        }

        let username = remember.and_then(|token| {
            tables
                .remembered
                .get(&token)
                .map(|entry| entry.username.clone())
        })?;
        if !self.credentials.contains(&username) {
            return None;
        }
        let token = Token::generate();
        tables.sessions.insert(
            token,
            SessionEntry {
                username: username.clone(),
                login_time: now,
            },
        );
        info!("event=session_reissue module=auth status=ok");
        Some(AuthCheck {
            user: AdminUser::new(&username, now),
            session: token,
            reissued: true,
        })
    }

    /// Like [`check`](Self::check), but a missing user is an error.
    pub fn require(
        &self,
        session: Option<Token>,
        remember: Option<Token>,
        now: DateTime<Utc>,
    ) -> Result<AuthCheck, AuthError> {
        self.check(session, remember, now)
            .ok_or(AuthError::Unauthenticated)
    }

    /// Revokes both tokens. Unknown tokens are ignored.
    pub fn logout(&self, session: Option<Token>, remember: Option<Token>) {
        let mut tables = self.tables();
        if let Some(token) = session {
            tables.sessions.remove(&token);
        }
        if let Some(token) = remember {
            tables.remembered.remove(&token);
        }
        info!("event=admin_logout module=auth status=ok");
    }

    pub fn active_sessions(&self) -> usize {
        self.tables().sessions.len()
    }

    /// Usernames currently carrying a failure tally or lockout.
    pub fn tracked_failures(&self) -> usize {
        self.tables().failures.len()
    }

    /// Drops expired sessions, remember tokens, lockouts, and failure tallies
    /// idle for longer than the lockout window.
    fn prune(&self, tables: &mut AuthTables, now: DateTime<Utc>) {
        let timeout = self.policy.session_timeout;
        let lockout = self.policy.lockout;
        tables
            .sessions
            .retain(|_, entry| now - entry.login_time < timeout);
        tables.remembered.retain(|_, entry| entry.expires_at > now);
        tables.failures.retain(|_, failures| match failures.locked_until {
            Some(until) => until > now,
            None => now - failures.last_failure < lockout,
        });
    }

    fn tables(&self) -> MutexGuard<'_, AuthTables> {
        // Poisoning only means a panic mid-update; the maps stay structurally valid.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
