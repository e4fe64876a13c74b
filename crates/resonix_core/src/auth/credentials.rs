//! Static username/password table.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTable {
    users: BTreeMap<String, String>,
}

impl CredentialTable {
    pub fn new(users: BTreeMap<String, String>) -> Self {
        Self { users }
    }

    /// Exact, case-sensitive match on both username and password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), password.as_bytes()))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
