use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier scoping one user's ongoing dialogue state.
///
/// Derived deterministically from the authenticated user id, so the same
/// user always lands on the same conversation and keys cannot collide
/// across users. One conversation per user in this design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn for_user(user_id: &str) -> Self {
        Self(format!("conv:{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_for_one_user() {
        assert_eq!(
            ConversationKey::for_user("u1"),
            ConversationKey::for_user("u1")
        );
    }

    #[test]
    fn distinct_across_users() {
        assert_ne!(
            ConversationKey::for_user("u1"),
            ConversationKey::for_user("u2")
        );
    }
}
