//! User-profile collaborator: a JSON-file-backed store of accounts,
//! proficiency tiers, and saved teams, with Argon2id password hashing.
//!
//! The chat core consumes only the identity and tier fields; the rest
//! exists for the register/login/profile endpoints.

mod password;
mod store;

pub use password::{hash_password, verify_password};
pub use store::{SavedTeam, UserProfile, UserStore};
