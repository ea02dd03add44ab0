//! JSON-file-backed user store.
//!
//! Persists accounts in `users.json` under the configured state path.
//! Mutations are written through immediately; the file is also flushed on
//! shutdown.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use rotom_domain::{Error, ProficiencyTier, Result};

use crate::password::{hash_password, verify_password};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A team the user saved from a chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTeam {
    pub id: String,
    pub title: String,
    pub format: String,
    pub team_data: String,
    pub date: DateTime<Utc>,
}

/// A stored account. Internal to this crate; handlers see [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    id: String,
    username: String,
    password_hash: String,
    #[serde(default)]
    skill_level: ProficiencyTier,
    created_at: DateTime<Utc>,
    #[serde(default)]
    teams: Vec<SavedTeam>,
}

/// The public view of an account — no credential material.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub skill_level: ProficiencyTier,
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            skill_level: record.skill_level,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// User store backed by a JSON file, keyed by user id.
pub struct UserStore {
    users_path: PathBuf,
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    /// Load or create the store at `state_path/users.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;

        let users_path = state_path.join("users.json");
        let users: HashMap<String, UserRecord> = if users_path.exists() {
            let raw = std::fs::read_to_string(&users_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            users = users.len(),
            path = %users_path.display(),
            "user store loaded"
        );

        Ok(Self {
            users_path,
            users: RwLock::new(users),
        })
    }

    /// Create an account. Errors when the username is taken.
    pub fn create(
        &self,
        username: &str,
        password: &str,
        skill_level: ProficiencyTier,
    ) -> Result<UserProfile> {
        let mut users = self.users.write();
        if users.values().any(|u| u.username == username) {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            skill_level,
            created_at: Utc::now(),
            teams: Vec::new(),
        };
        let profile = UserProfile::from(&record);
        users.insert(record.id.clone(), record);
        self.persist(&users)?;

        tracing::info!(username = %username, "user created");
        Ok(profile)
    }

    /// Verify credentials. `None` covers both unknown usernames and wrong
    /// passwords — callers cannot distinguish the two.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Option<UserProfile> {
        let users = self.users.read();
        let record = users.values().find(|u| u.username == username)?;
        if verify_password(password, &record.password_hash) {
            Some(UserProfile::from(record))
        } else {
            None
        }
    }

    pub fn find_by_id(&self, user_id: &str) -> Option<UserProfile> {
        self.users.read().get(user_id).map(UserProfile::from)
    }

    /// Append a saved team to the user's profile.
    pub fn append_saved_team(
        &self,
        user_id: &str,
        title: &str,
        format: &str,
        team_data: &str,
    ) -> Result<SavedTeam> {
        let mut users = self.users.write();
        let record = users
            .get_mut(user_id)
            .ok_or_else(|| Error::Other(format!("no such user: {user_id}")))?;

        let team = SavedTeam {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            format: format.to_string(),
            team_data: team_data.to_string(),
            date: Utc::now(),
        };
        record.teams.push(team.clone());
        self.persist(&users)?;
        Ok(team)
    }

    /// Saved teams for a user, newest first.
    pub fn teams_for(&self, user_id: &str) -> Vec<SavedTeam> {
        let users = self.users.read();
        let mut teams = users
            .get(user_id)
            .map(|u| u.teams.clone())
            .unwrap_or_default();
        teams.sort_by(|a, b| b.date.cmp(&a.date));
        teams
    }

    /// Persist the current state to disk (also called on shutdown).
    pub fn flush(&self) -> Result<()> {
        let users = self.users.read();
        self.persist(&users)
    }

    fn persist(&self, users: &HashMap<String, UserRecord>) -> Result<()> {
        let json = serde_json::to_string_pretty(users)
            .map_err(|e| Error::Other(format!("serializing users: {e}")))?;
        std::fs::write(&self.users_path, json).map_err(Error::Io)?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
