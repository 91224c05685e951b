use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::core::errors::Result;
use crate::core::helpers::{avatar_url, hash_password, new_id, now, verify_password};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl User {
    /// A fresh user with no password set. Nothing is stored until the user
    /// is handed to `users::create_user`.
    pub fn new(username: &str, email: &str) -> Self {
        User {
            id: new_id(),
            username: username.to_string(),
            email: email.trim().to_string(),
            password_hash: None,
            about_me: None,
            last_seen: now(),
        }
    }

    pub fn set_password(&mut self, password: &str) -> Result<()> {
        self.password_hash = Some(hash_password(password)?);
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> bool {
        match &self.password_hash {
            Some(hash) => verify_password(password, hash),
            None => false,
        }
    }

    pub fn avatar(&self, size: u32) -> String {
        avatar_url(&self.email, size)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Store-wide creation order, used to break timestamp ties.
    pub seq: u64,
}

/// Ids a user follows, in the order they were followed.
pub type Followings = Vec<String>;
/// Ids following a user, in the order they started following.
pub type Followers = Vec<String>;
