use tracing::{info, warn};
use crate::models::models::User;
use crate::core::errors::{ModelError, Result};
use crate::core::store::Store;
use crate::users::{find_by_username, touch_last_seen};

/// Checks `username`/`password` and refreshes `last_seen` on success. An
/// unknown username and a wrong password are indistinguishable to the caller.
pub fn login(store: &Store, username: &str, password: &str) -> Result<User> {
    let user = match find_by_username(store, username)? {
        Some(u) => u,
        None => return Err(ModelError::Unauthorized),
    };

    if !user.check_password(password) {
        warn!(user_id = %user.id, "Rejected login attempt");
        return Err(ModelError::Unauthorized);
    }

    let user = touch_last_seen(store, &user.id)?;
    info!(user_id = %user.id, "User logged in");
    Ok(user)
}
