use tracing::{info, warn};
use crate::models::models::{Followers, Followings, User};
use crate::core::errors::{ModelError, Result};
use crate::core::store::Store;
use crate::users::get_user;
use crate::config::*;

/// Adds the edge `follower_id -> following_id`. Returns `false` when the edge
/// already existed. Both users must exist and must differ.
pub fn follow_user(store: &Store, follower_id: &str, following_id: &str) -> Result<bool> {
    get_user(store, follower_id)?;
    get_user(store, following_id)?;

    if follower_id == following_id {
        return Err(ModelError::BadRequest("Cannot follow yourself".to_string()));
    }

    store.transaction(|store| -> Result<bool> {
        let followings_key = followings_key(follower_id);
        let mut followings: Followings = store
            .get_json(&followings_key)?
            .unwrap_or_default();

        if followings.iter().any(|id| id == following_id) {
            return Ok(false);
        }
        followings.push(following_id.to_string());
        store.set_json(&followings_key, &followings)?;

        let followers_key = followers_key(following_id);
        let mut followers: Followers = store
            .get_json(&followers_key)?
            .unwrap_or_default();

        if !followers.iter().any(|id| id == follower_id) {
            followers.push(follower_id.to_string());
            store.set_json(&followers_key, &followers)?;
        }

        info!(follower_id = %follower_id, following_id = %following_id, "Followed user");
        Ok(true)
    })
}

/// Removes the edge `follower_id -> following_id`. Returns `false` when there
/// was nothing to remove.
pub fn unfollow_user(store: &Store, follower_id: &str, following_id: &str) -> Result<bool> {
    get_user(store, follower_id)?;
    get_user(store, following_id)?;

    store.transaction(|store| -> Result<bool> {
        let followings_key = followings_key(follower_id);
        let mut followings: Followings = store
            .get_json(&followings_key)?
            .unwrap_or_default();

        let before = followings.len();
        followings.retain(|id| id != following_id);
        if followings.len() == before {
            return Ok(false);
        }
        store.set_json(&followings_key, &followings)?;

        let followers_key = followers_key(following_id);
        let mut followers: Followers = store
            .get_json(&followers_key)?
            .unwrap_or_default();

        followers.retain(|id| id != follower_id);
        store.set_json(&followers_key, &followers)?;

        info!(follower_id = %follower_id, following_id = %following_id, "Unfollowed user");
        Ok(true)
    })
}

pub fn is_following(store: &Store, follower_id: &str, following_id: &str) -> Result<bool> {
    get_user(store, following_id)?;
    Ok(following_ids(store, follower_id)?
        .iter()
        .any(|id| id == following_id))
}

pub fn following_ids(store: &Store, user_id: &str) -> Result<Followings> {
    get_user(store, user_id)?;
    Ok(store.get_json(&followings_key(user_id))?.unwrap_or_default())
}

pub fn follower_ids(store: &Store, user_id: &str) -> Result<Followers> {
    get_user(store, user_id)?;
    Ok(store.get_json(&followers_key(user_id))?.unwrap_or_default())
}

pub fn following_count(store: &Store, user_id: &str) -> Result<usize> {
    Ok(following_ids(store, user_id)?.len())
}

pub fn followers_count(store: &Store, user_id: &str) -> Result<usize> {
    Ok(follower_ids(store, user_id)?.len())
}

pub fn get_followings(store: &Store, user_id: &str) -> Result<Vec<User>> {
    load_users(store, following_ids(store, user_id)?)
}

pub fn get_followers(store: &Store, user_id: &str) -> Result<Vec<User>> {
    load_users(store, follower_ids(store, user_id)?)
}

fn load_users(store: &Store, ids: Vec<String>) -> Result<Vec<User>> {
    let mut users = Vec::with_capacity(ids.len());

    for id in ids {
        match store.get_json::<User>(&user_key(&id))? {
            Some(u) => users.push(u),
            None => warn!(user_id = %id, "Dangling follow edge"),
        }
    }
    Ok(users)
}
