use std::sync::OnceLock;
use regex::Regex;
use tracing::info;
use crate::models::models::User;
use crate::core::errors::{ModelError, Result};
use crate::core::helpers::{normalize_email, now, plain_text, validate_uuid};
use crate::core::store::Store;
use crate::config::*;

#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub about_me: Option<String>,
}

fn username_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[\w.\-]+$").expect("Regex should compile")
    })
}

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Regex should compile")
    })
}

/// Usernames are stored exactly as typed, so they are limited to letters,
/// digits, `_`, `.` and `-`: nothing that needs escaping in markup.
fn validate_username(username: &str) -> Result<String> {
    let username = username.trim();
    let len = username.chars().count();

    if username.is_empty() {
        return Err(ModelError::BadRequest("Username is required".to_string()));
    }
    if len < MIN_USERNAME_LENGTH || len > MAX_USERNAME_LENGTH {
        return Err(ModelError::BadRequest(format!(
            "Username must be {}-{} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if !username_regex().is_match(username) {
        return Err(ModelError::BadRequest(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ModelError::BadRequest("Email is required".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH || !email_regex().is_match(email) {
        return Err(ModelError::BadRequest("Invalid email address".to_string()));
    }
    Ok(email.to_string())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ModelError::BadRequest("Password is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ModelError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Rejects a username or email already held by a user other than `except_id`.
fn ensure_unique(store: &Store, username: &str, email: &str, except_id: Option<&str>) -> Result<()> {
    let email = normalize_email(email);

    for u in list_users(store)? {
        if Some(u.id.as_str()) == except_id {
            continue;
        }
        if u.username == username {
            return Err(ModelError::Conflict("Username exists".to_string()));
        }
        if normalize_email(&u.email) == email {
            return Err(ModelError::Conflict("Email exists".to_string()));
        }
    }
    Ok(())
}

/// Validates and persists `user`. Username and email must be unique; the
/// email comparison ignores case and surrounding whitespace.
pub fn create_user(store: &Store, mut user: User) -> Result<User> {
    user.username = validate_username(&user.username)?;
    user.email = validate_email(&user.email)?;

    store.transaction(|store| -> Result<User> {
        if store.exists(&user_key(&user.id))? {
            return Err(ModelError::Conflict("User id exists".to_string()));
        }
        ensure_unique(store, &user.username, &user.email, None)?;

        store.set_json(&user_key(&user.id), &user)?;

        let mut users: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
        users.push(user.id.clone());
        store.set_json(USERS_LIST_KEY, &users)?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    })
}

/// Creates a user with a password in one step.
pub fn register(store: &Store, username: &str, email: &str, password: &str) -> Result<User> {
    validate_password(password)?;

    let mut user = User::new(username, email);
    user.set_password(password)?;
    create_user(store, user)
}

pub fn get_user(store: &Store, user_id: &str) -> Result<User> {
    if user_id.is_empty() || !validate_uuid(user_id) {
        return Err(ModelError::BadRequest("Invalid user id".to_string()));
    }

    store
        .get_json::<User>(&user_key(user_id))?
        .ok_or_else(|| ModelError::user_not_found(user_id))
}

pub fn list_users(store: &Store) -> Result<Vec<User>> {
    let ids: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();
    let mut users = Vec::with_capacity(ids.len());

    for id in ids {
        if let Some(u) = store.get_json::<User>(&user_key(&id))? {
            users.push(u);
        }
    }
    Ok(users)
}

pub fn find_by_username(store: &Store, username: &str) -> Result<Option<User>> {
    Ok(list_users(store)?.into_iter().find(|u| u.username == username))
}

pub fn find_by_email(store: &Store, email: &str) -> Result<Option<User>> {
    let email = normalize_email(email);
    Ok(list_users(store)?
        .into_iter()
        .find(|u| normalize_email(&u.email) == email))
}

pub fn update_profile(store: &Store, user_id: &str, update: ProfileUpdate) -> Result<User> {
    let mut user = get_user(store, user_id)?;

    let new_username = match update.username {
        Some(username) => Some(validate_username(&username)?),
        None => None,
    };

    if let Some(about_me) = update.about_me {
        if about_me.chars().count() > MAX_ABOUT_ME_LENGTH {
            return Err(ModelError::BadRequest(format!(
                "About me too long (max {} chars)",
                MAX_ABOUT_ME_LENGTH
            )));
        }
        let sanitized = plain_text(about_me.trim());
        user.about_me = if sanitized.is_empty() { None } else { Some(sanitized) };
    }

    store.transaction(|store| -> Result<User> {
        if let Some(username) = new_username {
            if username != user.username {
                ensure_unique(store, &username, &user.email, Some(user_id))?;
                user.username = username;
            }
        }

        store.set_json(&user_key(user_id), &user)?;
        Ok(user)
    })
}

/// Replaces the stored credential of `user_id` without checking the old one.
pub fn set_password(store: &Store, user_id: &str, password: &str) -> Result<()> {
    validate_password(password)?;

    let mut user = get_user(store, user_id)?;
    user.set_password(password)?;
    store.set_json(&user_key(user_id), &user)?;
    Ok(())
}

pub fn change_password(store: &Store, user_id: &str, old_password: &str, new_password: &str) -> Result<User> {
    validate_password(new_password)?;

    let mut user = get_user(store, user_id)?;
    if !user.check_password(old_password) {
        return Err(ModelError::Unauthorized);
    }

    user.set_password(new_password)?;
    store.set_json(&user_key(user_id), &user)?;

    info!(user_id = %user_id, "Password changed");
    Ok(user)
}

pub fn touch_last_seen(store: &Store, user_id: &str) -> Result<User> {
    let mut user = get_user(store, user_id)?;
    user.last_seen = now();
    store.set_json(&user_key(user_id), &user)?;
    Ok(user)
}
