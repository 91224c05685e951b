use std::collections::BTreeSet;
use std::sync::OnceLock;
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{info, warn};
use crate::models::models::Post;
use crate::core::errors::{ModelError, Result};
use crate::core::helpers::{new_id, now, plain_text, validate_uuid};
use crate::core::pagination::{paginate, Page};
use crate::core::store::Store;
use crate::follow::following_ids;
use crate::users::get_user;
use crate::config::*;

pub fn create_post(store: &Store, user_id: &str, body: &str) -> Result<Post> {
    create_post_at(store, user_id, body, now())
}

/// Creates a post with an explicit timestamp. Posts are indexed globally and
/// per author, newest first.
///
/// `MAX_POST_LENGTH` counts the characters as written. The stored body is
/// escaped and linkified, so it can be longer.
pub fn create_post_at(store: &Store, user_id: &str, body: &str, created_at: DateTime<Utc>) -> Result<Post> {
    get_user(store, user_id)?;

    let body = body.trim();
    if body.is_empty() || body.chars().count() > MAX_POST_LENGTH {
        return Err(ModelError::BadRequest("Invalid content".to_string()));
    }

    // Markup-only bodies clean down to nothing
    let body = filter_post_content(body);
    if body.trim().is_empty() {
        return Err(ModelError::BadRequest("Invalid content".to_string()));
    }

    store.transaction(|store| -> Result<Post> {
        let seq = store.get_json::<u64>(POST_SEQ_KEY)?.unwrap_or(0) + 1;
        store.set_json(POST_SEQ_KEY, &seq)?;

        let post = Post {
            id: new_id(),
            user_id: user_id.to_string(),
            body,
            created_at,
            seq,
        };
        store.set_json(&post_key(&post.id), &post)?;

        let mut feed: Vec<String> = store.get_json(FEED_KEY)?.unwrap_or_default();
        feed.insert(0, post.id.clone()); // prepend newest
        store.set_json(FEED_KEY, &feed)?;

        let user_posts_key = user_posts_key(user_id);
        let mut user_posts: Vec<String> = store.get_json(&user_posts_key)?.unwrap_or_default();
        user_posts.insert(0, post.id.clone());
        store.set_json(&user_posts_key, &user_posts)?;

        info!(post_id = %post.id, user_id = %user_id, "Post created");
        Ok(post)
    })
}

pub fn get_post(store: &Store, post_id: &str) -> Result<Post> {
    if post_id.is_empty() || !validate_uuid(post_id) {
        return Err(ModelError::BadRequest("Invalid post id".to_string()));
    }

    store
        .get_json::<Post>(&post_key(post_id))?
        .ok_or_else(|| ModelError::NotFound(format!("Post not found: {}", post_id)))
}

fn url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"]+"#).expect("Regex should compile")
    })
}

/// Reduces the body to escaped plain text, then turns bare URLs into links.
/// The URLs come out of the cleaner already entity-escaped and cannot hold
/// `"`, so they go into the attribute verbatim.
fn filter_post_content(content: &str) -> String {
    let clean = plain_text(content);

    url_regex().replace_all(&clean, |caps: &regex::Captures| {
        let url = &caps[0];
        format!(r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#, url, url)
    }).to_string()
}

fn load_posts(store: &Store, ids: Vec<String>) -> Result<Vec<Post>> {
    let mut posts = Vec::with_capacity(ids.len());

    for id in ids {
        match store.get_json::<Post>(&post_key(&id))? {
            Some(p) => posts.push(p),
            None => warn!(post_id = %id, "Dangling post id in index"),
        }
    }
    Ok(posts)
}

/// Newest first; equal timestamps fall back to creation order, latest first.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });
}

/// Posts written by `user_id`, newest first.
pub fn user_posts(store: &Store, user_id: &str, page: usize) -> Result<Page<Post>> {
    get_user(store, user_id)?;

    let ids: Vec<String> = store.get_json(&user_posts_key(user_id))?.unwrap_or_default();
    let mut posts = load_posts(store, ids)?;
    sort_newest_first(&mut posts);

    Ok(paginate(posts, page, posts_per_page()))
}

/// Every post in the store, newest first.
pub fn explore(store: &Store, page: usize) -> Result<Page<Post>> {
    let feed: Vec<String> = store.get_json(FEED_KEY)?.unwrap_or_default();
    let mut posts = load_posts(store, feed)?;
    sort_newest_first(&mut posts);

    Ok(paginate(posts, page, posts_per_page()))
}

/// The feed of `user_id`: their own posts plus the posts of everyone they
/// follow, newest first.
pub fn following_posts(store: &Store, user_id: &str) -> Result<Vec<Post>> {
    let mut authors: BTreeSet<String> = following_ids(store, user_id)?.into_iter().collect();
    authors.insert(user_id.to_string());

    let mut posts = Vec::new();
    for author in &authors {
        let ids: Vec<String> = store.get_json(&user_posts_key(author))?.unwrap_or_default();
        posts.extend(load_posts(store, ids)?);
    }
    sort_newest_first(&mut posts);

    Ok(posts)
}

pub fn following_posts_page(store: &Store, user_id: &str, page: usize) -> Result<Page<Post>> {
    Ok(paginate(following_posts(store, user_id)?, page, posts_per_page()))
}
