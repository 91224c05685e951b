use tracing::debug;
use crate::models::models::User;
use crate::core::errors::Result;
use crate::core::store::Store;
use crate::follow::follow_user;
use crate::posts::create_post;
use crate::users::{find_by_username, register};
use crate::config::*;

const DEMO_USERS: [(&str, &str, &[&str]); 3] = [
    ("test", "test@example.com", &["This is my first post on Bord!"]),
    (
        "alice",
        "alice@example.com",
        &[
            "Welcome to my board! Excited to share thoughts here.",
            "Just finished an amazing project. Feeling productive today!",
        ],
    ),
    (
        "bob",
        "bob@example.com",
        &["Hey everyone! Just joined Bord, looking forward to connecting."],
    ),
];

/// Seeds the demo users `test`, `alice` and `bob` (password = username), one
/// or two posts each, and `test` following `bob`. Users already present are
/// left untouched, so seeding twice is harmless.
pub fn init_test_data(store: &Store) -> Result<()> {
    let mut seeded: Vec<User> = Vec::with_capacity(DEMO_USERS.len());

    for (username, email, posts) in DEMO_USERS {
        let user = match find_by_username(store, username)? {
            Some(u) => u,
            None => {
                let user = register(store, username, email, username)?;
                for body in posts {
                    create_post(store, &user.id, body)?;
                }
                user
            }
        };
        seeded.push(user);
    }

    if let (Some(test), Some(bob)) = (
        seeded.iter().find(|u| u.username == "test"),
        seeded.iter().find(|u| u.username == "bob"),
    ) {
        follow_user(store, &test.id, &bob.id)?;
    }

    debug!(users = seeded.len(), "Demo data seeded");
    Ok(())
}

pub fn reset_db_data(store: &Store) -> Result<()> {
    store.transaction(|store| -> Result<()> {
        let users: Vec<String> = store.get_json(USERS_LIST_KEY)?.unwrap_or_default();

        for id in &users {
            store.delete(&user_key(id))?;
            store.delete(&user_posts_key(id))?;
            store.delete(&followings_key(id))?;
            store.delete(&followers_key(id))?;
        }

        let posts: Vec<String> = store.get_json(FEED_KEY)?.unwrap_or_default();
        for id in posts {
            store.delete(&post_key(&id))?;
        }

        store.delete(USERS_LIST_KEY)?;
        store.delete(FEED_KEY)?;
        store.delete(POST_SEQ_KEY)?;

        debug!(users = users.len(), "Store reset");
        Ok(())
    })
}
