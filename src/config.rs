// === Limits ===
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MAX_EMAIL_LENGTH: usize = 120;
pub const MIN_PASSWORD_LENGTH: usize = 3;
pub const MAX_ABOUT_ME_LENGTH: usize = 140;
pub const MAX_POST_LENGTH: usize = 140;

pub const AVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar";

// === Storage keys ===
pub const USERS_LIST_KEY: &str = "users_list";
pub const FEED_KEY: &str = "feed";
pub const POST_SEQ_KEY: &str = "post_seq";

pub fn user_key(user_id: &str) -> String {
    format!("user:{}", user_id)
}

pub fn post_key(post_id: &str) -> String {
    format!("post:{}", post_id)
}

pub fn user_posts_key(user_id: &str) -> String {
    format!("user_posts:{}", user_id)
}

pub fn followings_key(user_id: &str) -> String {
    format!("followings:{}", user_id)
}

pub fn followers_key(user_id: &str) -> String {
    format!("followers:{}", user_id)
}

// === Environment ===
pub fn posts_per_page() -> usize {
    std::env::var("BORD_POSTS_PER_PAGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(20)
        .max(1)
}

pub fn default_avatar_size() -> u32 {
    std::env::var("BORD_AVATAR_SIZE")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(128)
}
