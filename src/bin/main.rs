use clap::Parser;
use tracing::info;

use bord_feed::config::default_avatar_size;
use bord_feed::core::db::init_test_data;
use bord_feed::{follow, posts, users, Store};

/// Seeds a fresh in-memory board with demo data and prints one user's feed.
#[derive(Parser, Debug)]
#[command(name = "bord-feed", version, about)]
struct Args {
    /// Whose feed to print
    #[arg(long, default_value = "test")]
    user: String,

    /// Feed page, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Avatar size in pixels [env: BORD_AVATAR_SIZE]
    #[arg(long)]
    avatar_size: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bord_feed=info".into()),
        )
        .init();

    let args = Args::parse();

    let store = Store::open_in_memory();
    init_test_data(&store)?;
    info!("Demo board ready");

    let user = users::find_by_username(&store, &args.user)?
        .ok_or_else(|| anyhow::anyhow!("No such user: {}", args.user))?;

    let size = args.avatar_size.unwrap_or_else(default_avatar_size);
    println!("{} <{}>", user.username, user.email);
    println!("  avatar:    {}", user.avatar(size));
    println!("  following: {}", follow::following_count(&store, &user.id)?);
    println!("  followers: {}", follow::followers_count(&store, &user.id)?);

    let page = posts::following_posts_page(&store, &user.id, args.page)?;
    println!("Feed page {} ({} posts total)", page.page, page.total);

    for post in &page.items {
        let author = users::get_user(&store, &post.user_id)?;
        println!("  [{}] {}: {}", post.created_at.to_rfc3339(), author.username, post.body);
    }

    if let Some(next) = page.next_num() {
        println!("More: --page {}", next);
    }

    Ok(())
}
