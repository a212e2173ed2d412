use bytes::Bytes;
use chirp_client::composer::{Attachment, Composer};
use chirp_client::config::Config;
use chirp_client::logging;
use chirp_client::models::{humanize_timestamp, UserIdentity};
use chirp_client::sync::{CommentSynchronizer, FeedSynchronizer};
use docstore::{BlobStore, DocumentStore, MemoryBlobStore, MemoryStore};
use std::sync::Arc;

/// Demo run against the in-memory backend: submit a few posts and
/// comments and watch them come back through the synchronizers.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env();
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new(
        &config.storage.host,
        &config.storage.bucket,
    ));
    let composer = Composer::new(Arc::clone(&store), Arc::clone(&blobs), &config);

    let author = UserIdentity {
        display_name: "ada".to_string(),
        photo_url: "https://storage.chirp.dev/chirp-media/avatars/ada.png".to_string(),
    };

    let mut feed = FeedSynchronizer::start(Arc::clone(&store), &config).await?;

    let first = composer.submit_post(&author, "hello, chirp", None).await?;
    let second = composer
        .submit_post(
            &author,
            "sunrise from the office",
            Some(Attachment {
                filename: "sunrise.png".to_string(),
                bytes: Bytes::from_static(b"\x89PNG\r\n"),
            }),
        )
        .await?;
    composer.submit_comment(first, &author, "first!").await?;

    let mut posts = feed.watch_posts();
    posts.wait_for(|snapshot| snapshot.len() == 2).await?;
    for post in feed.snapshot() {
        tracing::info!(
            username = %post.username,
            text = %post.text,
            image = %post.image,
            at = %humanize_timestamp(&post.created_at),
            "feed entry"
        );
    }

    let mut comments = CommentSynchronizer::start(Arc::clone(&store), &config, first).await?;
    let mut thread = comments.watch_comments();
    thread.wait_for(|snapshot| !snapshot.is_empty()).await?;
    for comment in comments.snapshot() {
        tracing::info!(username = %comment.username, text = %comment.text, "comment");
    }

    comments.retarget(second).await?;
    tracing::info!(post_id = %comments.post_id(), count = comments.snapshot().len(), "retargeted thread");

    comments.stop().await;
    feed.stop().await;
    Ok(())
}
