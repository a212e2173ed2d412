// Synchronizer behavior against the in-memory backend: snapshot
// replacement, idempotent stop, and single-active-subscription across
// comment thread switches.

use chirp_client::composer::Composer;
use chirp_client::config::Config;
use chirp_client::models::UserIdentity;
use chirp_client::sync::{CommentSynchronizer, FeedSynchronizer};
use docstore::{BlobStore, CollectionPath, DocumentStore, MemoryBlobStore, MemoryStore};
use std::sync::Arc;
use uuid::Uuid;

fn author() -> UserIdentity {
    UserIdentity {
        display_name: "ada".to_string(),
        photo_url: "https://cdn.chirp.dev/ada.png".to_string(),
    }
}

fn fixtures() -> (Arc<MemoryStore>, Composer, Config) {
    let config = Config::default();
    let store = Arc::new(MemoryStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new(
        &config.storage.host,
        &config.storage.bucket,
    ));
    let dyn_store: Arc<dyn DocumentStore> = store.clone();
    let composer = Composer::new(dyn_store, blobs, &config);
    (store, composer, config)
}

#[tokio::test]
async fn feed_reflects_posts_written_before_start() {
    let (store, composer, config) = fixtures();
    composer.submit_post(&author(), "older", None).await.unwrap();
    composer.submit_post(&author(), "newer", None).await.unwrap();

    let mut feed = FeedSynchronizer::start(store.clone(), &config).await.unwrap();
    let posts = feed.snapshot();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "newer");
    assert_eq!(posts[1].text, "older");
    feed.stop().await;
}

#[tokio::test]
async fn feed_replaces_snapshot_on_every_new_post() {
    let (store, composer, config) = fixtures();
    let mut feed = FeedSynchronizer::start(store.clone(), &config).await.unwrap();
    assert!(feed.snapshot().is_empty());

    composer.submit_post(&author(), "one", None).await.unwrap();
    composer.submit_post(&author(), "two", None).await.unwrap();

    let mut posts = feed.watch_posts();
    let snapshot = posts.wait_for(|p| p.len() == 2).await.unwrap().clone();
    assert_eq!(snapshot[0].text, "two");
    assert_eq!(snapshot[0].username, "ada");
    feed.stop().await;
}

#[tokio::test]
async fn stopping_the_feed_twice_is_a_no_op() {
    let (store, _composer, config) = fixtures();
    let mut feed = FeedSynchronizer::start(store.clone(), &config).await.unwrap();
    let posts_path = CollectionPath::root(&config.store.posts_collection);
    assert_eq!(store.subscriber_count(&posts_path), 1);

    feed.stop().await;
    feed.stop().await;
    assert_eq!(store.subscriber_count(&posts_path), 0);
}

#[tokio::test]
async fn new_comment_on_empty_thread_yields_exactly_one_record() {
    let (store, composer, config) = fixtures();
    let post_id = composer.submit_post(&author(), "p1", None).await.unwrap();

    let mut thread = CommentSynchronizer::start(store.clone(), &config, post_id)
        .await
        .unwrap();
    assert!(thread.snapshot().is_empty());

    composer.submit_comment(post_id, &author(), "hi").await.unwrap();

    let mut comments = thread.watch_comments();
    let snapshot = comments.wait_for(|c| !c.is_empty()).await.unwrap().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].text, "hi");
    thread.stop().await;
}

#[tokio::test]
async fn retargeting_keeps_exactly_one_active_subscription() {
    let (store, composer, config) = fixtures();
    let author = author();
    let mut post_ids = Vec::new();
    for i in 0..5 {
        post_ids.push(
            composer
                .submit_post(&author, &format!("post {i}"), None)
                .await
                .unwrap(),
        );
    }

    let posts_path = CollectionPath::root(&config.store.posts_collection);
    let comment_path = |post_id: Uuid| {
        posts_path.subcollection(post_id, &config.store.comments_collection)
    };

    let mut thread = CommentSynchronizer::start(store.clone(), &config, post_ids[0])
        .await
        .unwrap();
    for &post_id in &post_ids[1..] {
        thread.retarget(post_id).await.unwrap();
    }

    let total_active: usize = post_ids
        .iter()
        .map(|&id| store.subscriber_count(&comment_path(id)))
        .sum();
    assert_eq!(total_active, 1);
    assert_eq!(store.subscriber_count(&comment_path(*post_ids.last().unwrap())), 1);
    assert_eq!(thread.post_id(), *post_ids.last().unwrap());

    thread.stop().await;
    let total_active: usize = post_ids
        .iter()
        .map(|&id| store.subscriber_count(&comment_path(id)))
        .sum();
    assert_eq!(total_active, 0);
}

#[tokio::test]
async fn retargeted_thread_tracks_the_new_post_only() {
    let (store, composer, config) = fixtures();
    let author = author();
    let p1 = composer.submit_post(&author, "first post", None).await.unwrap();
    let p2 = composer.submit_post(&author, "second post", None).await.unwrap();
    composer.submit_comment(p1, &author, "on first").await.unwrap();

    let mut thread = CommentSynchronizer::start(store.clone(), &config, p1)
        .await
        .unwrap();
    assert_eq!(thread.snapshot().len(), 1);

    thread.retarget(p2).await.unwrap();
    assert!(thread.snapshot().is_empty());

    composer.submit_comment(p2, &author, "on second").await.unwrap();
    composer.submit_comment(p1, &author, "more on first").await.unwrap();

    let mut comments = thread.watch_comments();
    let snapshot = comments.wait_for(|c| !c.is_empty()).await.unwrap().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].text, "on second");
    thread.stop().await;
}
